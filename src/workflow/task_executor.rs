//! 任务执行器 - 流程层
//!
//! 对一个输入反复执行流程，直到成功、遇到不可重试的失败或用完尝试次数

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::infrastructure::UiDriver;
use crate::models::WorkItem;
use crate::services::{RetryDecision, RetryPolicy, StopReason};
use crate::workflow::attempt::{Attempt, AttemptReport, ExecutionFailure};
use crate::workflow::flow::Workflow;
use crate::workflow::item_ctx::ItemCtx;
use crate::workflow::startup::StartupSequence;

pub struct TaskExecutor {
    policy: RetryPolicy,
    /// 页面重置后重放的导航
    startup: Option<StartupSequence>,
}

impl TaskExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            startup: None,
        }
    }

    pub fn with_startup(mut self, startup: StartupSequence) -> Self {
        self.startup = Some(startup);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 执行一个输入
    ///
    /// 最多发出 `max_attempts` 次尝试；每次可重试的失败之后都会尝试把界面恢复到起始状态，
    /// 恢复失败不影响后续重试。
    pub async fn execute(
        &self,
        driver: &mut dyn UiDriver,
        workflow: &dyn Workflow,
        item: &WorkItem,
        ctx: &ItemCtx,
    ) -> AttemptReport {
        let mut attempts = Vec::new();
        let mut attempt_no = 0;

        loop {
            attempt_no += 1;
            info!(
                "{} 开始处理: {} (第 {}/{} 次)",
                ctx, item.id, attempt_no, self.policy.max_attempts
            );

            let failure = match workflow.run_once(driver, item).await {
                Ok(()) => {
                    attempts.push(Attempt {
                        input: item.id.clone(),
                        index: attempt_no,
                        failure: None,
                    });
                    info!("{} ✓ 处理成功: {}", ctx, item.id);
                    return AttemptReport {
                        input: item.id.clone(),
                        attempts,
                        result: Ok(()),
                    };
                }
                Err(failure) => failure,
            };

            warn!(
                "{} ❌ 处理 {} 时在 [{}] 步骤失败: {}",
                ctx,
                item.id,
                failure.step(),
                failure
            );
            attempts.push(Attempt {
                input: item.id.clone(),
                index: attempt_no,
                failure: Some(failure.clone()),
            });

            let decision = self.policy.decide(attempt_no, &failure);
            if decision == RetryDecision::Stop(StopReason::NotRetryable) {
                error!("{} {} 无法重试，放弃该输入", ctx, item.id);
                return AttemptReport {
                    input: item.id.clone(),
                    attempts,
                    result: Err(ExecutionFailure::NonRetryable(failure)),
                };
            }

            if self.recover(driver, ctx).await {
                info!("{} 成功重新导航到起始页面", ctx);
            } else {
                warn!("{} 重新导航失败，继续后续处理", ctx);
            }

            match decision {
                RetryDecision::RetryAfter(delay) => {
                    info!("{} 正在进行第 {} 次重试...", ctx, attempt_no);
                    sleep(delay).await;
                }
                RetryDecision::Stop(_) => {
                    error!("{} {} 处理失败，已达到最大重试次数", ctx, item.id);
                    return AttemptReport {
                        input: item.id.clone(),
                        attempts,
                        result: Err(ExecutionFailure::RetriesExhausted {
                            attempts: attempt_no,
                            last: failure,
                        }),
                    };
                }
            }
        }
    }

    /// 重置页面并重放启动导航，两者都成功才算恢复
    async fn recover(&self, driver: &mut dyn UiDriver, ctx: &ItemCtx) -> bool {
        if !driver.reset_to_known_state().await {
            return false;
        }
        let Some(startup) = &self.startup else {
            return true;
        };
        match startup.run(driver).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{} 重放启动导航失败: {}", ctx, e);
                false
            }
        }
    }
}
