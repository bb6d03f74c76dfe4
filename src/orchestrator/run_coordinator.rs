//! 运行协调器 - 编排层
//!
//! ## 职责
//!
//! 1. **顺序处理**：严格按队列顺序处理条目，一个条目（含重试和拆分）完成后才开始下一个
//! 2. **失败隔离**：单个条目的任何失败都不会中止运行
//! 3. **统计**：条目得到最终结果后才计入 RunStats
//! 4. **停止信号**：收到停止信号时放弃当前条目，已计入的统计保持一致

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::Config;
use crate::infrastructure::UiDriver;
use crate::models::WorkItem;
use crate::orchestrator::stats::RunStats;
use crate::services::{FailureWriter, RetryPolicy};
use crate::utils::logging;
use crate::workflow::{ItemCtx, Outcome, SplitEscalation, StartupSequence, TaskExecutor, Workflow};

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,
    pub outcomes: Vec<Outcome>,
    /// 是否被停止信号打断
    pub interrupted: bool,
}

impl RunReport {
    pub fn processed_items(&self) -> usize {
        self.outcomes.len()
    }
}

pub struct RunCoordinator {
    executor: TaskExecutor,
    escalation: SplitEscalation,
    inter_item_delay: Duration,
    failure_writer: Option<FailureWriter>,
}

impl RunCoordinator {
    pub fn new(executor: TaskExecutor, escalation: SplitEscalation, inter_item_delay: Duration) -> Self {
        Self {
            executor,
            escalation,
            inter_item_delay,
            failure_writer: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let coordinator = Self::new(
            TaskExecutor::new(RetryPolicy::from_config(config)),
            SplitEscalation::new(config.split_parts),
            config.timings.inter_item_delay,
        );
        match &config.failure_file {
            Some(path) => coordinator.with_failure_writer(FailureWriter::with_path(path.clone())),
            None => coordinator,
        }
    }

    pub fn with_failure_writer(mut self, writer: FailureWriter) -> Self {
        self.failure_writer = Some(writer);
        self
    }

    /// 重试前恢复界面时重放的导航
    pub fn with_recovery_sequence(mut self, startup: StartupSequence) -> Self {
        self.executor = self.executor.with_startup(startup);
        self
    }

    /// 处理全部条目
    pub async fn run(
        &self,
        driver: &mut dyn UiDriver,
        workflow: &dyn Workflow,
        items: &[WorkItem],
        mut shutdown: watch::Receiver<bool>,
    ) -> RunReport {
        let total = items.len();
        let mut stats = RunStats::new(total);
        let mut outcomes = Vec::with_capacity(total);
        let mut interrupted = false;

        for (index, item) in items.iter().enumerate() {
            if *shutdown.borrow() {
                interrupted = true;
                break;
            }

            let ctx = ItemCtx::new(index + 1, total);
            logging::log_item_start(&ctx, &item.id);

            let outcome = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => {
                    warn!("{} 收到停止信号，放弃当前条目: {}", ctx, item.id);
                    interrupted = true;
                    break;
                }
                outcome = self.process_item(driver, workflow, item, &ctx) => outcome,
            };

            stats.record(&outcome);
            logging::log_item_outcome(&ctx, &outcome);
            if !outcome.fully_succeeded() {
                self.record_failure(&outcome);
            }
            outcomes.push(outcome);

            tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => {
                    interrupted = true;
                    break;
                }
                _ = sleep(self.inter_item_delay) => {}
            }
        }

        if interrupted {
            warn!("运行被中断，已完成 {}/{} 个条目", outcomes.len(), total);
        }

        RunReport {
            stats,
            outcomes,
            interrupted,
        }
    }

    /// 处理单个条目：执行 → 用完重试则拆分
    async fn process_item(
        &self,
        driver: &mut dyn UiDriver,
        workflow: &dyn Workflow,
        item: &WorkItem,
        ctx: &ItemCtx,
    ) -> Outcome {
        let report = self.executor.execute(driver, workflow, item, ctx).await;

        if report.retries_exhausted() && workflow.supports_split() {
            return self
                .escalation
                .escalate(&self.executor, driver, workflow, item, report, ctx)
                .await;
        }

        Outcome::direct(item.clone(), report)
    }

    fn record_failure(&self, outcome: &Outcome) {
        if let Some(writer) = &self.failure_writer {
            if let Err(e) = writer.write(outcome) {
                error!("写入失败记录 {} 出错: {}", writer.path(), e);
            }
        }
    }
}

/// 等到停止信号为 true；发送端已关闭则永远等待
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
