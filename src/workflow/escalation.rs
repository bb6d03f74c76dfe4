//! 拆分升级 - 流程层
//!
//! 原输入用完重试后，把它拆成几段，每段独立执行一遍（各自有完整的重试次数）。
//! 只拆一层，片段失败不再继续拆分。

use tracing::{info, warn};

use crate::infrastructure::UiDriver;
use crate::models::WorkItem;
use crate::services::split_input;
use crate::workflow::attempt::AttemptReport;
use crate::workflow::flow::Workflow;
use crate::workflow::item_ctx::ItemCtx;
use crate::workflow::outcome::{FragmentOutcome, Outcome};
use crate::workflow::task_executor::TaskExecutor;

pub struct SplitEscalation {
    parts: usize,
}

impl SplitEscalation {
    pub fn new(parts: usize) -> Self {
        Self {
            parts: parts.max(1),
        }
    }

    pub async fn escalate(
        &self,
        executor: &TaskExecutor,
        driver: &mut dyn UiDriver,
        workflow: &dyn Workflow,
        item: &WorkItem,
        original: AttemptReport,
        ctx: &ItemCtx,
    ) -> Outcome {
        let fragments = split_input(&item.id, self.parts);
        if fragments.len() < 2 {
            warn!("{} {} 无法再拆分，记为失败", ctx, item.id);
            return Outcome::direct(item.clone(), original);
        }

        info!(
            "{} 🔪 {} 拆分为 {} 段: {:?}",
            ctx,
            item.id,
            fragments.len(),
            fragments
        );

        let count = fragments.len();
        let mut results = Vec::with_capacity(count);
        for (index, text) in fragments.into_iter().enumerate() {
            let fragment = item.fragment(text);
            let fragment_ctx = ctx.fragment(index + 1, count);
            let report = executor
                .execute(driver, workflow, &fragment, &fragment_ctx)
                .await;
            results.push(FragmentOutcome::from_report(&report));
        }

        Outcome::from_split(item.clone(), original, results)
    }
}
