use async_trait::async_trait;

use crate::infrastructure::UiDriver;
use crate::models::WorkItem;
use crate::workflow::attempt::StepFailure;

/// 一个条目的固定操作流程
///
/// - 只执行一次，不重试（重试由 TaskExecutor 负责）
/// - 不持有界面资源，驱动由调用方借给它
#[async_trait]
pub trait Workflow: Send + Sync {
    fn name(&self) -> &str;

    /// 失败后能否拆分输入再试
    fn supports_split(&self) -> bool;

    /// 完整执行一遍流程
    async fn run_once(&self, driver: &mut dyn UiDriver, item: &WorkItem) -> Result<(), StepFailure>;
}
