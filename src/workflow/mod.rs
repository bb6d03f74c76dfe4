pub mod attempt;
pub mod escalation;
pub mod flow;
pub mod item_ctx;
pub mod outcome;
pub mod sku_download_flow;
pub mod startup;
pub mod task_executor;
pub mod video_publish_flow;

pub use attempt::{Attempt, AttemptReport, ExecutionFailure, Step, StepFailure};
pub use escalation::SplitEscalation;
pub use flow::Workflow;
pub use item_ctx::ItemCtx;
pub use outcome::{FragmentOutcome, Outcome, OutcomeStatus};
pub use sku_download_flow::SkuDownloadFlow;
pub use startup::{NavStep, StartupSequence};
pub use task_executor::TaskExecutor;
pub use video_publish_flow::VideoPublishFlow;
