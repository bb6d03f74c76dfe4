pub mod control_locator;
pub mod failure_writer;
pub mod retry_policy;
pub mod splitter;
pub mod video_locator;

pub use control_locator::ControlLocator;
pub use failure_writer::FailureWriter;
pub use retry_policy::{RetryDecision, RetryPolicy, StopReason};
pub use splitter::split_input;
pub use video_locator::find_video_file;
