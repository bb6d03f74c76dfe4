//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用生命周期
//! - 启动检查（数据源、选择器表、目标窗口）
//! - 持有 Browser 和界面驱动
//! - Ctrl+C 停止信号
//!
//! ### `run_coordinator` - 顺序处理所有条目
//! - 一次只处理一个条目（界面和剪贴板都是独占资源）
//! - 用完重试后交给拆分升级
//! - 写失败记录
//!
//! ### `stats` - 运行统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App)
//!     ↓
//! run_coordinator (处理 Vec<WorkItem>)
//!     ↓
//! workflow::TaskExecutor / SplitEscalation (处理单个输入)
//!     ↓
//! workflow::Workflow (SkuDownloadFlow / VideoPublishFlow)
//!     ↓
//! services (能力层：选择器 / 拆分 / 失败记录)
//!     ↓
//! infrastructure (基础设施：UiDriver)
//! ```

pub mod batch_processor;
pub mod run_coordinator;
pub mod stats;

pub use batch_processor::App;
pub use run_coordinator::{RunCoordinator, RunReport};
pub use stats::RunStats;
