//! # Batch UI Automation
//!
//! 按顺序驱动外部界面批量处理条目（查询下载 SKU 数据 / 发布视频），
//! 失败自动重试，重试用完后把输入拆成几段再试。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（界面会话、剪贴板），只暴露能力
//! - `UiDriver` - 定位控件、点击、粘贴、等待；`&mut self` 保证独占
//! - `CdpDriver` - 通过调试端口驱动浏览器中的工具台
//!
//! ### ② 业务能力层（Services）
//! - `RetryPolicy` - 判断是否重试以及等待多久
//! - `split_input` - 把输入拆成片段
//! - `ControlLocator` - 按名称定位控件，找不到时按位置兜底
//! - `FailureWriter` - 写失败记录
//!
//! ### ③ 流程层（Workflow）
//! - `Workflow` - 一个输入的一次完整尝试（SKU 下载 / 视频发布）
//! - `StartupSequence` - 进入流程起始页面的导航，恢复时重放
//! - `TaskExecutor` - 重试循环
//! - `SplitEscalation` - 用完重试后的拆分
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 启动检查和资源管理
//! - `RunCoordinator` - 顺序处理所有条目并统计

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, Credentials, Timings, WorkMode};
pub use error::{AppError, AppResult};
pub use infrastructure::UiDriver;
pub use models::WorkItem;
pub use orchestrator::{App, RunCoordinator, RunReport, RunStats};
pub use workflow::{Outcome, OutcomeStatus, TaskExecutor, Workflow};
