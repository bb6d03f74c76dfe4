//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理和一次完整运行。
//!
//! 1. **启动检查**：加载数据源、检查视频目录、加载选择器表、连接目标窗口并导航到起始页面；
//!    任何一步失败都中止运行
//! 2. **资源管理**：持有 Browser 和界面驱动，确保生命周期正确
//! 3. **停止信号**：Ctrl+C 转成 watch 信号交给协调器
//! 4. **全局统计**：运行结束后输出统计

use std::path::Path;

use chromiumoxide::Browser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::{Config, WorkMode};
use crate::error::{AppResult, SetupError};
use crate::infrastructure::{CdpDriver, JsExecutor};
use crate::models::{load_publish_items, load_sku_items, LoadedItems, SelectorTable, WorkItem};
use crate::orchestrator::run_coordinator::{RunCoordinator, RunReport};
use crate::orchestrator::stats::RunStats;
use crate::services::ControlLocator;
use crate::utils::logging;
use crate::workflow::{SkuDownloadFlow, StartupSequence, VideoPublishFlow, Workflow};

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    driver: CdpDriver,
    workflow: Box<dyn Workflow>,
    items: Vec<WorkItem>,
    skipped: usize,
    coordinator: RunCoordinator,
}

impl App {
    /// 初始化应用
    ///
    /// 数据源缺失或为空、视频目录不存在、找不到目标窗口或起始页面都属于启动错误，
    /// 此时不会处理任何条目。
    pub async fn initialize(config: Config) -> AppResult<Self> {
        logging::log_startup(&config);

        info!("\n📁 正在加载数据源...");
        let LoadedItems { items, skipped } = load_items(&config).await?;
        if items.is_empty() {
            error!("数据源中没有找到有效记录: {}", config.work_source_path);
            logging::print_final_stats(
                &RunStats {
                    skipped_records: skipped,
                    ..RunStats::default()
                },
                config.work_mode,
                &config.output_log_file,
            );
            return Err(SetupError::WorkSourceEmpty {
                path: config.work_source_path.clone(),
            }
            .into());
        }
        logging::log_items_loaded(items.len(), skipped);

        if config.work_mode == WorkMode::VideoPublish && !Path::new(&config.video_folder).is_dir() {
            error!("视频文件夹不存在: {}", config.video_folder);
            return Err(SetupError::VideoFolderMissing {
                path: config.video_folder.clone(),
            }
            .into());
        }

        let table = SelectorTable::load(config.selectors_file.as_deref().map(Path::new)).await?;

        let (browser, page) =
            browser::connect_to_target_window(config.browser_debug_port, &config.target_window_title)
                .await?;

        let mut driver = CdpDriver::new(
            JsExecutor::new(page),
            config.start_url.clone(),
            config.timings.load_timeout,
        );

        let startup = StartupSequence::for_mode(
            config.work_mode,
            ControlLocator::new(table.clone()),
            config.credentials.clone(),
            config.timings.clone(),
        );
        startup.run(&mut driver).await?;

        let workflow = build_workflow(&config, table);
        let coordinator = RunCoordinator::from_config(&config).with_recovery_sequence(startup);

        Ok(Self {
            config,
            _browser: browser,
            driver,
            workflow,
            items,
            skipped,
            coordinator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> AppResult<RunReport> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let signal_task = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("⚠️ 收到 Ctrl+C，当前条目结束前停止运行");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => error!("监听 Ctrl+C 失败: {}", e),
            }
        });

        info!("🔧 使用流程: {}", self.workflow.name());
        let mut report = self
            .coordinator
            .run(
                &mut self.driver,
                self.workflow.as_ref(),
                &self.items,
                shutdown_rx,
            )
            .await;
        signal_task.abort();

        report.stats.skipped_records = self.skipped;
        logging::print_final_stats(
            &report.stats,
            self.config.work_mode,
            &self.config.output_log_file,
        );

        Ok(report)
    }
}

async fn load_items(config: &Config) -> AppResult<LoadedItems> {
    let path = Path::new(&config.work_source_path);
    match config.work_mode {
        WorkMode::SkuDownload => load_sku_items(path, &config.sku_column).await,
        WorkMode::VideoPublish => load_publish_items(path).await,
    }
}

fn build_workflow(config: &Config, table: SelectorTable) -> Box<dyn Workflow> {
    let locator = ControlLocator::new(table);
    match config.work_mode {
        WorkMode::SkuDownload => Box::new(SkuDownloadFlow::new(locator, config.timings.clone())),
        WorkMode::VideoPublish => Box::new(VideoPublishFlow::new(
            locator,
            config.timings.clone(),
            config.video_folder.clone(),
        )),
    }
}
