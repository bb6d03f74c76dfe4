/// 日志工具模块
///
/// 控制台和日志文件同时输出；其余是格式化运行过程的辅助函数
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, WorkMode};
use crate::orchestrator::stats::RunStats;
use crate::workflow::{ItemCtx, Outcome, OutcomeStatus};

/// 初始化全局日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug 或 info。
pub fn init(log_file_path: &str, verbose: bool) -> Result<()> {
    init_log_file(log_file_path)?;

    let file = OpenOptions::new().append(true).open(log_file_path)?;
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

/// 初始化日志文件（覆盖旧内容，写入表头）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n批量界面自动化日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 运行模式: {:?}", config.work_mode);
    info!("📄 数据源: {}", config.work_source_path);
    info!(
        "🔁 最大尝试次数: {} / 拆分份数: {}",
        config.max_retries, config.split_parts
    );
    info!("{}", "=".repeat(60));
}

/// 记录条目加载信息
pub fn log_items_loaded(total: usize, skipped: usize) {
    info!("✓ 找到 {} 个待处理的条目", total);
    if skipped > 0 {
        warn!("⚠️ 跳过了 {} 条无效记录", skipped);
    }
}

pub fn log_item_start(ctx: &ItemCtx, input: &str) {
    info!("\n{}", "─".repeat(60));
    info!("{} 📦 开始处理: {}", ctx, truncate_text(input, 40));
}

pub fn log_item_outcome(ctx: &ItemCtx, outcome: &Outcome) {
    match outcome.status {
        OutcomeStatus::Succeeded | OutcomeStatus::SucceededViaSplit => info!(
            "{} ✅ {} 最终状态: {} (尝试 {} 次)",
            ctx, outcome.item.id, outcome.status, outcome.attempts_issued
        ),
        OutcomeStatus::PartiallyFailed => warn!(
            "{} ⚠️ {} 最终状态: {} (尝试 {} 次)",
            ctx, outcome.item.id, outcome.status, outcome.attempts_issued
        ),
        OutcomeStatus::Failed => error!(
            "{} ❌ {} 最终状态: {} (尝试 {} 次)",
            ctx, outcome.item.id, outcome.status, outcome.attempts_issued
        ),
    }
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats, mode: WorkMode, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for line in stats.report(mode.total_label()).lines() {
        info!("{}", line);
    }
    if stats.skipped_records > 0 {
        info!("跳过记录数: {}", stats.skipped_records);
    }
    info!("实际尝试次数: {}", stats.attempts_issued);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
