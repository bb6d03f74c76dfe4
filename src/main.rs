use anyhow::Result;
use batch_ui_automation::utils::logging;
use batch_ui_automation::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(&config.output_log_file, config.verbose_logging)?;

    // 启动失败直接退出（非零退出码）
    let app = match App::initialize(config).await {
        Ok(app) => app,
        Err(e) => {
            error!("❌ {}", e);
            return Err(e.into());
        }
    };

    let report = app.run().await?;
    if report.interrupted {
        error!("运行被中断，已处理 {} 个条目", report.processed_items());
    }

    Ok(())
}
