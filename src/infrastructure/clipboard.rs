//! 剪贴板交接
//!
//! 剪贴板是进程级的单例。写入和粘贴必须在同一次调用里完成，
//! 调用期间独占 `&mut` 驱动，下一次写入不可能插到中间。

use anyhow::Result;
use tracing::debug;

use super::ui_driver::{Handle, UiDriver};

/// 复制 → 清空 → 聚焦 → 粘贴
pub async fn paste_text(driver: &mut dyn UiDriver, handle: &Handle, text: &str) -> Result<()> {
    driver.write_clipboard(text).await?;
    driver.set_text(handle, "").await?;
    driver.click(handle).await?;
    driver.send_paste(handle).await?;
    debug!("已粘贴到 {}: {}", handle, text);
    Ok(())
}
