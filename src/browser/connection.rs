use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, BrowserError, SetupError};

/// 连接到浏览器并找到标题包含 `target_title` 的页面
///
/// 找不到目标窗口属于启动阶段的致命错误，不会新建页面。
pub async fn connect_to_target_window(port: u16, target_title: &str) -> AppResult<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标窗口标题: {}", target_title);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await.map_err(|e| {
        AppError::Browser(BrowserError::PageListFailed {
            source: Box::new(e),
        })
    })?;
    debug!("获取到 {} 个页面", pages.len());

    for page in pages.iter() {
        if let Ok(Some(page_title)) = page.get_title().await {
            debug!("检查页面标题: {}", page_title);
            if page_title.contains(target_title) {
                info!("✓ 找到目标窗口: {}", page_title);
                return Ok((browser, page.clone()));
            }
        }
    }

    error!("找不到标题为 '{}' 的窗口", target_title);
    Err(SetupError::WindowNotFound {
        title: target_title.to_string(),
    }
    .into())
}
