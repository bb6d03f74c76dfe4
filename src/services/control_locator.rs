//! 控件定位服务 - 业务能力层
//!
//! 只负责"按名字找到控件"，不关心流程

use std::time::Duration;

use tracing::{debug, warn};

use crate::infrastructure::{Handle, Selector, UiDriver};
use crate::models::SelectorTable;

/// 控件定位服务
///
/// 先按标题 + 角色查找；找不到且配置了位置兜底时，取同角色控件中的第 N 个，
/// 并记录警告，便于发现界面结构变化。
#[derive(Debug, Clone)]
pub struct ControlLocator {
    table: SelectorTable,
}

impl ControlLocator {
    pub fn new(table: SelectorTable) -> Self {
        Self { table }
    }

    pub fn selector(&self, name: &str) -> Option<Selector> {
        self.table.get(name).map(|entry| entry.selector())
    }

    /// 查找命名控件
    pub async fn resolve(&self, driver: &mut dyn UiDriver, name: &str) -> Option<Handle> {
        let Some(entry) = self.table.get(name) else {
            warn!("选择器表中没有 '{}'", name);
            return None;
        };

        if let Some(handle) = driver.locate(&entry.selector()).await {
            debug!("找到控件 {} -> {}", name, handle);
            return Some(handle);
        }

        let index = entry.fallback_index?;
        let candidates = driver.locate_all(entry.role).await;
        match candidates.get(index) {
            Some(handle) => {
                warn!(
                    "按名称未找到控件 '{}' ({})，改用第 {} 个 {} 控件，请确认界面是否变化",
                    name,
                    entry.selector(),
                    index + 1,
                    entry.role
                );
                Some(handle.clone())
            }
            None => {
                warn!(
                    "控件 '{}' 按名称和位置都找不到：界面上只有 {} 个 {} 控件",
                    name,
                    candidates.len(),
                    entry.role
                );
                None
            }
        }
    }

    /// 等待命名控件出现
    pub async fn wait_for(
        &self,
        driver: &mut dyn UiDriver,
        name: &str,
        timeout: Duration,
    ) -> Option<Handle> {
        let selector = self.selector(name)?;
        driver.wait_visible(&selector, timeout).await
    }
}
