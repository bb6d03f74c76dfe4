pub mod csv_loader;
pub mod sheet_loader;

pub use csv_loader::load_sku_items;
pub use sheet_loader::load_publish_items;

use crate::models::work_item::WorkItem;

/// 从数据源读出的条目
#[derive(Debug, Default)]
pub struct LoadedItems {
    pub items: Vec<WorkItem>,
    /// 因缺少必填字段而跳过的记录数
    pub skipped: usize,
}
