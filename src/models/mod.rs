pub mod loaders;
pub mod selector_table;
pub mod work_item;

pub use loaders::{load_publish_items, load_sku_items, LoadedItems};
pub use selector_table::{SelectorEntry, SelectorTable};
pub use work_item::{PublishFields, PublishRow, WorkItem};
