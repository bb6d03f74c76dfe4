pub mod cdp_driver;
pub mod clipboard;
pub mod js_executor;
pub mod ui_driver;

pub use cdp_driver::CdpDriver;
pub use clipboard::paste_text;
pub use js_executor::JsExecutor;
pub use ui_driver::{Handle, Role, Selector, TitleMatch, UiDriver};
