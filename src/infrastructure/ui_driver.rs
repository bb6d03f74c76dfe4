//! UI 驱动接口 - 基础设施层
//!
//! 描述"能对界面做什么"，不关心 SKU / 视频 / 重试

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// 控件角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Edit,
    Button,
    Hyperlink,
    Dialog,
    ListItem,
    CheckBox,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Edit => "Edit",
            Role::Button => "Button",
            Role::Hyperlink => "Hyperlink",
            Role::Dialog => "Dialog",
            Role::ListItem => "ListItem",
            Role::CheckBox => "CheckBox",
        };
        f.write_str(name)
    }
}

/// 标题匹配方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleMatch {
    /// 完全相等（去除首尾空白后）
    Exact(String),
    /// 正则表达式，例如 `保存文件|Save As|Save File`
    Pattern(String),
}

/// 控件选择器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub title: TitleMatch,
    pub role: Role,
}

impl Selector {
    pub fn exact(role: Role, title: impl Into<String>) -> Self {
        Self {
            title: TitleMatch::Exact(title.into()),
            role,
        }
    }

    pub fn pattern(role: Role, pattern: impl Into<String>) -> Self {
        Self {
            title: TitleMatch::Pattern(pattern.into()),
            role,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            TitleMatch::Exact(title) => write!(f, "{}[title='{}']", self.role, title),
            TitleMatch::Pattern(pattern) => write!(f, "{}[title~/{}/]", self.role, pattern),
        }
    }
}

/// 控件句柄（对驱动以外的代码不透明）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(pub String);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// UI 驱动
///
/// 职责：
/// - 定位、点击、输入、等待
/// - 持有剪贴板和当前会话（所有修改操作都需要 `&mut self`）
/// - 不认识 SKU / 视频
/// - 不处理重试
///
/// 所有调用都是阻塞语义：返回之前调用方不会做别的事。
#[async_trait]
pub trait UiDriver: Send {
    /// 按标题和角色查找控件
    async fn locate(&mut self, selector: &Selector) -> Option<Handle>;

    /// 按出现顺序列出某种角色的全部控件（用于位置索引兜底）
    async fn locate_all(&mut self, role: Role) -> Vec<Handle>;

    /// 控件是否仍然存在
    async fn exists(&mut self, handle: &Handle) -> bool;

    async fn click(&mut self, handle: &Handle) -> anyhow::Result<()>;

    /// 直接设置输入框文本（用于清空）
    async fn set_text(&mut self, handle: &Handle, text: &str) -> anyhow::Result<()>;

    /// 覆盖剪贴板内容
    async fn write_clipboard(&mut self, text: &str) -> anyhow::Result<()>;

    /// 把剪贴板内容粘贴到控件
    async fn send_paste(&mut self, handle: &Handle) -> anyhow::Result<()>;

    /// 在控件上按下回车（确认对话框）
    async fn send_enter(&mut self, handle: &Handle) -> anyhow::Result<()>;

    /// 等待界面就绪，超时返回 false
    async fn wait_ready(&mut self, timeout: Duration) -> bool;

    /// 等待控件出现并可见，超时返回 None
    async fn wait_visible(&mut self, selector: &Selector, timeout: Duration) -> Option<Handle>;

    /// 把界面恢复到已知的起始状态，失败返回 false
    async fn reset_to_known_state(&mut self) -> bool;
}
