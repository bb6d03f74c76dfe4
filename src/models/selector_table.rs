//! 控件选择器表
//!
//! 流程里只写控件的名字，具体的标题 / 角色 / 位置兜底都在这里配置。
//! 可以用 TOML 文件覆盖默认值：
//!
//! ```toml
//! [selectors.query_button]
//! title = "查询"
//! role = "button"
//! fallback_index = 5
//! ```

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, ConfigError};
use crate::infrastructure::{Role, Selector};

// ========== 启动导航 ==========
pub const AD_BACKEND_LINK: &str = "ad_backend_link";
pub const SALES_LOGIN_LINK: &str = "sales_login_link";
pub const LOGIN_NAME_INPUT: &str = "login_name_input";
pub const LOGIN_PASSWORD_INPUT: &str = "login_password_input";
pub const LOGIN_SUBMIT: &str = "login_submit";
pub const TOOLBAR_LINK: &str = "toolbar_link";
pub const SHARED_KEYWORDS_ENTRY: &str = "shared_keywords_entry";

// ========== SKU 下载流程 ==========
pub const INPUT_FIELD: &str = "input_field";
pub const QUERY_BUTTON: &str = "query_button";
pub const DOWNLOAD_LINK: &str = "download_link";
pub const SAVE_DIALOG: &str = "save_dialog";
pub const MESSAGE_DIALOG: &str = "message_dialog";

// ========== 视频发布流程 ==========
pub const PUBLISH_MENU: &str = "publish_menu";
pub const NEW_PUBLISH_BUTTON: &str = "new_publish_button";
pub const UPLOAD_AREA: &str = "upload_area";
pub const FILE_NAME_INPUT: &str = "file_name_input";
pub const ACCOUNT_PICKER: &str = "account_picker";
pub const TITLE_INPUT: &str = "title_input";
pub const DESCRIPTION_INPUT: &str = "description_input";
pub const LOCATION_INPUT: &str = "location_input";
pub const SCHEDULE_TOGGLE: &str = "schedule_toggle";
pub const SCHEDULE_INPUT: &str = "schedule_input";
pub const PUBLISH_SUBMIT: &str = "publish_submit";

/// 一个命名控件
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectorEntry {
    pub title: String,
    pub role: Role,
    /// title 是否为正则表达式
    #[serde(default)]
    pub pattern: bool,
    /// 按名称找不到时，取同角色控件中的第几个（从 0 开始）
    #[serde(default)]
    pub fallback_index: Option<usize>,
}

impl SelectorEntry {
    fn exact(role: Role, title: &str) -> Self {
        Self {
            title: title.to_string(),
            role,
            pattern: false,
            fallback_index: None,
        }
    }

    fn with_fallback(mut self, index: usize) -> Self {
        self.fallback_index = Some(index);
        self
    }

    fn as_pattern(mut self) -> Self {
        self.pattern = true;
        self
    }

    pub fn selector(&self) -> Selector {
        if self.pattern {
            Selector::pattern(self.role, &self.title)
        } else {
            Selector::exact(self.role, &self.title)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SelectorFile {
    #[serde(default)]
    selectors: HashMap<String, SelectorEntry>,
}

/// 选择器表
#[derive(Debug, Clone)]
pub struct SelectorTable {
    entries: HashMap<String, SelectorEntry>,
}

impl Default for SelectorTable {
    fn default() -> Self {
        let entries = [
            (AD_BACKEND_LINK, SelectorEntry::exact(Role::Hyperlink, "广告后台")),
            (SALES_LOGIN_LINK, SelectorEntry::exact(Role::Hyperlink, "销售人员登录通道")),
            (LOGIN_NAME_INPUT, SelectorEntry::exact(Role::Edit, "花名:")),
            (LOGIN_PASSWORD_INPUT, SelectorEntry::exact(Role::Edit, "密码:")),
            (LOGIN_SUBMIT, SelectorEntry::exact(Role::Button, "提交")),
            // 标题里带版本号等前后缀，按包含匹配
            (TOOLBAR_LINK, SelectorEntry::exact(Role::Hyperlink, "工具栏").as_pattern()),
            (
                SHARED_KEYWORDS_ENTRY,
                SelectorEntry::exact(Role::ListItem, "共享关键词").as_pattern(),
            ),
            (
                INPUT_FIELD,
                SelectorEntry::exact(Role::Edit, "请输入erpsku、sellersku、asin、关键词或站点名进行搜索"),
            ),
            // 工具台里查询按钮是第 6 个按钮
            (QUERY_BUTTON, SelectorEntry::exact(Role::Button, "查询").with_fallback(5)),
            (DOWNLOAD_LINK, SelectorEntry::exact(Role::Hyperlink, "只下载自己站点数据")),
            (
                SAVE_DIALOG,
                SelectorEntry::exact(Role::Dialog, "保存文件|Save As|Save File").as_pattern(),
            ),
            (MESSAGE_DIALOG, SelectorEntry::exact(Role::Dialog, "消息提示")),
            (PUBLISH_MENU, SelectorEntry::exact(Role::Button, "发布")),
            (NEW_PUBLISH_BUTTON, SelectorEntry::exact(Role::Button, "新建发布")),
            (UPLOAD_AREA, SelectorEntry::exact(Role::Button, "上传视频")),
            (
                FILE_NAME_INPUT,
                SelectorEntry::exact(Role::Edit, "文件名|File name").as_pattern(),
            ),
            (ACCOUNT_PICKER, SelectorEntry::exact(Role::Edit, "选择账号")),
            (TITLE_INPUT, SelectorEntry::exact(Role::Edit, "标题")),
            (DESCRIPTION_INPUT, SelectorEntry::exact(Role::Edit, "描述")),
            (LOCATION_INPUT, SelectorEntry::exact(Role::Edit, "位置")),
            (SCHEDULE_TOGGLE, SelectorEntry::exact(Role::CheckBox, "定时发布")),
            (SCHEDULE_INPUT, SelectorEntry::exact(Role::Edit, "发布时间")),
            (PUBLISH_SUBMIT, SelectorEntry::exact(Role::Button, "立即发布")),
        ]
        .into_iter()
        .map(|(name, entry)| (name.to_string(), entry))
        .collect();
        Self { entries }
    }
}

impl SelectorTable {
    /// 加载选择器表；未提供文件时使用默认值
    pub async fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut table = Self::default();
        let Some(path) = path else {
            return Ok(table);
        };
        let path_text = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(&path_text, e))?;
        let file: SelectorFile =
            toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&path_text, e))?;
        table.apply_overrides(file.selectors)?;
        info!("已加载控件选择器配置: {}", path_text);
        Ok(table)
    }

    /// 用配置覆盖默认条目
    pub fn apply_overrides(
        &mut self,
        overrides: HashMap<String, SelectorEntry>,
    ) -> Result<(), ConfigError> {
        for (name, entry) in overrides {
            if entry.pattern && Regex::new(&entry.title).is_err() {
                return Err(ConfigError::InvalidSelectorPattern {
                    name,
                    pattern: entry.title,
                });
            }
            if !self.entries.contains_key(&name) {
                warn!("未知的控件名称 '{}'，流程不会使用它", name);
            }
            self.entries.insert(name, entry);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SelectorEntry> {
        self.entries.get(name)
    }
}
