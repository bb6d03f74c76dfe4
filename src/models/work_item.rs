use std::fmt;

use serde::{Deserialize, Serialize};

/// 发布视频所需的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishFields {
    /// 视频文件名（不含扩展名）
    pub video_name: String,
    pub account: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    /// 定时发布时间，仅在开启定时发送时有值
    #[serde(default)]
    pub schedule_time: Option<String>,
}

/// 一个待处理条目
///
/// 从数据源读出后不可变；拆分时通过 [`WorkItem::fragment`] 派生新条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 提交给界面的输入值（例如 SKU）
    pub id: String,
    /// 发布流程的附加字段
    pub fields: Option<PublishFields>,
}

impl WorkItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: None,
        }
    }

    pub fn with_fields(id: impl Into<String>, fields: PublishFields) -> Self {
        Self {
            id: id.into(),
            fields: Some(fields),
        }
    }

    /// 用输入的一段派生子条目，附加字段保持不变
    pub fn fragment(&self, text: impl Into<String>) -> Self {
        Self {
            id: text.into(),
            fields: self.fields.clone(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// 发布模板中的一行（各列已转成文本）
#[derive(Debug, Clone, Default)]
pub struct PublishRow {
    pub client: String,
    pub creation_date: String,
    pub sequence: String,
    pub account: String,
    pub title: String,
    pub description: String,
    pub location: String,
    /// 定时发送 列
    pub schedule_flag: String,
    /// 定时发布 列
    pub schedule_time: String,
}

impl PublishRow {
    /// 视频名称：客户-创作日期-序号
    pub fn video_name(&self) -> String {
        format!("{}-{}-{}", self.client, self.creation_date, self.sequence)
            .trim_matches('-')
            .to_string()
    }

    pub fn schedule_enabled(&self) -> bool {
        matches!(
            self.schedule_flag.trim().to_lowercase().as_str(),
            "是" | "yes" | "y" | "1" | "true"
        )
    }

    /// 转换为条目；缺少账号或标题时返回 None
    pub fn into_work_item(self) -> Option<WorkItem> {
        if self.account.trim().is_empty() || self.title.trim().is_empty() {
            return None;
        }
        let video_name = self.video_name();
        if video_name.is_empty() {
            return None;
        }
        let schedule_time = if self.schedule_enabled() && !self.schedule_time.trim().is_empty() {
            Some(self.schedule_time.trim().to_string())
        } else {
            None
        };
        let location = Some(self.location.trim().to_string()).filter(|l| !l.is_empty());
        let fields = PublishFields {
            video_name: video_name.clone(),
            account: self.account.trim().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location,
            schedule_time,
        };
        Some(WorkItem::with_fields(video_name, fields))
    }
}
