//! 失败记录服务 - 业务能力层
//!
//! 只负责"把没有完全成功的条目写进文件"，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::workflow::outcome::Outcome;

/// 失败记录服务
///
/// 每行一条：时间 | 输入 | 最终状态 | 失败原因 / 失败片段
pub struct FailureWriter {
    file_path: String,
}

impl FailureWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }

    /// 追加一条记录
    pub fn write(&self, outcome: &Outcome) -> AppResult<()> {
        debug!("写入失败记录: {} -> {}", outcome.item.id, self.file_path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(|e| AppError::file_write_failed(&self.file_path, e))?;

        file.write_all(format_line(outcome).as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.file_path, e))
    }
}

fn format_line(outcome: &Outcome) -> String {
    let failed_fragments: Vec<&str> = outcome
        .fragments
        .iter()
        .filter(|f| !f.succeeded)
        .map(|f| f.input.as_str())
        .collect();

    let detail = match (&outcome.failure, failed_fragments.is_empty()) {
        (_, false) => format!("失败片段: {}", failed_fragments.join(",")),
        (Some(failure), true) => format!("原因: {}", failure),
        (None, true) => String::new(),
    };

    format!(
        "{} | {} | {} | {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        outcome.item.id,
        outcome.status,
        detail
    )
}
