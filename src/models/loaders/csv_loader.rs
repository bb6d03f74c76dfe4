use std::path::Path;

use csv::ReaderBuilder;
use tokio::fs;
use tracing::{debug, info, warn};

use super::LoadedItems;
use crate::error::{AppError, AppResult, SetupError};
use crate::models::work_item::WorkItem;

/// 从 CSV 文件读取 SKU 列表
///
/// 缺少 `column` 列或该列为空的记录会被跳过，不影响其它记录。
pub async fn load_sku_items(csv_file_path: &Path, column: &str) -> AppResult<LoadedItems> {
    let path_text = csv_file_path.display().to_string();
    if !csv_file_path.exists() {
        return Err(SetupError::WorkSourceMissing { path: path_text }.into());
    }

    let content = fs::read_to_string(csv_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_text, e))?;

    let loaded = parse_sku_csv(&content, column, &path_text)?;
    info!(
        "从 {} 读取到 {} 个SKU，跳过 {} 条记录",
        path_text,
        loaded.items.len(),
        loaded.skipped
    );
    Ok(loaded)
}

fn parse_sku_csv(content: &str, column: &str, path_text: &str) -> AppResult<LoadedItems> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::csv_parse_failed(path_text, e))?
        .clone();
    let column_index = headers.iter().position(|h| h.trim() == column);

    let mut loaded = LoadedItems::default();
    let Some(column_index) = column_index else {
        warn!("CSV文件中没有 '{}' 列: {}", column, path_text);
        return Ok(loaded);
    };

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| AppError::csv_parse_failed(path_text, e))?;
        match record.get(column_index).map(str::trim) {
            Some(sku) if !sku.is_empty() => loaded.items.push(WorkItem::new(sku)),
            _ => {
                debug!("第 {} 条记录缺少 '{}'，已跳过", line + 1, column);
                loaded.skipped += 1;
            }
        }
    }

    Ok(loaded)
}
