use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use tokio::fs;
use tracing::{debug, info, warn};

use super::LoadedItems;
use crate::error::{AppError, AppResult, SetupError};
use crate::models::work_item::PublishRow;

/// 发布模板必须包含的列（列名包含即可）
pub const REQUIRED_COLUMNS: [&str; 4] = ["序号", "账号", "标题", "描述"];

/// 从发布模板加载视频发布数据
///
/// 支持 `.xlsx` / `.xls`（读第一个工作表）和 `.csv`。
/// 模板第一行是标题，第二行是列名，第三行起是数据。
pub async fn load_publish_items(sheet_path: &Path) -> AppResult<LoadedItems> {
    let path_text = sheet_path.display().to_string();
    if !sheet_path.exists() {
        return Err(SetupError::WorkSourceMissing { path: path_text }.into());
    }

    let is_csv = sheet_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        let content = fs::read_to_string(sheet_path)
            .await
            .map_err(|e| AppError::file_read_failed(&path_text, e))?;
        csv_rows(&content, &path_text)?
    } else {
        workbook_rows(sheet_path, &path_text)?
    };
    debug!("{} 原始行数: {}", path_text, rows.len());

    let loaded = parse_publish_table(rows, &path_text)?;
    info!(
        "从 {} 读取到 {} 条发布数据，跳过 {} 行",
        path_text,
        loaded.items.len(),
        loaded.skipped
    );
    Ok(loaded)
}

fn workbook_rows(path: &Path, path_text: &str) -> AppResult<Vec<Vec<String>>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| AppError::sheet_parse_failed(path_text, e))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| AppError::sheet_parse_failed(path_text, e))?,
        None => return Ok(Vec::new()),
    };
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn csv_rows(content: &str, path_text: &str) -> AppResult<Vec<Vec<String>>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::csv_parse_failed(path_text, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// 单元格转文本：整数值的浮点去掉小数，日期按天输出
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(value) if value.fract() == 0.0 => format!("{}", *value as i64),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                datetime.format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M").to_string(),
            None => value.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

/// 按模板规则解析表格：第二行为列名，第三行起为数据，全空行忽略
fn parse_publish_table(rows: Vec<Vec<String>>, path_text: &str) -> AppResult<LoadedItems> {
    let mut rows = rows.into_iter();
    let (Some(_title), Some(headers)) = (rows.next(), rows.next()) else {
        warn!("表格数据不足，至少需要2行: {}", path_text);
        return Err(missing_columns(path_text, &REQUIRED_COLUMNS));
    };
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    debug!("实际列名: {:?}", headers);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h.contains(required)))
        .collect();
    if !missing.is_empty() {
        return Err(missing_columns(path_text, &missing));
    }

    let mut loaded = LoadedItems::default();
    for (index, cells) in rows.enumerate() {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let row = publish_row(&headers, &cells);
        match row.into_work_item() {
            Some(item) => loaded.items.push(item),
            None => {
                // 数据从第三行开始
                warn!("第 {} 行缺少账号、标题或视频名称，已跳过", index + 3);
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

fn publish_row(headers: &[String], cells: &[String]) -> PublishRow {
    let field = |name: &str| -> String {
        let index = headers
            .iter()
            .position(|h| h == name)
            .or_else(|| headers.iter().position(|h| h.contains(name)));
        index
            .and_then(|i| cells.get(i))
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    };
    PublishRow {
        client: field("客户"),
        creation_date: field("创作日期"),
        sequence: field("序号"),
        account: field("账号"),
        title: field("标题"),
        description: field("描述"),
        location: field("位置"),
        schedule_flag: field("定时发送"),
        schedule_time: field("定时发布"),
    }
}

fn missing_columns(path_text: &str, columns: &[&str]) -> AppError {
    SetupError::MissingColumns {
        path: path_text.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
    }
    .into()
}
