//! 视频文件查找 - 业务能力层

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// 支持的视频扩展名
const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "avi", "mkv"];

/// 在目录中查找视频文件
///
/// 先找 `<名称>.<扩展名>` 的精确匹配，再找文件名包含该名称的视频。
pub fn find_video_file(folder: &Path, video_name: &str) -> Option<PathBuf> {
    if !folder.is_dir() {
        warn!("视频文件夹不存在: {}", folder.display());
        return None;
    }

    for ext in VIDEO_EXTENSIONS {
        let candidate = folder.join(format!("{}.{}", video_name, ext));
        debug!("尝试查找文件: {}", candidate.display());
        if candidate.is_file() {
            info!("找到精确匹配的视频文件: {}", candidate.display());
            return Some(candidate);
        }
    }

    let mut fuzzy: Vec<PathBuf> = std::fs::read_dir(folder)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_video(path))
        .filter(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().contains(video_name))
                .unwrap_or(false)
        })
        .collect();
    fuzzy.sort();

    match fuzzy.into_iter().next() {
        Some(path) => {
            info!("找到模糊匹配的视频文件: {}", path.display());
            Some(path)
        }
        None => {
            warn!("未找到视频文件: {}", video_name);
            None
        }
    }
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn prefers_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("宫卿-20240501-1-备份.mp4")).unwrap();
        File::create(dir.path().join("宫卿-20240501-1.mov")).unwrap();
        let found = find_video_file(dir.path(), "宫卿-20240501-1").unwrap();
        assert_eq!(found.file_name().unwrap(), "宫卿-20240501-1.mov");
    }

    #[test]
    fn falls_back_to_fuzzy_match() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("最终版-宫卿-1.MP4")).unwrap();
        File::create(dir.path().join("宫卿-1.txt")).unwrap();
        let found = find_video_file(dir.path(), "宫卿-1").unwrap();
        assert_eq!(found.file_name().unwrap(), "最终版-宫卿-1.MP4");
    }

    #[test]
    fn missing_folder_or_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_video_file(dir.path(), "不存在").is_none());
        assert!(find_video_file(&dir.path().join("nope"), "x").is_none());
    }
}
