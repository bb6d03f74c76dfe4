use std::path::Path;

use batch_ui_automation::error::SetupError;
use batch_ui_automation::{App, AppError, Config, Timings, WorkMode};

fn config(dir: &Path, mode: WorkMode, source: &Path) -> Config {
    Config {
        work_mode: mode,
        work_source_path: source.to_string_lossy().to_string(),
        video_folder: dir.join("视频文件").to_string_lossy().to_string(),
        timings: Timings::immediate(),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        failure_file: None,
        ..Config::default()
    }
}

async fn setup_error(config: Config) -> SetupError {
    let Err(err) = App::initialize(config).await else {
        panic!("initialize should fail before connecting to the browser");
    };
    match err {
        AppError::Setup(setup) => setup,
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn csv_without_sku_values_is_an_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("skus.csv");
    std::fs::write(&source, "序号,系统SKU\n1,\n2,  \n").unwrap();

    let err = setup_error(config(dir.path(), WorkMode::SkuDownload, &source)).await;
    assert_eq!(
        err,
        SetupError::WorkSourceEmpty {
            path: source.to_string_lossy().to_string()
        }
    );
}

#[tokio::test]
async fn missing_sku_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("不存在.csv");

    let err = setup_error(config(dir.path(), WorkMode::SkuDownload, &source)).await;
    assert!(matches!(err, SetupError::WorkSourceMissing { .. }));
}

#[tokio::test]
async fn publish_requires_the_video_folder() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("发布.csv");
    std::fs::write(
        &source,
        "视频工作流模板\n客户,创作日期,序号,账号,标题,描述\n宫卿,20240501,1,抖音号A,第一条,描述\n",
    )
    .unwrap();

    let config = config(dir.path(), WorkMode::VideoPublish, &source);
    let folder = config.video_folder.clone();
    let err = setup_error(config).await;
    assert_eq!(err, SetupError::VideoFolderMissing { path: folder });
}

#[tokio::test]
async fn publish_sheet_missing_columns_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("视频文件")).unwrap();
    let source = dir.path().join("发布.csv");
    std::fs::write(&source, "视频工作流模板\n客户,序号,标题\n宫卿,1,第一条\n").unwrap();

    let err = setup_error(config(dir.path(), WorkMode::VideoPublish, &source)).await;
    match err {
        SetupError::MissingColumns { columns, .. } => assert_eq!(columns, vec!["账号", "描述"]),
        other => panic!("unexpected error: {}", other),
    }
}
