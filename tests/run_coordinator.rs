mod common;

use batch_ui_automation::models::WorkItem;
use batch_ui_automation::services::FailureWriter;
use batch_ui_automation::workflow::{ExecutionFailure, StepFailure};
use batch_ui_automation::{OutcomeStatus, RunStats};
use common::{coordinator, sku_flow, FailPoint, ScriptedDriver};
use tokio::sync::watch;

fn items(ids: &[&str]) -> Vec<WorkItem> {
    ids.iter().map(|id| WorkItem::new(*id)).collect()
}

#[tokio::test]
async fn direct_success_counts_one_query_and_download() {
    let mut driver = ScriptedDriver::new();
    let (_tx, rx) = watch::channel(false);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["DS04604"]), rx)
        .await;

    assert_eq!(report.outcomes[0].status, OutcomeStatus::Succeeded);
    assert_eq!(report.stats.successful_queries, 1);
    assert_eq!(report.stats.successful_downloads, 1);
    assert_eq!(report.stats.failed_queries, 0);
    assert!(!report.interrupted);
}

#[tokio::test]
async fn exhausted_item_is_split_and_fragments_counted() {
    let mut driver = ScriptedDriver::new()
        .always_fail("DS04604", FailPoint::ReadyAfterPaste)
        .always_fail("4", FailPoint::ReadyAfterPaste);
    let (_tx, rx) = watch::channel(false);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["DS04604"]), rx)
        .await;

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::PartiallyFailed);
    let fragments: Vec<&str> = outcome.fragments.iter().map(|f| f.input.as_str()).collect();
    assert_eq!(fragments, vec!["DS0", "460", "4"]);
    assert_eq!(outcome.attempts_issued, 3 + 1 + 1 + 3);

    assert_eq!(
        report.stats,
        RunStats {
            total: 1,
            successful_queries: 2,
            failed_queries: 1,
            successful_downloads: 2,
            failed_downloads: 1,
            attempts_issued: 8,
            skipped_records: 0,
        }
    );
    assert!(report.stats.is_consistent());
    assert_eq!(driver.pasted.len(), 8);
}

#[tokio::test]
async fn empty_queue_reports_zero_counters() {
    let mut driver = ScriptedDriver::new();
    let (_tx, rx) = watch::channel(false);
    let report = coordinator().run(&mut driver, &sku_flow(), &[], rx).await;

    assert_eq!(report.stats, RunStats::default());
    assert!(report.outcomes.is_empty());
    assert!(driver.pasted.is_empty());
}

#[tokio::test]
async fn missing_input_field_fails_item_and_run_continues() {
    let mut driver = ScriptedDriver::new();
    driver.input_field_present = false;
    let (_tx, rx) = watch::channel(false);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["DS04604", "DS04605"]), rx)
        .await;

    assert_eq!(report.processed_items(), 2);
    for outcome in &report.outcomes {
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.attempts_issued, 1);
        assert!(outcome.fragments.is_empty());
        assert_eq!(
            outcome.failure,
            Some(ExecutionFailure::NonRetryable(StepFailure::InputFieldMissing))
        );
    }
    assert_eq!(driver.resets, 0);
    assert_eq!(report.stats.failed_queries, 2);
    assert_eq!(report.stats.failed_downloads, 2);
}

#[tokio::test]
async fn split_success_is_not_double_counted() {
    let mut driver = ScriptedDriver::new().always_fail("DS04604", FailPoint::SaveDialog);
    let (_tx, rx) = watch::channel(false);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["DS04604", "AB12"]), rx)
        .await;

    assert_eq!(report.outcomes[0].status, OutcomeStatus::SucceededViaSplit);
    assert_eq!(report.outcomes[1].status, OutcomeStatus::Succeeded);
    // 3 个片段 + 1 个直接成功的条目
    assert_eq!(report.stats.successful_queries, 4);
    assert_eq!(report.stats.failed_queries, 0);
    assert_eq!(report.stats.leaf_count(), 4);
    assert_eq!(driver.completed, vec!["DS0", "460", "4", "AB12"]);
}

#[tokio::test]
async fn all_fragments_failing_marks_item_failed() {
    let mut driver = ScriptedDriver::new()
        .always_fail("ABC", FailPoint::Ack)
        .always_fail("A", FailPoint::Ack)
        .always_fail("B", FailPoint::Ack)
        .always_fail("C", FailPoint::Ack);
    let (_tx, rx) = watch::channel(false);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["ABC"]), rx)
        .await;

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert_eq!(outcome.fragments.len(), 3);
    // 片段失败后不再继续拆分
    assert_eq!(driver.attempts_for("A"), 3);
    assert_eq!(report.stats.failed_queries, 3);
    assert_eq!(report.stats.successful_queries, 0);
}

#[tokio::test]
async fn single_char_input_is_not_split() {
    let mut driver = ScriptedDriver::new().always_fail("X", FailPoint::SaveDialog);
    let (_tx, rx) = watch::channel(false);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["X"]), rx)
        .await;

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert!(outcome.fragments.is_empty());
    assert_eq!(outcome.attempts_issued, 3);
    assert_eq!(report.stats.failed_queries, 1);
}

#[tokio::test]
async fn shutdown_before_start_processes_nothing() {
    let mut driver = ScriptedDriver::new();
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["DS04604", "AB12"]), rx)
        .await;

    assert!(report.interrupted);
    assert_eq!(report.processed_items(), 0);
    assert_eq!(report.stats.leaf_count(), 0);
    assert!(driver.pasted.is_empty());
}

#[tokio::test]
async fn shutdown_mid_item_abandons_it_and_stops() {
    let (tx, rx) = watch::channel(false);
    let mut driver = ScriptedDriver::new().shutdown_on_paste("DS04604", tx);
    let report = coordinator()
        .run(&mut driver, &sku_flow(), &items(&["AB12", "DS04604", "CD34"]), rx)
        .await;

    assert!(report.interrupted);
    // 被打断的条目不产生结果，也不计入统计
    assert_eq!(report.processed_items(), 1);
    assert_eq!(report.outcomes[0].item.id, "AB12");
    assert_eq!(report.stats.successful_queries, 1);
    assert_eq!(report.stats.leaf_count(), 1);
    assert_eq!(report.stats.attempts_issued, 1);
    assert!(report.stats.is_consistent());

    assert_eq!(driver.pasted, vec!["AB12", "DS04604"]);
    assert!(!driver.completed.contains(&"DS04604".to_string()));
    assert_eq!(driver.attempts_for("CD34"), 0);
}

#[tokio::test]
async fn incomplete_items_are_written_to_failure_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("failed.txt");
    let coordinator = coordinator()
        .with_failure_writer(FailureWriter::with_path(path.to_string_lossy().to_string()));

    let mut driver = ScriptedDriver::new();
    driver.input_field_present = false;
    let (_tx, rx) = watch::channel(false);
    coordinator
        .run(&mut driver, &sku_flow(), &items(&["DS04604"]), rx)
        .await;

    let content = tokio_test::assert_ok!(std::fs::read_to_string(&path));
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("DS04604"));
    assert!(content.contains("失败"));
}
