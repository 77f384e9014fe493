use super::*;
use crate::report::StepStatus;
use crate::test_support::{bucket, event, song, warehouse, Bucket, TS_NOV_1, TS_NOV_5};
use sf_schema::ALL_TABLES;

fn sparkify_bucket() -> Bucket {
    bucket(
        &[
            event(Some(17), "Ann", "free", "Muse", "Uprising", 304.84, TS_NOV_1),
            event(Some(17), "Ann", "free", "Muse", "Starlight", 240.0, TS_NOV_5),
            event(Some(18), "Bob", "paid", "Unknown Band", "Nothing", 100.0, TS_NOV_5),
            event(None, "", "free", "Muse", "Uprising", 304.84, TS_NOV_5),
        ],
        &[
            song("S1", "Uprising", "A1", "Muse", 304.84),
            song("S2", "Starlight", "A1", "Muse", 240.0),
        ],
    )
}

fn pipeline(bucket: &Bucket) -> Pipeline {
    Pipeline::new(warehouse(), bucket.config.clone()).with_name("sparkify")
}

async fn count(pipeline: &Pipeline, table: &str) -> usize {
    pipeline
        .warehouse()
        .query_count(&format!("SELECT * FROM \"{table}\""))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_reset_leaves_empty_schema() {
    let bucket = sparkify_bucket();
    let pipeline = pipeline(&bucket);

    let report = pipeline.reset().await;
    assert!(report.success(), "{report:?}");
    assert_eq!(report.pipeline, "sparkify");
    assert_eq!(report.warehouse, "duckdb");
    for table in ALL_TABLES {
        assert_eq!(count(&pipeline, table.name).await, 0);
    }

    // second reset is a no-op on the schema
    assert!(pipeline.reset().await.success());
}

#[tokio::test]
async fn test_full_run() {
    let bucket = sparkify_bucket();
    let pipeline = pipeline(&bucket);

    let report = pipeline.run(&RunOptions::default()).await;
    assert!(report.success(), "{report:#?}");

    assert_eq!(report.steps_in(Phase::Schema).count(), 14);
    assert_eq!(report.steps_in(Phase::Load).count(), 2);
    assert_eq!(report.steps_in(Phase::Transform).count(), 5);

    assert_eq!(count(&pipeline, "StagEvents").await, 4);
    assert_eq!(count(&pipeline, "StagSongs").await, 2);
    assert_eq!(count(&pipeline, "DimUsers").await, 2);
    assert_eq!(count(&pipeline, "DimSongs").await, 2);
    assert_eq!(count(&pipeline, "DimArtists").await, 1);
    assert_eq!(count(&pipeline, "DimTime").await, 2);
    assert_eq!(count(&pipeline, "FactSongPlays").await, 4);

    let resolved = pipeline
        .warehouse()
        .query_count(r#"SELECT * FROM "FactSongPlays" WHERE "song_id" IS NOT NULL"#)
        .await
        .unwrap();
    assert_eq!(resolved, 3);

    let checks = report.checks.as_ref().unwrap();
    assert_eq!(checks.summary.total, 9);
    assert!(checks.summary.all_passed());
}

#[tokio::test]
async fn test_run_twice_does_not_accumulate() {
    let bucket = sparkify_bucket();
    let pipeline = pipeline(&bucket);

    assert!(pipeline.run(&RunOptions::default()).await.success());
    assert!(pipeline.run(&RunOptions::default()).await.success());
    assert_eq!(count(&pipeline, "FactSongPlays").await, 4);
    assert_eq!(count(&pipeline, "StagEvents").await, 4);
}

#[tokio::test]
async fn test_etl_without_reset_accumulates_staging() {
    let bucket = sparkify_bucket();
    let pipeline = pipeline(&bucket);
    let options = RunOptions {
        checks: false,
        ..RunOptions::default()
    };

    assert!(pipeline.run(&options).await.success());
    // a second etl on top re-stages the same files; the user dimension
    // then rejects the repeated keys
    let report = pipeline.etl(&options).await;
    assert_eq!(count(&pipeline, "StagEvents").await, 8);
    assert!(!report.success());
    assert_eq!(
        report.step("populate_users").unwrap().status,
        StepStatus::Error
    );
    assert!(report.checks.is_none());
}

#[tokio::test]
async fn test_load_failure_aborts_before_transforms() {
    let mut bucket = sparkify_bucket();
    bucket.config.song_data.uri = bucket.config.song_data.uri.replace("song_data", "nowhere");
    let pipeline = pipeline(&bucket);

    let report = pipeline.run(&RunOptions::default()).await;
    assert!(!report.success());
    assert!(report.aborted.as_deref().unwrap().starts_with("[P002] Load into StagSongs"));
    assert_eq!(report.steps_in(Phase::Transform).count(), 0);
    assert!(report.checks.is_none());

    // the events load still ran and is reported
    let loads: Vec<_> = report.steps_in(Phase::Load).collect();
    assert_eq!(loads.len(), 2);
    assert_eq!(loads[0].status, StepStatus::Success);
    assert_eq!(loads[1].status, StepStatus::Error);

    assert_eq!(count(&pipeline, "DimUsers").await, 0);
    assert_eq!(count(&pipeline, "FactSongPlays").await, 0);
}

#[tokio::test]
async fn test_bad_descriptor_aborts() {
    let bucket = sparkify_bucket();
    std::fs::write(&bucket.config.log_jsonpath, r#"{"jsonpaths": ["$['artist']"]}"#).unwrap();
    let pipeline = pipeline(&bucket);

    let report = pipeline.run(&RunOptions::default()).await;
    assert!(report.aborted.as_deref().unwrap().starts_with("[P003]"));
    assert_eq!(report.steps_in(Phase::Transform).count(), 0);
}

#[tokio::test]
async fn test_malformed_song_aborts_before_transforms() {
    let mut bad = song("S3", "Creep", "A2", "Radiohead", 238.64);
    bad["duration"] = serde_json::json!("three minutes");
    let bucket = bucket(
        &[event(Some(17), "Ann", "free", "Muse", "Uprising", 304.84, TS_NOV_1)],
        &[song("S1", "Uprising", "A1", "Muse", 304.84), bad],
    );
    let pipeline = pipeline(&bucket);

    let report = pipeline.run(&RunOptions::default()).await;
    assert!(!report.success());
    assert!(report
        .aborted
        .as_deref()
        .unwrap()
        .starts_with("[P002] Load into StagSongs failed: [D006]"));
    assert_eq!(report.steps_in(Phase::Transform).count(), 0);
    assert!(report.checks.is_none());
    assert_eq!(count(&pipeline, "StagSongs").await, 0);
    assert_eq!(count(&pipeline, "DimSongs").await, 0);
}

#[tokio::test]
async fn test_level_change_marks_run_failed() {
    let bucket = bucket(
        &[
            event(Some(17), "Ann", "free", "Muse", "Uprising", 304.84, TS_NOV_1),
            event(Some(17), "Ann", "paid", "Muse", "Uprising", 304.84, TS_NOV_5),
        ],
        &[song("S1", "Uprising", "A1", "Muse", 304.84)],
    );
    let pipeline = pipeline(&bucket);

    let report = pipeline.run(&RunOptions::default()).await;
    assert!(!report.success());
    assert!(report.aborted.is_none());

    let failed: Vec<&str> = report.failed_steps().map(|s| s.name.as_str()).collect();
    assert_eq!(failed, vec!["populate_users"]);
    assert_eq!(count(&pipeline, "FactSongPlays").await, 2);
    assert_eq!(count(&pipeline, "DimTime").await, 2);

    // checks still ran and passed on what was written
    assert!(report.checks_passed());
}

#[tokio::test]
async fn test_check_reports_duplicate_catalog_rows() {
    // two identical catalog entries make the left join fan out
    let bucket = bucket(
        &[event(Some(17), "Ann", "free", "Muse", "Uprising", 304.84, TS_NOV_1)],
        &[
            song("S1", "Uprising", "A1", "Muse", 304.84),
            song("S9", "Uprising", "A9", "Muse", 304.84),
        ],
    );
    let pipeline = pipeline(&bucket);

    let report = pipeline.run(&RunOptions::default()).await;
    assert!(report.steps_succeeded());
    assert!(!report.checks_passed());
    assert!(!report.success());

    let checks = report.checks.unwrap();
    let failed: Vec<&str> = checks
        .results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(failed, vec!["row_parity_FactSongPlays__StagEvents"]);
}
