use super::*;
use crate::generator::catalog_checks;
use sf_core::Dialect;
use sf_db::DuckDbBackend;
use sf_schema::catalog::{ALL_TABLES, DIM_ARTISTS, DIM_USERS};
use sf_schema::ddl::create_table;

/// In-memory warehouse with the catalog tables created but without key
/// constraints, so duplicate and null keys can be staged.
async fn unconstrained_schema() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    for table in ALL_TABLES {
        for stmt in create_table(table, Dialect::DuckDb) {
            let stmt = stmt.replace(" PRIMARY KEY", "").replace(" NOT NULL", "");
            db.execute(&stmt).await.unwrap();
        }
    }
    db
}

#[tokio::test]
async fn test_unique_pass() {
    let db = unconstrained_schema().await;
    db.execute_batch(r#"INSERT INTO "DimUsers" ("user_id") VALUES (1), (2), (3);"#)
        .await
        .unwrap();

    let runner = CheckRunner::new(&db);
    let result = runner.run_check(&Check::unique(&DIM_USERS, "user_id")).await;

    assert!(result.passed);
    assert_eq!(result.failure_count, 0);
}

#[tokio::test]
async fn test_unique_fail() {
    let db = unconstrained_schema().await;
    db.execute_batch(
        r#"INSERT INTO "DimUsers" ("user_id", "level") VALUES (17, 'free'), (17, 'paid'), (2, 'free');"#,
    )
    .await
    .unwrap();

    let runner = CheckRunner::new(&db);
    let result = runner.run_check(&Check::unique(&DIM_USERS, "user_id")).await;

    assert!(!result.passed);
    assert_eq!(result.failure_count, 1);
    assert_eq!(result.sample_failures, vec!["17, 2".to_string()]);
}

#[tokio::test]
async fn test_not_null_fail() {
    let db = unconstrained_schema().await;
    db.execute_batch(
        r#"INSERT INTO "DimArtists" ("artist_id", "name") VALUES ('A1', 'Ann'), (NULL, 'Bob');"#,
    )
    .await
    .unwrap();

    let runner = CheckRunner::new(&db);
    let result = runner
        .run_check(&Check::not_null(&DIM_ARTISTS, "artist_id"))
        .await;

    assert!(!result.passed);
    assert_eq!(result.failure_count, 1);
    assert!(!result.sample_failures.is_empty());
}

#[tokio::test]
async fn test_missing_table_is_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let runner = CheckRunner::new(&db);
    let result = runner.run_check(&Check::unique(&DIM_USERS, "user_id")).await;

    assert!(!result.passed);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_sample_limit() {
    let db = unconstrained_schema().await;
    db.execute_batch(r#"INSERT INTO "DimUsers" ("user_id") VALUES (NULL), (NULL), (NULL);"#)
        .await
        .unwrap();

    let runner = CheckRunner::new(&db).with_sample_limit(2);
    let result = runner
        .run_check(&Check::not_null(&DIM_USERS, "user_id"))
        .await;

    assert_eq!(result.failure_count, 3);
    assert_eq!(result.sample_failures.len(), 2);
}

#[tokio::test]
async fn test_catalog_checks_on_empty_schema() {
    let db = unconstrained_schema().await;
    let runner = CheckRunner::new(&db);
    let (results, summary) = runner.run_all(&catalog_checks()).await;

    assert_eq!(results.len(), 9);
    assert!(summary.all_passed(), "{results:?}");
}

#[tokio::test]
async fn test_row_parity_fail() {
    let db = unconstrained_schema().await;
    db.execute_batch(r#"INSERT INTO "StagEvents" ("userId") VALUES (1), (2);"#)
        .await
        .unwrap();
    db.execute_batch(r#"INSERT INTO "FactSongPlays" ("user_id") VALUES (1);"#)
        .await
        .unwrap();

    let runner = CheckRunner::new(&db);
    let (results, summary) = runner.run_all(&catalog_checks()).await;

    assert_eq!(summary.total, 9);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors, 0);
    let parity = results.iter().find(|r| !r.passed).unwrap();
    assert_eq!(parity.check_type, CheckType::RowParity);
    assert_eq!(parity.sample_failures, vec!["1, 2".to_string()]);
}
