use super::*;
use crate::test_support::warehouse;
use sf_db::DuckDbBackend;

async fn table_count(db: &DuckDbBackend) -> usize {
    db.query_count(
        "SELECT * FROM information_schema.tables WHERE table_schema = 'main'",
    )
    .await
    .unwrap()
}

#[test]
fn test_statement_order_follows_catalog() {
    let drops = drop_statements(Dialect::Redshift);
    let names: Vec<&str> = drops.iter().map(|(t, _)| t.name).collect();
    assert_eq!(
        names,
        vec![
            "StagEvents",
            "StagSongs",
            "FactSongPlays",
            "DimUsers",
            "DimSongs",
            "DimArtists",
            "DimTime"
        ]
    );
    assert_eq!(create_statements(Dialect::Redshift).len(), 7);
}

#[tokio::test]
async fn test_reset_creates_every_table_empty() {
    let db = warehouse();
    let mut report = RunReport::new("test", "duckdb");
    SchemaManager::new(db.as_ref())
        .reset(&mut report)
        .await
        .unwrap();

    for table in ALL_TABLES {
        assert!(db.relation_exists(table.name).await.unwrap(), "{}", table.name);
        let count = db
            .query_count(&format!("SELECT * FROM \"{}\"", table.name))
            .await
            .unwrap();
        assert_eq!(count, 0, "{}", table.name);
    }
    assert_eq!(table_count(&db).await, 7);

    // 7 drops then 7 creates
    assert_eq!(report.steps.len(), 14);
    assert!(report.steps[..7].iter().all(|s| s.name == "drop"));
    assert!(report.steps[7..].iter().all(|s| s.name == "create"));
    assert!(report.steps_succeeded());
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let db = warehouse();
    let manager = SchemaManager::new(db.as_ref());
    let mut report = RunReport::new("test", "duckdb");

    manager.reset(&mut report).await.unwrap();
    db.execute(r#"INSERT INTO "DimUsers" ("user_id", "level") VALUES (1, 'free')"#)
        .await
        .unwrap();
    manager.reset(&mut report).await.unwrap();

    assert_eq!(table_count(&db).await, 7);
    assert_eq!(db.query_count(r#"SELECT * FROM "DimUsers""#).await.unwrap(), 0);
    assert!(report.steps_succeeded());
}

#[tokio::test]
async fn test_create_all_tolerates_existing_tables() {
    let db = warehouse();
    let manager = SchemaManager::new(db.as_ref());
    let mut report = RunReport::new("test", "duckdb");

    manager.create_all(&mut report).await.unwrap();
    db.execute(r#"INSERT INTO "DimUsers" ("user_id", "level") VALUES (1, 'free')"#)
        .await
        .unwrap();
    manager.create_all(&mut report).await.unwrap();

    // existing rows survive a bare create
    assert_eq!(db.query_count(r#"SELECT * FROM "DimUsers""#).await.unwrap(), 1);
}

#[tokio::test]
async fn test_drop_all_on_empty_warehouse() {
    let db = warehouse();
    let mut report = RunReport::new("test", "duckdb");
    SchemaManager::new(db.as_ref())
        .drop_all(&mut report)
        .await
        .unwrap();
    assert_eq!(table_count(&db).await, 0);
}

#[tokio::test]
async fn test_songplay_ids_restart_after_reset() {
    let db = warehouse();
    let manager = SchemaManager::new(db.as_ref());
    let mut report = RunReport::new("test", "duckdb");
    let insert = r#"INSERT INTO "FactSongPlays" ("user_id") VALUES (1), (2)"#;

    manager.reset(&mut report).await.unwrap();
    db.execute(insert).await.unwrap();
    manager.reset(&mut report).await.unwrap();
    db.execute(insert).await.unwrap();

    let ids = db
        .query_rows(r#"SELECT "songplay_id" FROM "FactSongPlays" ORDER BY 1"#)
        .await
        .unwrap();
    assert_eq!(
        ids,
        vec![vec![Some("0".to_string())], vec![Some("1".to_string())]]
    );
}
