use super::*;

#[test]
fn test_catalog_has_seven_tables() {
    assert_eq!(ALL_TABLES.len(), 7);
    assert_eq!(tables_of_kind(TableKind::Staging).count(), 2);
    assert_eq!(tables_of_kind(TableKind::Dimension).count(), 4);
    assert_eq!(tables_of_kind(TableKind::Fact).count(), 1);
}

#[test]
fn test_every_table_validates() {
    for table in ALL_TABLES {
        table.validate().unwrap_or_else(|e| panic!("{e}"));
    }
}

#[test]
fn test_table_names_are_unique() {
    let mut names: Vec<String> = ALL_TABLES
        .iter()
        .map(|t| t.name.to_ascii_lowercase())
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), ALL_TABLES.len());
}

#[test]
fn test_lookup_ignores_case() {
    assert_eq!(table("dimusers").map(|t| t.name), Some("DimUsers"));
    assert_eq!(table("FACTSONGPLAYS").map(|t| t.name), Some("FactSongPlays"));
    assert!(table("DimDates").is_none());
}

#[test]
fn test_distribution_hints() {
    assert_eq!(STAG_EVENTS.dist_style, DistStyle::Even);
    assert_eq!(STAG_SONGS.dist_style, DistStyle::Even);
    assert_eq!(DIM_USERS.dist_style, DistStyle::All);
    assert_eq!(DIM_ARTISTS.dist_style, DistStyle::All);
    assert_eq!(DIM_TIME.dist_style, DistStyle::All);
    assert_eq!(DIM_SONGS.dist_style, DistStyle::Auto);
    assert_eq!(FACT_SONGPLAYS.dist_style, DistStyle::Auto);
}

#[test]
fn test_staging_tables_have_no_primary_key() {
    for table in tables_of_kind(TableKind::Staging) {
        assert!(table.primary_key().is_none(), "{}", table.name);
    }
}

#[test]
fn test_dimension_keys() {
    let keys: Vec<(&str, &str)> = tables_of_kind(TableKind::Dimension)
        .map(|t| (t.name, t.primary_key().map(|c| c.name).unwrap_or("")))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("DimUsers", "user_id"),
            ("DimSongs", "song_id"),
            ("DimArtists", "artist_id"),
            ("DimTime", "start_time"),
        ]
    );
}

#[test]
fn test_songplay_surrogate_key_counts_from_zero() {
    let identity = FACT_SONGPLAYS.identity_column().unwrap();
    assert_eq!(identity.name, "songplay_id");
    assert_eq!(identity.ty, ColumnType::BigInt);
    let counter = identity.identity.unwrap();
    assert_eq!((counter.seed, counter.step), (0, 1));
}

#[test]
fn test_dim_songs_attributes_mandatory() {
    for name in ["title", "artist_id", "year", "duration"] {
        assert!(!DIM_SONGS.column(name).unwrap().nullable, "{name}");
    }
}

#[test]
fn test_stag_events_load_order() {
    let names = STAG_EVENTS.column_names();
    assert_eq!(names.len(), 18);
    assert_eq!(names.first(), Some(&"artist"));
    assert_eq!(names.last(), Some(&"userId"));
    assert_eq!(names.iter().position(|n| *n == "ts"), Some(15));
}
