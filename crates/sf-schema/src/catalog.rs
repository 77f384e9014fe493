//! The seven warehouse tables
//!
//! Staging tables mirror the raw JSON sources column for column and are
//! spread EVEN for parallel ingest. The small reference dimensions (users,
//! artists, time) are replicated to every node (ALL) so joins against the
//! fact table stay local. Keys are logical only: nothing here declares a
//! foreign key, so tables can be created and dropped in any order.

use crate::types::{Column, ColumnType, DistStyle, TableDef, TableKind};

use ColumnType::{BigInt, Float, Int, SmallInt, Timestamp, Varchar};

// =============================================================================
// Staging
// =============================================================================

/// One row per raw user-activity log event. Column order matches the
/// JSONPaths descriptor used to load it.
pub static STAG_EVENTS: TableDef = TableDef {
    name: "StagEvents",
    kind: TableKind::Staging,
    dist_style: DistStyle::Even,
    columns: &[
        Column::new("artist", Varchar),
        Column::new("auth", Varchar),
        Column::new("firstName", Varchar),
        Column::new("gender", Varchar),
        Column::new("itemInSession", Int),
        Column::new("lastName", Varchar),
        Column::new("length", Float),
        Column::new("level", Varchar),
        Column::new("location", Varchar),
        Column::new("method", Varchar),
        Column::new("page", Varchar),
        Column::new("registration", Float),
        Column::new("sessionId", Int),
        Column::new("song", Varchar),
        Column::new("stats", Int),
        Column::new("ts", Timestamp),
        Column::new("userAgent", Varchar),
        Column::new("userId", Int),
    ],
};

/// One row per song-catalog record.
pub static STAG_SONGS: TableDef = TableDef {
    name: "StagSongs",
    kind: TableKind::Staging,
    dist_style: DistStyle::Even,
    columns: &[
        Column::new("num_songs", Int),
        Column::new("artist_id", Varchar),
        Column::new("artist_latitude", Float),
        Column::new("artist_longitude", Float),
        Column::new("artist_location", Varchar),
        Column::new("artist_name", Varchar),
        Column::new("song_id", Varchar),
        Column::new("title", Varchar),
        Column::new("duration", Float),
        Column::new("year", SmallInt),
    ],
};

// =============================================================================
// Fact
// =============================================================================

pub static FACT_SONGPLAYS: TableDef = TableDef {
    name: "FactSongPlays",
    kind: TableKind::Fact,
    dist_style: DistStyle::Auto,
    columns: &[
        Column::primary_key("songplay_id", BigInt).identity(0, 1),
        Column::new("start_time", Timestamp),
        Column::new("user_id", Int),
        Column::new("level", Varchar),
        Column::new("song_id", Varchar),
        Column::new("artist_id", Varchar),
        Column::new("session_id", Int),
        Column::new("location", Varchar),
        Column::new("user_agent", Varchar),
    ],
};

// =============================================================================
// Dimensions
// =============================================================================

pub static DIM_USERS: TableDef = TableDef {
    name: "DimUsers",
    kind: TableKind::Dimension,
    dist_style: DistStyle::All,
    columns: &[
        Column::primary_key("user_id", Int),
        Column::new("first_name", Varchar),
        Column::new("last_name", Varchar),
        Column::new("gender", Varchar),
        Column::new("level", Varchar),
    ],
};

pub static DIM_SONGS: TableDef = TableDef {
    name: "DimSongs",
    kind: TableKind::Dimension,
    dist_style: DistStyle::Auto,
    columns: &[
        Column::primary_key("song_id", Varchar),
        Column::required("title", Varchar),
        Column::required("artist_id", Varchar),
        Column::required("year", SmallInt),
        Column::required("duration", Float),
    ],
};

pub static DIM_ARTISTS: TableDef = TableDef {
    name: "DimArtists",
    kind: TableKind::Dimension,
    dist_style: DistStyle::All,
    columns: &[
        Column::primary_key("artist_id", Varchar),
        Column::required("name", Varchar),
        Column::new("location", Varchar),
        Column::new("latitude", Float),
        Column::new("longitude", Float),
    ],
};

pub static DIM_TIME: TableDef = TableDef {
    name: "DimTime",
    kind: TableKind::Dimension,
    dist_style: DistStyle::All,
    columns: &[
        Column::primary_key("start_time", Timestamp),
        Column::required("hour", SmallInt),
        Column::required("day", SmallInt),
        Column::required("week", SmallInt),
        Column::required("month", SmallInt),
        Column::required("year", SmallInt),
        Column::required("weekday", SmallInt),
    ],
};

/// Every table, staging first.
pub static ALL_TABLES: &[&TableDef] = &[
    &STAG_EVENTS,
    &STAG_SONGS,
    &FACT_SONGPLAYS,
    &DIM_USERS,
    &DIM_SONGS,
    &DIM_ARTISTS,
    &DIM_TIME,
];

/// Find a table by name, ignoring ASCII case.
pub fn table(name: &str) -> Option<&'static TableDef> {
    ALL_TABLES
        .iter()
        .copied()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Tables of one kind, in catalog order.
pub fn tables_of_kind(kind: TableKind) -> impl Iterator<Item = &'static TableDef> {
    ALL_TABLES.iter().copied().filter(move |t| t.kind == kind)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
