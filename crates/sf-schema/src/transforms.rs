//! Staging → star schema transform statements

use crate::catalog::{
    DIM_ARTISTS, DIM_SONGS, DIM_TIME, DIM_USERS, FACT_SONGPLAYS, STAG_EVENTS, STAG_SONGS,
};
use crate::statement::{DatePart, Expr, InsertSelect, Join, Select, TableRef};
use crate::types::TableDef;
use std::fmt;

/// One population step of the transform phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Users,
    Songs,
    Artists,
    Time,
    SongPlays,
}

impl Transform {
    /// Dimension populations; independent of each other.
    pub const DIMENSIONS: [Transform; 4] = [
        Transform::Users,
        Transform::Songs,
        Transform::Artists,
        Transform::Time,
    ];

    /// Every population in execution order.
    pub const ALL: [Transform; 5] = [
        Transform::Users,
        Transform::Songs,
        Transform::Artists,
        Transform::Time,
        Transform::SongPlays,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Transform::Users => "populate_users",
            Transform::Songs => "populate_songs",
            Transform::Artists => "populate_artists",
            Transform::Time => "populate_time",
            Transform::SongPlays => "populate_songplays",
        }
    }

    pub fn target(self) -> &'static TableDef {
        match self {
            Transform::Users => &DIM_USERS,
            Transform::Songs => &DIM_SONGS,
            Transform::Artists => &DIM_ARTISTS,
            Transform::Time => &DIM_TIME,
            Transform::SongPlays => &FACT_SONGPLAYS,
        }
    }

    pub fn statement(self) -> InsertSelect {
        match self {
            Transform::Users => users_insert(),
            Transform::Songs => songs_insert(),
            Transform::Artists => artists_insert(),
            Transform::Time => time_insert(),
            Transform::SongPlays => songplays_insert(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distinct users seen in the event log.
///
/// A user whose `level` changes mid-dataset produces one row per level; on
/// engines that enforce the key this fails the step rather than picking one.
pub fn users_insert() -> InsertSelect {
    InsertSelect {
        target: &DIM_USERS,
        columns: vec!["user_id", "first_name", "last_name", "gender", "level"],
        select: Select {
            distinct: true,
            projections: vec![
                Expr::col("userId"),
                Expr::col("firstName"),
                Expr::col("lastName"),
                Expr::col("gender"),
                Expr::col("level"),
            ],
            from: TableRef::new(&STAG_EVENTS),
            joins: vec![],
            filter: Some(Expr::col("userId").is_not_null()),
        },
    }
}

pub fn songs_insert() -> InsertSelect {
    InsertSelect {
        target: &DIM_SONGS,
        columns: vec!["song_id", "title", "artist_id", "year", "duration"],
        select: Select {
            distinct: true,
            projections: vec![
                Expr::col("song_id"),
                Expr::col("title"),
                Expr::col("artist_id"),
                Expr::col("year"),
                Expr::col("duration"),
            ],
            from: TableRef::new(&STAG_SONGS),
            joins: vec![],
            filter: Some(Expr::col("song_id").is_not_null()),
        },
    }
}

pub fn artists_insert() -> InsertSelect {
    InsertSelect {
        target: &DIM_ARTISTS,
        columns: vec!["artist_id", "name", "location", "latitude", "longitude"],
        select: Select {
            distinct: true,
            projections: vec![
                Expr::col("artist_id"),
                Expr::col("artist_name"),
                Expr::col("artist_location"),
                Expr::col("artist_latitude"),
                Expr::col("artist_longitude"),
            ],
            from: TableRef::new(&STAG_SONGS),
            joins: vec![],
            filter: Some(Expr::col("artist_id").is_not_null()),
        },
    }
}

/// One row per distinct event timestamp.
///
/// Not filtered on `ts`: a null timestamp is a load defect and must reach
/// the key constraint instead of disappearing.
pub fn time_insert() -> InsertSelect {
    let ts = || Expr::col("ts");
    InsertSelect {
        target: &DIM_TIME,
        columns: vec![
            "start_time",
            "hour",
            "day",
            "week",
            "month",
            "year",
            "weekday",
        ],
        select: Select {
            distinct: true,
            projections: vec![
                ts(),
                ts().extract(DatePart::Hour),
                ts().extract(DatePart::Day),
                ts().extract(DatePart::Week),
                ts().extract(DatePart::Month),
                ts().extract(DatePart::Year),
                ts().extract(DatePart::DayOfWeek),
            ],
            from: TableRef::new(&STAG_EVENTS),
            joins: vec![],
            filter: None,
        },
    }
}

/// Every event, matched to the catalog on exact (artist, title, duration).
///
/// Unmatched events keep null `song_id` / `artist_id`. The match is plain
/// equality: differences in case, whitespace, or float rounding leave the
/// fact unresolved.
pub fn songplays_insert() -> InsertSelect {
    InsertSelect {
        target: &FACT_SONGPLAYS,
        columns: vec![
            "start_time",
            "user_id",
            "level",
            "song_id",
            "artist_id",
            "session_id",
            "location",
            "user_agent",
        ],
        select: Select {
            distinct: false,
            projections: vec![
                Expr::qcol("e", "ts"),
                Expr::qcol("e", "userId"),
                Expr::qcol("e", "level"),
                Expr::qcol("s", "song_id"),
                Expr::qcol("s", "artist_id"),
                Expr::qcol("e", "sessionId"),
                Expr::qcol("e", "location"),
                Expr::qcol("e", "userAgent"),
            ],
            from: TableRef::aliased(&STAG_EVENTS, "e"),
            joins: vec![Join {
                table: TableRef::aliased(&STAG_SONGS, "s"),
                on: Expr::and(vec![
                    Expr::qcol("e", "artist").equals(Expr::qcol("s", "artist_name")),
                    Expr::qcol("e", "song").equals(Expr::qcol("s", "title")),
                    Expr::qcol("e", "length").equals(Expr::qcol("s", "duration")),
                ]),
            }],
            filter: None,
        },
    }
}

#[cfg(test)]
#[path = "transforms_test.rs"]
mod tests;
