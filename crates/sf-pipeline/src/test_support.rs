//! Fixtures shared by the pipeline tests: a local "bucket" of JSON files
//! shaped like the production event log and song catalog.

use crate::loader::{Credential, LoadConfig, Source};
use serde_json::{json, Value};
use sf_db::DuckDbBackend;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Descriptor for the event log, in `StagEvents` column order
pub(crate) const EVENTS_JSONPATHS: &str = r#"{
    "jsonpaths": [
        "$['artist']",
        "$['auth']",
        "$['firstName']",
        "$['gender']",
        "$['itemInSession']",
        "$['lastName']",
        "$['length']",
        "$['level']",
        "$['location']",
        "$['method']",
        "$['page']",
        "$['registration']",
        "$['sessionId']",
        "$['song']",
        "$['status']",
        "$['ts']",
        "$['userAgent']",
        "$['userId']"
    ]
}"#;

/// 2018-11-01 21:05:52 UTC
pub(crate) const TS_NOV_1: i64 = 1_541_106_352_000;
/// 2018-11-05 06:00:00 UTC
pub(crate) const TS_NOV_5: i64 = 1_541_397_600_000;

pub(crate) const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/dwhRole";

/// One `NextSong` event
pub(crate) fn event(
    user_id: Option<i64>,
    first_name: &str,
    level: &str,
    artist: &str,
    song: &str,
    length: f64,
    ts: i64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": first_name,
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Lee",
        "length": length,
        "level": level,
        "location": "Portland, OR",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540919166796.0,
        "sessionId": 42,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0",
        // logged-out events carry an empty string rather than null
        "userId": user_id.map(|id| json!(id.to_string())).unwrap_or(json!("")),
    })
}

/// One song catalog document
pub(crate) fn song(song_id: &str, title: &str, artist_id: &str, artist_name: &str, duration: f64) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": 45.5,
        "artist_longitude": -122.6,
        "artist_location": "Portland, OR",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 2004,
    })
}

/// Local bucket holding the fixture files
pub(crate) struct Bucket {
    pub(crate) _dir: TempDir,
    pub(crate) config: LoadConfig,
}

/// Write newline-delimited events, one file per song, and the descriptor
pub(crate) fn bucket(events: &[Value], songs: &[Value]) -> Bucket {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let log_dir = root.join("log_data");
    std::fs::create_dir_all(&log_dir).unwrap();
    let lines: Vec<String> = events.iter().map(|e| e.to_string()).collect();
    std::fs::write(log_dir.join("2018-11-01-events.json"), lines.join("\n")).unwrap();

    let song_dir = root.join("song_data");
    std::fs::create_dir_all(&song_dir).unwrap();
    for (i, doc) in songs.iter().enumerate() {
        std::fs::write(song_dir.join(format!("song_{i}.json")), doc.to_string()).unwrap();
    }

    let jsonpath = root.join("log_json_path.json");
    std::fs::write(&jsonpath, EVENTS_JSONPATHS).unwrap();

    let config = LoadConfig {
        credential: Credential::iam_role(ROLE_ARN),
        log_data: Source::new(glob(&log_dir)),
        song_data: Source::new(glob(&song_dir)),
        log_jsonpath: jsonpath.display().to_string(),
    };
    Bucket { _dir: dir, config }
}

fn glob(dir: &Path) -> String {
    dir.join("*.json").display().to_string()
}

pub(crate) fn warehouse() -> Arc<DuckDbBackend> {
    Arc::new(DuckDbBackend::in_memory().unwrap())
}
