use super::*;
use crate::test_support::EVENTS_JSONPATHS;
use sf_schema::catalog::{STAG_EVENTS, STAG_SONGS};

#[test]
fn test_parse_bracket_and_dot_notation() {
    assert_eq!(
        parse_path("$['status']"),
        Some(vec![PathSegment::Key("status".to_string())])
    );
    assert_eq!(
        parse_path(r#"$["a"]["b c"]"#),
        Some(vec![
            PathSegment::Key("a".to_string()),
            PathSegment::Key("b c".to_string()),
        ])
    );
    assert_eq!(
        parse_path("$.items[2].name"),
        Some(vec![
            PathSegment::Key("items".to_string()),
            PathSegment::Index(2),
            PathSegment::Key("name".to_string()),
        ])
    );
}

#[test]
fn test_parse_rejects_malformed() {
    assert_eq!(parse_path("status"), None);
    assert_eq!(parse_path("$"), None);
    assert_eq!(parse_path("$['open"), None);
    assert_eq!(parse_path("$[x]"), None);
    assert_eq!(parse_path("$.*"), None);
}

#[test]
fn test_render_path() {
    assert_eq!(
        render_path(&[PathSegment::Key("firstName".to_string())]),
        Some("$.firstName".to_string())
    );
    assert_eq!(
        render_path(&[
            PathSegment::Key("user agent".to_string()),
            PathSegment::Index(0)
        ]),
        Some(r#"$."user agent"[0]"#.to_string())
    );
}

#[test]
fn test_events_descriptor_maps_status_onto_stats() {
    let paths = parse_descriptor("log_json_path.json", EVENTS_JSONPATHS, &STAG_EVENTS).unwrap();
    assert_eq!(paths.len(), STAG_EVENTS.columns.len());
    let stats = STAG_EVENTS
        .columns
        .iter()
        .position(|c| c.name == "stats")
        .unwrap();
    assert_eq!(paths[stats], "$.status");
    assert_eq!(paths[0], "$.artist");
}

#[test]
fn test_descriptor_count_mismatch() {
    let err = parse_descriptor("x.json", EVENTS_JSONPATHS, &STAG_SONGS).unwrap_err();
    assert!(matches!(err, PipelineError::Descriptor { .. }));
    assert!(err.to_string().contains("18 paths for 10 columns"));
}

#[test]
fn test_descriptor_not_json() {
    let err = parse_descriptor("x.json", "jsonpaths:", &STAG_EVENTS).unwrap_err();
    assert!(err.to_string().starts_with("[P003]"));
}
