//! JSONPaths format descriptors
//!
//! A descriptor is a JSON document `{"jsonpaths": [...]}` whose entries map,
//! in order, onto the columns of the target table. Entries use bracket or dot
//! notation (`$['status']`, `$["a"]["b"]`, `$.song`, `$.items[0]`). The
//! embedded engine reads them translated to its own path syntax.

use crate::error::{PipelineError, PipelineResult};
use serde::Deserialize;
use sf_schema::TableDef;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonPathsFile {
    jsonpaths: Vec<String>,
}

/// One step of a JSON path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parse one path expression into its segments.
///
/// Returns `None` when the expression is not a plain member/index path.
pub fn parse_path(expr: &str) -> Option<Vec<PathSegment>> {
    let rest = expr.trim().strip_prefix('$')?;
    let chars: Vec<char> = rest.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                if end == start {
                    return None;
                }
                segments.push(PathSegment::Key(chars[start..end].iter().collect()));
                i = end;
            }
            '[' => {
                let quote = *chars.get(i + 1)?;
                if quote == '\'' || quote == '"' {
                    let start = i + 2;
                    let len = chars[start..].iter().position(|c| *c == quote)?;
                    let end = start + len;
                    if chars.get(end + 1) != Some(&']') {
                        return None;
                    }
                    segments.push(PathSegment::Key(chars[start..end].iter().collect()));
                    i = end + 2;
                } else {
                    let start = i + 1;
                    let len = chars[start..].iter().position(|c| *c == ']')?;
                    let digits: String = chars[start..start + len].iter().collect();
                    segments.push(PathSegment::Index(digits.parse().ok()?));
                    i = start + len + 1;
                }
            }
            _ => return None,
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

fn is_simple_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render segments in DuckDB JSON path syntax (`$.a."b c"[0]`)
pub fn render_path(segments: &[PathSegment]) -> Option<String> {
    let mut out = String::from("$");
    for segment in segments {
        match segment {
            PathSegment::Key(key) if is_simple_key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathSegment::Key(key) if !key.contains('"') => {
                out.push_str(&format!(".\"{key}\""));
            }
            PathSegment::Key(_) => return None,
            PathSegment::Index(idx) => out.push_str(&format!("[{idx}]")),
        }
    }
    Some(out)
}

/// Path for a top-level key named like the column (`auto` format)
pub fn column_path(column: &str) -> String {
    render_path(&[PathSegment::Key(column.to_string())])
        .unwrap_or_else(|| format!("$.{column}"))
}

/// Parse a descriptor document and return one engine path per column of
/// `table`, in column order.
pub fn parse_descriptor(uri: &str, text: &str, table: &TableDef) -> PipelineResult<Vec<String>> {
    let invalid = |message: String| PipelineError::Descriptor {
        uri: uri.to_string(),
        message,
    };

    let file: JsonPathsFile =
        serde_json::from_str(text).map_err(|e| invalid(format!("not a JSONPaths file: {e}")))?;

    if file.jsonpaths.len() != table.columns.len() {
        return Err(invalid(format!(
            "{} paths for {} columns of {}",
            file.jsonpaths.len(),
            table.columns.len(),
            table.name
        )));
    }

    file.jsonpaths
        .iter()
        .map(|expr| {
            parse_path(expr)
                .and_then(|segments| render_path(&segments))
                .ok_or_else(|| invalid(format!("unsupported path expression {expr}")))
        })
        .collect()
}

#[cfg(test)]
#[path = "jsonpaths_test.rs"]
mod tests;
