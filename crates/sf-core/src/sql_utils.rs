//! SQL identifier and literal quoting utilities
//!
//! Every statement Starflow renders goes through these helpers, so catalog
//! names keep their case and configuration values (URIs, role ARNs) cannot
//! break out of their string literals.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use sf_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("StagEvents"), r#""StagEvents""#);
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote an identifier with an optional table alias prefix (`e."artist"`).
///
/// Aliases are emitted bare; they are always short lowercase names chosen by
/// the statement definitions.
pub fn quote_column(qualifier: Option<&str>, column: &str) -> String {
    match qualifier {
        Some(alias) => format!("{}.{}", alias, quote_ident(column)),
        None => quote_ident(column),
    }
}

/// Split a potentially schema-qualified table name into (schema, table).
///
/// Uses the last `.` as the separator. If no `.` is present, returns
/// `("main", name)` as the default schema.
///
/// # Examples
/// ```
/// use sf_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("DimUsers"), ("main", "DimUsers"));
/// assert_eq!(split_qualified_name("dwh.DimUsers"), ("dwh", "DimUsers"));
/// ```
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    if let Some(pos) = name.rfind('.') {
        (&name[..pos], &name[pos + 1..])
    } else {
        ("main", name)
    }
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a value as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
