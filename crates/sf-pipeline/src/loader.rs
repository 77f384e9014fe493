//! Bulk loader: object storage → staging tables
//!
//! Each load is a single statement, so a rejected row leaves the staging
//! table as it was. Redshift gets a `COPY`; the embedded engine gets an
//! `INSERT ... SELECT` over `read_json_objects` that extracts one JSON path
//! per column.

use crate::error::{PipelineError, PipelineResult};
use crate::jsonpaths::{column_path, parse_descriptor};
use crate::report::{Phase, StepResult};
use sf_core::config::path_absolute;
use sf_core::sql_utils::{quote_ident, quote_literal};
use sf_core::{Config, CoreResult, Dialect};
use sf_db::Warehouse;
use sf_schema::catalog::{STAG_EVENTS, STAG_SONGS};
use sf_schema::{ColumnType, TableDef};
use std::path::Path;
use std::time::Instant;

/// Access credential presented to object storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub role_arn: String,
}

impl Credential {
    pub fn iam_role(arn: impl Into<String>) -> Self {
        Self {
            role_arn: arn.into(),
        }
    }
}

/// How JSON keys map onto columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatDescriptor {
    /// Keys match column names
    Auto,
    /// JSONPaths file at this URI, one path per column
    JsonPaths(String),
}

/// How timestamp values are encoded in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Auto,
    EpochMillis,
}

/// Source files for one staging table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Prefix, file, or glob
    pub uri: String,
    /// Bucket region, when it differs from the warehouse's
    pub region: Option<String>,
}

impl Source {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }
}

/// Everything the load phase needs; passed explicitly rather than read
/// from process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    pub credential: Credential,
    pub log_data: Source,
    pub song_data: Source,
    /// JSONPaths descriptor for the event log
    pub log_jsonpath: String,
}

impl LoadConfig {
    /// Build from project configuration, applying target overrides
    pub fn from_config(config: &Config, target: Option<&str>) -> CoreResult<Self> {
        let role = config.get_iam_role(target)?;
        let s3 = config.get_s3_config(target)?;
        Ok(Self {
            credential: Credential::iam_role(role.arn),
            log_data: Source::new(s3.log_data).with_region(s3.region),
            song_data: Source::new(s3.song_data),
            log_jsonpath: s3.log_jsonpath,
        })
    }

    /// Resolve relative local sources and the descriptor against `root`
    pub fn anchored(mut self, root: &Path) -> Self {
        self.log_data.uri = path_absolute(&self.log_data.uri, root);
        self.song_data.uri = path_absolute(&self.song_data.uri, root);
        self.log_jsonpath = path_absolute(&self.log_jsonpath, root);
        self
    }

    pub fn events_job(&self) -> LoadJob {
        LoadJob::staging_events(
            self.log_data.clone(),
            FormatDescriptor::JsonPaths(self.log_jsonpath.clone()),
        )
    }

    pub fn songs_job(&self) -> LoadJob {
        LoadJob::staging_songs(self.song_data.clone())
    }
}

/// A single bulk load into one staging table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJob {
    pub table: &'static TableDef,
    pub source: Source,
    pub format: FormatDescriptor,
    pub time_format: TimeFormat,
}

impl LoadJob {
    /// Event log load; timestamps arrive as epoch milliseconds
    pub fn staging_events(source: Source, format: FormatDescriptor) -> Self {
        Self {
            table: &STAG_EVENTS,
            source,
            format,
            time_format: TimeFormat::EpochMillis,
        }
    }

    /// Song catalog load; documents are self-describing
    pub fn staging_songs(source: Source) -> Self {
        Self {
            table: &STAG_SONGS,
            source,
            format: FormatDescriptor::Auto,
            time_format: TimeFormat::Auto,
        }
    }

    /// Render the load statement for `dialect`.
    ///
    /// The DuckDB rendering reads a JSONPaths descriptor from local disk.
    pub fn render(&self, dialect: Dialect, credential: &Credential) -> PipelineResult<String> {
        match dialect {
            Dialect::Redshift => Ok(self.render_copy(credential)),
            Dialect::DuckDb => {
                let paths = match &self.format {
                    FormatDescriptor::Auto => self
                        .table
                        .columns
                        .iter()
                        .map(|c| column_path(c.name))
                        .collect(),
                    FormatDescriptor::JsonPaths(uri) => {
                        parse_descriptor(uri, &read_descriptor(uri)?, self.table)?
                    }
                };
                Ok(self.render_insert(&paths))
            }
        }
    }

    fn render_copy(&self, credential: &Credential) -> String {
        let mut sql = format!(
            "COPY {}\nFROM {}\nIAM_ROLE {}",
            quote_ident(self.table.name),
            quote_literal(&self.source.uri),
            quote_literal(&credential.role_arn)
        );
        if let Some(region) = &self.source.region {
            sql.push_str(&format!("\nREGION {}", quote_literal(region)));
        }
        let format = match &self.format {
            FormatDescriptor::Auto => quote_literal("auto"),
            FormatDescriptor::JsonPaths(uri) => quote_literal(uri),
        };
        sql.push_str(&format!("\nFORMAT AS JSON {format}"));
        if self.time_format == TimeFormat::EpochMillis {
            sql.push_str("\nTIMEFORMAT AS 'epochmillisecs'");
        }
        sql
    }

    fn render_insert(&self, paths: &[String]) -> String {
        let columns: Vec<String> = self
            .table
            .columns
            .iter()
            .map(|c| quote_ident(c.name))
            .collect();
        let values: Vec<String> = self
            .table
            .columns
            .iter()
            .zip(paths)
            .map(|(column, path)| {
                let raw = format!("json_extract_string(json, {})", quote_literal(path));
                // Empty strings in non-text columns load as NULL; any other
                // unconvertible value fails the whole statement.
                let value = match (column.ty, self.time_format) {
                    (ColumnType::Varchar, _) => raw,
                    (ColumnType::Timestamp, TimeFormat::EpochMillis) => {
                        format!("epoch_ms(CAST(NULLIF({raw}, '') AS BIGINT))")
                    }
                    (ty, _) => format!(
                        "CAST(NULLIF({raw}, '') AS {})",
                        ty.sql_type(Dialect::DuckDb)
                    ),
                };
                format!("{value} AS {}", quote_ident(column.name))
            })
            .collect();

        format!(
            "INSERT INTO {} ({})\nSELECT {}\nFROM read_json_objects({}, format = 'auto')",
            quote_ident(self.table.name),
            columns.join(", "),
            values.join(",\n       "),
            quote_literal(&self.source.uri)
        )
    }
}

fn read_descriptor(uri: &str) -> PipelineResult<String> {
    let path = uri.strip_prefix("file://").unwrap_or(uri);
    if path.contains("://") {
        return Err(PipelineError::Descriptor {
            uri: uri.to_string(),
            message: "only local descriptors can be read for the embedded engine".to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| PipelineError::Descriptor {
        uri: uri.to_string(),
        message: e.to_string(),
    })
}

/// Run one load job and report it as a step
pub async fn run_load(
    warehouse: &dyn Warehouse,
    job: &LoadJob,
    credential: &Credential,
) -> PipelineResult<StepResult> {
    let start = Instant::now();
    let sql = job.render(warehouse.dialect(), credential)?;
    log::info!("Loading {} from {}", job.table.name, job.source.uri);

    let rows = warehouse
        .execute(&sql)
        .await
        .map_err(|source| PipelineError::Load {
            table: job.table.name.to_string(),
            source,
        })?;

    log::info!("Loaded {} rows into {}", rows, job.table.name);
    Ok(StepResult::success(
        Phase::Load,
        "load",
        job.table.name,
        Some(rows),
        start.elapsed(),
    ))
}

/// Load the event log into `StagEvents`, converting epoch-millisecond
/// timestamps and mapping keys through `format_descriptor`.
pub async fn load_staging_events(
    warehouse: &dyn Warehouse,
    source: &Source,
    credential: &Credential,
    format_descriptor: &FormatDescriptor,
) -> PipelineResult<StepResult> {
    let job = LoadJob::staging_events(source.clone(), format_descriptor.clone());
    run_load(warehouse, &job, credential).await
}

/// Load the song catalog into `StagSongs`
pub async fn load_staging_songs(
    warehouse: &dyn Warehouse,
    source: &Source,
    credential: &Credential,
) -> PipelineResult<StepResult> {
    let job = LoadJob::staging_songs(source.clone());
    run_load(warehouse, &job, credential).await
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
