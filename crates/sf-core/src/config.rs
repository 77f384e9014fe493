//! Configuration types and parsing for starflow.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable consulted when `--target` is not given.
pub const TARGET_ENV_VAR: &str = "SF_TARGET";

/// Main project configuration from starflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// SQL dialect used when rendering statements with `sf plan`
    #[serde(default)]
    pub dialect: Dialect,

    /// Warehouse connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Role the warehouse assumes to read from object storage
    pub iam_role: IamRoleConfig,

    /// Object-storage locations of the raw data
    pub s3: S3Config,

    /// Post-run data-quality checks
    #[serde(default)]
    pub checks: ChecksConfig,

    /// Named target configurations (e.g., local, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// IAM role override
    #[serde(default)]
    pub iam_role: Option<IamRoleConfig>,

    /// Source locations override
    #[serde(default)]
    pub s3: Option<S3Config>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// Embedded DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl DatabaseConfig {
    /// Database path with a relative file path resolved against `root`
    pub fn path_absolute(&self, root: &Path) -> String {
        path_absolute(&self.path, root)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// SQL dialect statements are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Amazon Redshift: distribution styles, IDENTITY columns, COPY from S3
    #[default]
    Redshift,
    /// DuckDB: single node, sequences for identity, read_json for ingest
    DuckDb,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Redshift => write!(f, "redshift"),
            Dialect::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redshift" => Ok(Dialect::Redshift),
            "duckdb" => Ok(Dialect::DuckDb),
            other => Err(CoreError::ConfigInvalid {
                message: format!("unknown dialect '{other}' (expected redshift or duckdb)"),
            }),
        }
    }
}

/// `[IAM_ROLE]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IamRoleConfig {
    /// Role ARN passed to COPY
    pub arn: String,
}

/// `[S3]` section: where the raw event logs and song catalog live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct S3Config {
    /// Event log location (prefix or glob)
    pub log_data: String,

    /// Song catalog location (prefix or glob)
    pub song_data: String,

    /// JSONPaths file mapping event-log keys onto StagEvents columns
    pub log_jsonpath: String,

    /// Region of the event-log bucket, when it differs from the warehouse region
    #[serde(default)]
    pub region: Option<String>,
}

/// Post-run data-quality check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    /// Run checks after the transform phase
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of violating rows reported per check
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_limit: default_sample_limit(),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

const CONFIG_FILE_NAMES: [&str; 2] = ["starflow.yml", "starflow.yaml"];

/// Resolve a relative local path against a project root.
///
/// URIs (`s3://`, `file://`), absolute paths and `:memory:` are returned
/// unchanged.
pub fn path_absolute(path: &str, root: &Path) -> String {
    if path == ":memory:" || path.contains("://") || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_sample_limit() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        log::debug!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for starflow.yml or starflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for file_name in CONFIG_FILE_NAMES {
            let candidate = dir.join(file_name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration, including every target override
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        validate_iam_role(&self.iam_role, "iam_role")?;
        validate_s3(&self.s3, "s3")?;

        if self.checks.sample_limit == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "checks.sample_limit must be at least 1".to_string(),
            });
        }

        for (name, target) in &self.targets {
            if let Some(role) = &target.iam_role {
                validate_iam_role(role, &format!("targets.{name}.iam_role"))?;
            }
            if let Some(s3) = &target.s3 {
                validate_s3(s3, &format!("targets.{name}.s3"))?;
            }
        }

        Ok(())
    }

    /// Resolve the active target from the CLI flag, falling back to `SF_TARGET`
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get target configuration by name
    pub fn get_target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets
            .get(name)
            .ok_or_else(|| CoreError::TargetNotFound {
                name: name.to_string(),
                available: self.available_targets().join(", "),
            })
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .get_target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Get IAM role, optionally applying target overrides
    pub fn get_iam_role(&self, target: Option<&str>) -> CoreResult<IamRoleConfig> {
        match target {
            Some(name) => Ok(self
                .get_target(name)?
                .iam_role
                .clone()
                .unwrap_or_else(|| self.iam_role.clone())),
            None => Ok(self.iam_role.clone()),
        }
    }

    /// Get source locations, optionally applying target overrides
    pub fn get_s3_config(&self, target: Option<&str>) -> CoreResult<S3Config> {
        match target {
            Some(name) => Ok(self
                .get_target(name)?
                .s3
                .clone()
                .unwrap_or_else(|| self.s3.clone())),
            None => Ok(self.s3.clone()),
        }
    }
}

fn validate_iam_role(role: &IamRoleConfig, field: &str) -> CoreResult<()> {
    if !role.arn.starts_with("arn:") {
        return Err(CoreError::ConfigInvalid {
            message: format!("{field}.arn must be an ARN (got '{}')", role.arn),
        });
    }
    Ok(())
}

fn validate_s3(s3: &S3Config, field: &str) -> CoreResult<()> {
    let locations = [
        ("log_data", &s3.log_data),
        ("song_data", &s3.song_data),
        ("log_jsonpath", &s3.log_jsonpath),
    ];
    for (key, value) in locations {
        if value.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("{field}.{key} cannot be empty"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
