//! Runtime context for CLI commands

use anyhow::{Context, Result};
use sf_core::{Config, DbType};
use sf_db::{DuckDbBackend, Warehouse};
use sf_pipeline::{LoadConfig, Pipeline};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Load the project configuration named by the global arguments
pub(crate) fn load_config(args: &GlobalArgs) -> Result<Config> {
    match &args.config {
        Some(config_path) => {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")
        }
        None => Config::load_from_dir(Path::new(&args.project_dir))
            .context("Failed to load project configuration"),
    }
}

/// Directory that relative paths in the configuration are resolved against:
/// the config file's directory when `--config` is given, else the project dir
pub(crate) fn project_root(args: &GlobalArgs) -> PathBuf {
    match &args.config {
        Some(config_path) => Path::new(config_path)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        None => PathBuf::from(&args.project_dir),
    }
}

/// Configuration plus an open warehouse connection
pub(crate) struct RuntimeContext {
    pub(crate) config: Config,
    pub(crate) target: Option<String>,
    /// Directory relative paths in `config` resolve against
    pub(crate) root: PathBuf,
    pub(crate) warehouse: Arc<dyn Warehouse>,
}

impl RuntimeContext {
    /// Load configuration and connect to the target's warehouse
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self> {
        let config = load_config(args)?;
        let target = Config::resolve_target(args.target.as_deref());
        let root = project_root(args);
        let db_config = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database configuration")?;
        let db_path = db_config.path_absolute(&root);

        let warehouse: Arc<dyn Warehouse> = match db_config.db_type {
            DbType::DuckDb => {
                Arc::new(DuckDbBackend::new(&db_path).context("Failed to connect to database")?)
            }
        };
        log::debug!(
            "Connected to {} at {} (target: {})",
            warehouse.db_type(),
            db_path,
            target.as_deref().unwrap_or("default")
        );

        Ok(Self {
            config,
            target,
            root,
            warehouse,
        })
    }

    pub(crate) fn load_config(&self) -> Result<LoadConfig> {
        let load_config = LoadConfig::from_config(&self.config, self.target.as_deref())
            .context("Failed to resolve load configuration")?;
        Ok(load_config.anchored(&self.root))
    }

    pub(crate) fn pipeline(&self) -> Result<Pipeline> {
        Ok(
            Pipeline::new(Arc::clone(&self.warehouse), self.load_config()?)
                .with_name(&self.config.name),
        )
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
