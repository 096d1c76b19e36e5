//! Application context for the Cellar CLI.
//!
//! Bundles the parsed CLI arguments with the lazily-loaded config so
//! command handlers take one explicit context instead of ambient state.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use cellar_core::storage::{CellarStore, SqliteStore};

use crate::cli::Cli;
use crate::config::CellarConfig;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<CellarConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&CellarConfig> {
        self.config.get_or_try_init(CellarConfig::load)
    }

    /// Resolve the database path: CLI flag first, then config.
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(ref path) = self.cli.database {
            return Ok(PathBuf::from(path));
        }
        if let Some(ref path) = self.config()?.database.path {
            return Ok(PathBuf::from(path));
        }
        Err(anyhow::anyhow!(
            "No database path provided. Use --database, set CELLAR_DB, or configure one."
        ))
    }

    /// Open the inventory database.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.database_path()?;
        Ok(SqliteStore::open(&path)?)
    }
}
