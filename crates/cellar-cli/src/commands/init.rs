use std::path::PathBuf;

use cellar_core::storage::{CellarStore, SqliteStore};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::CellarConfig;

pub fn run(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let path = match &args.path {
        Some(value) => PathBuf::from(value),
        None => ctx.database_path()?,
    };

    SqliteStore::create(&path)?;

    if args.save_config {
        let mut config = CellarConfig::load()?;
        config.database.path = Some(path.to_string_lossy().to_string());
        config.save()?;
    }

    if !ctx.quiet() {
        println!("Initialized inventory database at {}", path.display());
    }
    Ok(())
}
