use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use cellar_core::VERSION;

/// Cellar - track a wine collection across storage zones and positions
#[derive(Parser)]
#[command(name = "cellar")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the inventory database
    #[arg(short, long, global = true, env = "CELLAR_DB")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the database will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Remember this database path in the config file
    #[arg(long)]
    pub save_config: bool,
}

/// Arguments for `storage create`
#[derive(Args)]
pub struct StorageCreateArgs {
    /// Description of the storage unit
    #[arg(value_name = "DESCRIPTION")]
    pub description: String,

    /// Zone descriptor as NAME:COUNT (repeatable, e.g. --zone A:4)
    #[arg(long = "zone", value_name = "NAME:COUNT")]
    pub zones: Vec<String>,

    /// JSON file with explicit zone descriptors
    #[arg(long, value_name = "FILE")]
    pub zones_file: Option<String>,

    /// Use a specific storage id instead of generating one
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Subcommand)]
pub enum StorageCommands {
    /// Define a new storage unit and enumerate its positions
    Create(StorageCreateArgs),

    /// Show configured storage units and their occupancy
    Show,
}

/// Arguments for the `storage` command group
#[derive(Args)]
pub struct StorageArgs {
    #[command(subcommand)]
    pub command: StorageCommands,
}

/// Arguments for the `positions` command
#[derive(Args)]
pub struct PositionsArgs {
    /// Only show unoccupied positions
    #[arg(long)]
    pub available: bool,

    /// Filter by storage unit id
    #[arg(long)]
    pub storage: Option<String>,

    /// Filter by zone name
    #[arg(long)]
    pub zone: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Wine name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Wine description (grape, region, tasting notes)
    #[arg(long, default_value = "")]
    pub description: String,

    /// Target position id
    #[arg(long)]
    pub position: Option<String>,

    /// Intake date override (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Include consumed wines
    #[arg(long)]
    pub all: bool,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Wine id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `consume` command
#[derive(Args)]
pub struct ConsumeArgs {
    /// Wine id
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `move` command
#[derive(Args)]
pub struct MoveArgs {
    /// Wine id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Target position id
    #[arg(value_name = "POSITION")]
    pub position: String,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Wine id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new inventory database
    Init(InitArgs),

    /// Manage storage units
    Storage(StorageArgs),

    /// List positions
    Positions(PositionsArgs),

    /// Add a wine to the collection
    Add(AddArgs),

    /// List wines
    List(ListArgs),

    /// Show a specific wine by id
    Show(ShowArgs),

    /// Mark a wine consumed, freeing its position
    Consume(ConsumeArgs),

    /// Move a wine to a new position
    Move(MoveArgs),

    /// Delete a wine permanently
    Delete(DeleteArgs),

    /// Check inventory integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
