//! Cellar CLI - track a wine collection across storage zones and positions.
//!
//! This is the command-line interface for Cellar. It provides a
//! user-friendly front end to the core inventory library.

mod app;
mod cli;
mod commands;
mod config;
mod output;

use clap::Parser;

use app::AppContext;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    match &cli.command {
        Commands::Init(args) => commands::init::run(&ctx, args),
        Commands::Storage(args) => commands::storage::run(&ctx, args),
        Commands::Positions(args) => commands::positions::run(&ctx, args),
        Commands::Add(args) => commands::add::run(&ctx, args),
        Commands::List(args) => commands::list::run(&ctx, args),
        Commands::Show(args) => commands::show::run(&ctx, args),
        Commands::Consume(args) => commands::consume::run(&ctx, args),
        Commands::Move(args) => commands::move_wine::run(&ctx, args),
        Commands::Delete(args) => commands::delete::run(&ctx, args),
        Commands::Check => commands::check::run(&ctx),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
