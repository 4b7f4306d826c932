//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

pub mod library;
pub mod options;
pub mod paths;
pub mod progress;
pub mod search;
pub mod show;
pub mod suggest;

use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::cli::output::emit_robot;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::Options(args) => options::run(ctx, args),
        Commands::Suggest(args) => suggest::run(ctx, args),
        Commands::Paths(args) => paths::run(ctx, args),
        Commands::Progress(args) => progress::run(ctx, args),
        Commands::Library(args) => library::run(ctx, args),
    }
}

/// Robot output honoring `robot.include_metadata`.
fn emit(ctx: &AppContext, data: impl Serialize) -> Result<()> {
    emit_robot(data, ctx.config.robot.include_metadata)
}
