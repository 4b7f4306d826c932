//! Command-line interface

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub mod commands;
pub mod formatters;
pub mod output;

pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "tracereverse",
    version,
    about = "Browse, search and track TraceReverse practice projects",
    propagate_version = true
)]
pub struct Cli {
    /// Machine-readable JSON output (same as --format json)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (replaces the global and project config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User whose progress and library are read and written
    #[arg(long, global = true, env = "TRACEREVERSE_USER", default_value = "local")]
    pub user: String,

    /// Keep state in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Format chosen on the command line, if any.
    #[must_use]
    pub fn explicit_format(&self) -> Option<OutputFormat> {
        if self.robot {
            Some(OutputFormat::Json)
        } else {
            self.format
        }
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.explicit_format().unwrap_or_default()
    }

    #[must_use]
    pub fn is_robot(&self) -> bool {
        self.output_format().is_robot()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search and filter projects
    Search(commands::search::SearchArgs),

    /// Show one project with its derived classification
    Show(commands::show::ShowArgs),

    /// List the values each search filter accepts
    Options(commands::options::OptionsArgs),

    /// Suggest titles and technologies for a partial query
    Suggest(commands::suggest::SuggestArgs),

    /// Browse and follow learning paths
    Paths(commands::paths::PathsArgs),

    /// Track progress through individual projects
    Progress(commands::progress::ProgressArgs),

    /// Manage completed and bookmarked projects
    Library(commands::library::LibraryArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn robot_flag_wins_over_format() {
        let cli = Cli::try_parse_from(["tracereverse", "--robot", "--format", "human", "options"])
            .unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Json);
        let cli = Cli::try_parse_from(["tracereverse", "options"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Human);
        assert_eq!(cli.user, "local");
    }
}
