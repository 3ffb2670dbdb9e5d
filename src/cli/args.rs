use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::store::{Category, CategorySet};

/// appdata-cleaner: per-application config, cache and data usage
#[derive(Parser, Debug)]
#[command(
    name = "appdata-cleaner",
    version,
    about = "Measure and clean per-application config, cache and local data",
    long_about = "appdata-cleaner finds the config, cache and local-data directories of\n\
                   known and harbour-* applications, shows how much space each one uses,\n\
                   and deletes leftovers of apps that are no longer installed.",
    after_help = "EXAMPLES:\n  \
        appdata-cleaner list                          All apps, unused first\n  \
        appdata-cleaner list --unused --sort size     Leftovers, largest first\n  \
        appdata-cleaner totals --format json          Aggregate usage as JSON\n  \
        appdata-cleaner delete harbour-foo -c cache   Clear one app's cache\n  \
        appdata-cleaner delete-unused --dry-run       Preview cleaning all leftovers\n  \
        appdata-cleaner config show                   Show effective configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH", env = "APPDATA_CLEANER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode: minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan and list applications with their data usage
    List {
        /// Sort order
        #[arg(long, default_value = "usage")]
        sort: EntrySort,

        /// Only show applications that are not installed
        #[arg(long)]
        unused: bool,

        /// Show the paths owned by each application
        #[arg(long)]
        detailed: bool,
    },

    /// Scan and show aggregate totals
    Totals,

    /// Delete data of one application
    Delete {
        /// Application name (as shown by `list`)
        name: String,

        /// Categories to delete
        #[arg(long, short, value_delimiter = ',', default_value = "config,cache,data")]
        categories: Vec<CategoryArg>,

        /// Measure and report without deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Delete data of every application that is not installed
    DeleteUnused {
        /// Categories to delete
        #[arg(long, short, value_delimiter = ',', default_value = "config,cache,data")]
        categories: Vec<CategoryArg>,

        /// Measure and report without deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file if none exists
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntrySort {
    /// Unused first, then by title
    Usage,
    Name,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Config,
    Cache,
    Data,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Config => Category::Config,
            CategoryArg::Cache => Category::Cache,
            CategoryArg::Data => Category::LocalData,
        }
    }
}

/// Collapse repeated `--categories` values into a set
pub fn category_set(args: &[CategoryArg]) -> CategorySet {
    args.iter().copied().map(Category::from).collect()
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
