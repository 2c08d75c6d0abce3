// src/cli.rs

use crate::db::StoreKind;
use crate::models::FilterSpec;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "worklog - hours-worked register for machines and production lines",
    long_about = "worklog records hours worked by operators on machines and lines. Entries can be searched, exported to CSV or XLSX and deleted from the command line, or through the admin HTTP API started with `worklog serve`."
)]
pub struct Cli {
    /// Storage backend. Overrides WORKLOG_STORE.
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Data file path. Overrides WORKLOG_DATA_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Spreadsheet formats for 'export'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

/// Filters shared by search, export and bulk delete.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Exact machine identifier")]
    pub machine: Option<String>,

    #[arg(long, help = "Exact production line identifier")]
    pub line: Option<String>,

    #[arg(long, help = "Exact operator name")]
    pub operator: Option<String>,

    #[arg(long, help = "Case-insensitive text contained in the description")]
    pub contains: Option<String>,

    #[arg(long, help = "First date to include (DD/MM/YYYY or YYYY-MM-DD)")]
    pub from: Option<String>,

    #[arg(long, help = "Last date to include (DD/MM/YYYY or YYYY-MM-DD)")]
    pub to: Option<String>,
}

impl From<FilterArgs> for FilterSpec {
    fn from(args: FilterArgs) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        FilterSpec {
            machine: keep(args.machine),
            line: keep(args.line),
            operator: keep(args.operator),
            description_contains: keep(args.contains),
            date_from: keep(args.from),
            date_to: keep(args.to),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates the data file if it does not exist yet.
    Init,

    /// Records hours worked.
    Add {
        #[arg(short, long)]
        operator: String,
        #[arg(long)]
        machine: String,
        #[arg(short, long)]
        line: String,
        #[arg(long)]
        hours: f64,
        #[arg(short, long, help = "Work date (DD/MM/YYYY or YYYY-MM-DD, default: today)")]
        date: Option<String>,
        #[arg(short = 'm', long = "description")]
        description: String,
    },

    /// Lists entries matching the filters.
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },

    /// Deletes a single entry by its ID.
    Del {
        #[arg(help = "The numeric ID of the entry to delete")]
        id: i64,
    },

    /// Deletes every entry matching the filters.
    DelFiltered {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Deletes all entries.
    DelAll {
        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Writes entries matching the filters as CSV or XLSX.
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        #[arg(short, long, help = "Output file (default: stdout)")]
        out: Option<PathBuf>,
    },

    /// Imports entries from a JSON array file.
    Import { file: PathBuf },

    /// Lists names from the operator roster file.
    Operators,

    /// Starts the admin HTTP API.
    Serve,
}
