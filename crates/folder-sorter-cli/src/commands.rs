use clap::{Args, Parser, Subcommand};
use folder_sorter_core::Criterion;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "folder-sorter")]
#[command(about = "Filter, group and plan the layout of a scanned folder", long_about = None)]
pub struct Cli {
    /// Configuration file to load instead of ./Config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the file list, rules and duplicate flags come from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON array of scanned file records
    #[arg(long, value_name = "PATH")]
    pub files: PathBuf,

    /// JSON rule set; every file passes when omitted
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Cached `[path, flag]` pairs from an earlier duplicate scan
    #[arg(long, value_name = "PATH")]
    pub duplicates_cache: Option<PathBuf>,

    /// Treat the duplicate flags in the file list as the result of a scan
    #[arg(long)]
    pub duplicates_scanned: bool,
}

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Primary grouping criterion, e.g. `type` or `date_modified_yyyy_mm`
    #[arg(long, value_parser = parse_criterion)]
    pub by: Criterion,

    /// Secondary grouping criterion, or `none`
    #[arg(long, value_parser = parse_secondary)]
    pub then: Option<Secondary>,
}

impl GroupArgs {
    pub fn secondary(&self) -> Option<&Criterion> {
        self.then.as_ref().and_then(|then| then.0.as_ref())
    }
}

/// `--then` value; `none` parses to an empty second level.
#[derive(Debug, Clone, PartialEq)]
pub struct Secondary(pub Option<Criterion>);

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the files that pass the rule set
    Filter {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Count filtered files per bucket
    Aggregate {
        #[command(flatten)]
        input: InputArgs,
        /// Grouping criterion
        #[arg(long, value_parser = parse_criterion)]
        by: Criterion,
    },
    /// Show the folder tree the filtered files would be sorted into
    Preview {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        group: GroupArgs,
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show where every filtered file would be placed
    Plan {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        group: GroupArgs,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the files of one bucket to a CSV file
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Grouping criterion
        #[arg(long, value_parser = parse_criterion)]
        by: Criterion,
        /// Bucket label as shown by `aggregate`
        #[arg(long)]
        label: String,
        /// Output file; derived from the label when omitted
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Print configuration values
    PrintConfig,
}

fn parse_criterion(raw: &str) -> Result<Criterion, String> {
    match Criterion::from(raw) {
        Criterion::Unknown(name) => Err(format!("unknown grouping criterion '{name}'")),
        criterion => Ok(criterion),
    }
}

fn parse_secondary(raw: &str) -> Result<Secondary, String> {
    match Criterion::parse_optional(raw) {
        Some(Criterion::Unknown(name)) => Err(format!("unknown grouping criterion '{name}'")),
        criterion => Ok(Secondary(criterion)),
    }
}
