use crate::config::{parse_mode, OutputFormat};
use bucketsweep_filters::{Composition, FilterKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bucketsweep")]
#[command(
    author,
    version,
    about = "Select deletion candidates in an object-storage bucket from a declarative policy"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "bucketsweep.yaml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the objects of a listing that the policy selects for deletion
    Select(SelectArgs),

    /// Compile every selector of a policy and report the first error
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Policy file (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub policy: PathBuf,

    /// Listing file (JSON array or NDJSON), `-` for stdin
    #[arg(short, long)]
    pub objects: String,

    /// Filter to run; repeat for several (object-key, tags, last-access, metadata, without-tag-keys)
    #[arg(short = 'f', long = "filter", value_parser = parse_kind)]
    pub filters: Vec<FilterKind>,

    /// How filters combine: all (narrow) or any (union)
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<Composition>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Policy file (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub policy: PathBuf,

    /// Filter to check; defaults to every filter the policy references
    #[arg(short = 'f', long = "filter", value_parser = parse_kind)]
    pub filters: Vec<FilterKind>,
}

fn parse_kind(s: &str) -> Result<FilterKind, String> {
    s.parse().map_err(|e: bucketsweep_core::Error| e.to_string())
}
