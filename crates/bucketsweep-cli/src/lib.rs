//! bucketsweep command line driver
//!
//! Loads a deletion policy and an offline bucket listing, runs the selected
//! filters and prints the deletion candidates. Nothing is ever deleted.

pub mod cli;
pub mod config;
pub mod listing;
pub mod run;

pub use cli::{CheckArgs, Cli, Commands, SelectArgs};
pub use config::{CliConfig, OutputFormat};
pub use listing::{load_listing, parse_listing};
