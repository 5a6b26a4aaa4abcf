//! bucketsweep
//!
//! Dry-run selection of deletion candidates from a bucket listing.

use anyhow::Result;
use bucketsweep_cli::{run, Cli, CliConfig, Commands};
use clap::Parser;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = CliConfig::load(&cli.config)?;
    debug!(config = %cli.config.display(), "Starting bucketsweep");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Select(args) => {
            run::select(args, config, &mut out)?;
        }
        Commands::Check(args) => {
            run::check(args, config, &mut out)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("bucketsweep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bucketsweep=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
