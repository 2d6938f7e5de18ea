use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payflow::interfaces::cli::{self, Cli};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for CSV output.
    let filter = EnvFilter::try_new(&cli.log_level).into_diagnostic()?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    cli::run(cli).await?;
    Ok(())
}
