//! Covenant CLI: contributor-agreement gate for pull requests.
//!
//! Fails a pull request's CI check unless every human commit author is
//! listed in the project's signer registry.

mod actions;
mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

/// Covenant: require a signed contributor agreement from every author.
///
/// Designed to run as a GitHub Actions step on `pull_request` and
/// `pull_request_target` events. Action inputs arrive as `INPUT_*`
/// environment variables and map onto the flags below.
#[derive(Parser)]
#[command(name = "covenant", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (repeat for more detail: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output logs as JSON (for machine consumption).
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check a pull request's authors against the signer registry.
    Check(commands::check::CheckArgs),
    /// Validate a local signer registry file and list its signers.
    Registry(commands::registry::RegistryArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report.
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Check(args) => commands::check::execute(&args).await,
        Commands::Registry(args) => commands::registry::execute(&args),
    }
}
