//! The `covenant registry` subcommand.
//!
//! Lints a signer registry file before it is committed: the document must
//! decode, and repeated entries are flagged.

use std::path::PathBuf;
use std::process;

use clap::Args;
use color_eyre::eyre::{Result, WrapErr};
use covenant_core::{Identity, SignerRegistry};
use tracing::warn;

/// Arguments for `covenant registry`.
#[derive(Args)]
pub struct RegistryArgs {
    /// Path to the registry YAML file.
    pub file: PathBuf,

    /// Accept repeated entries instead of failing.
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the registry command.
pub fn execute(args: &RegistryArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .wrap_err_with(|| format!("failed to read {}", args.file.display()))?;
    let registry = SignerRegistry::from_yaml(&bytes)
        .wrap_err_with(|| format!("failed to decode {}", args.file.display()))?;

    let duplicates: Vec<&str> = registry.duplicates().iter().map(Identity::as_str).collect();
    for name in &duplicates {
        warn!(signer = %name, "duplicate registry entry");
    }
    let passed = args.allow_duplicates || duplicates.is_empty();

    if args.json {
        let report = serde_json::json!({
            "passed": passed,
            "signers": registry,
            "duplicates": duplicates,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for signer in registry.iter() {
            println!("{signer}");
        }
        println!();
        println!(
            "{} signer(s), {} duplicate entr{}",
            registry.len(),
            duplicates.len(),
            if duplicates.len() == 1 { "y" } else { "ies" }
        );
    }

    if !passed {
        process::exit(1);
    }

    Ok(())
}
