//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use console::style;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Temperature-compliance reconciliation for task completions
#[derive(Parser, Debug)]
#[command(name = "tempguard", version, about, long_about = None)]
pub struct Cli {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .tempguard/config.yaml)
    #[arg(long, global = true, env = "TEMPGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a completion and decide on follow-up
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Reconcile a monitoring follow-up with its original reading
    FollowUp(commands::follow_up::FollowUpArgs),
    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}

/// Load configuration from `path`, or the standard locations.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            ConfigLoader::load_from_file(path)
        }
        None => ConfigLoader::load(),
    }
}

/// Report an error in the selected output mode and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("Error:").red().bold());
    }
    std::process::exit(1);
}
