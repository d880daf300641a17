//! Command-line interface for multidrill
//!
//! One binary covers every role: the four strategy runners, the comparison
//! harness that launches them, and the hidden worker mode the process pools
//! spawn.

use crate::config::{ConfigOverrides, DrillConfig};
use crate::strategy::Strategy;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

/// multidrill - sequential vs threads vs processes on an I/O-bound workload
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Simulated I/O wait per item, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub latency_ms: Option<u64>,

    /// Work items to process (comma-separated)
    #[arg(long, value_delimiter = ',', global = true)]
    pub items: Option<Vec<u64>>,

    /// Subcommands (defaults to `compare`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Approach 1: process items one at a time
    Sequential,
    /// Approach 2: bounded pool of threads
    Threadpool,
    /// Approach 3: bounded pool of worker processes
    Processpool,
    /// Approach 4: worker processes each running a thread pool over one chunk
    Hybrid,
    /// Run all four approaches in isolation and compare their timings
    Compare,
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Serve process-pool tasks on stdin/stdout
    #[command(hide = true)]
    Worker,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Validate the effective configuration
    Validate,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            latency_ms: self.latency_ms,
            items: self.items.clone(),
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let overrides = self.overrides();
        // Worker mode never loads config; each task carries what it needs
        let load_config = || DrillConfig::load(self.config.as_deref(), &overrides);

        match self.command {
            Some(Commands::Sequential) => {
                commands::strategy::execute(Strategy::Sequential, load_config()?).await
            }
            Some(Commands::Threadpool) => {
                commands::strategy::execute(Strategy::ThreadPool, load_config()?).await
            }
            Some(Commands::Processpool) => {
                commands::strategy::execute(Strategy::ProcessPool, load_config()?).await
            }
            Some(Commands::Hybrid) => {
                commands::strategy::execute(Strategy::Hybrid, load_config()?).await
            }
            Some(Commands::Config(cmd)) => {
                commands::config::execute(cmd, &load_config()?, &output).await
            }
            Some(Commands::Worker) => commands::worker::execute().await,
            Some(Commands::Compare) | None => {
                let forwarded = forwarded_args(self.config.as_ref(), &overrides);
                commands::compare::execute(&load_config()?, forwarded, &output).await
            }
        }
    }
}

/// Global flags handed to every launched runner so it loads the same config
fn forwarded_args(config_path: Option<&PathBuf>, overrides: &ConfigOverrides) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(path) = config_path {
        args.push("--config".to_string());
        args.push(path.display().to_string());
    }
    args.extend(overrides.to_args());
    args
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout belongs to the reports the harness captures
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
