//! Configuration command implementations

use crate::cli::{ConfigCommands, Output};
use crate::config::{CONFIG_BASENAME, DrillConfig, ENV_PREFIX};
use anyhow::{Context, Result};

/// Execute config commands
pub async fn execute(cmd: ConfigCommands, config: &DrillConfig, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config),
        ConfigCommands::Validate => validate(config, output),
    }
}

fn show(config: &DrillConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

fn validate(config: &DrillConfig, output: &Output) -> Result<()> {
    // Loading already validated; report what will be used
    output.success("Configuration is valid");
    output.key_value("Items:", &config.items.len().to_string());
    output.key_value("Latency:", &format!("{} ms", config.simulated_latency_ms));
    output.key_value("Thread pool:", &config.thread_pool_size.to_string());
    output.key_value("Process pool:", &config.process_pool_size.to_string());
    output.key_value(
        "Hybrid:",
        &format!(
            "{} processes x {} threads",
            config.chunk_process_count, config.chunk_thread_pool_size
        ),
    );
    output.key_value("CPU cores:", &num_cpus::get().to_string());
    output.verbose(&format!(
        "Sources: {CONFIG_BASENAME}.{{toml,json,yaml}}, --config, {ENV_PREFIX}* variables, CLI flags"
    ));
    Ok(())
}
