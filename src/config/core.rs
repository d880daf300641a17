use super::{ConfigOverrides, DrillConfig};
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::Path;

/// Repository config is looked up as `multidrill.{toml,json,yaml,yml}`
pub const CONFIG_BASENAME: &str = "multidrill";

/// Environment variables with this prefix override file values
pub const ENV_PREFIX: &str = "MULTIDRILL_";

impl DrillConfig {
    /// Load the effective configuration.
    ///
    /// Priority, lowest first: built-in defaults, repository config file,
    /// `custom_config`, `MULTIDRILL_*` environment variables, CLI overrides.
    pub fn load(custom_config: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::from(Serialized::defaults(DrillConfig::default()))
            .merge(Toml::file(format!("{CONFIG_BASENAME}.toml")))
            .merge(Json::file(format!("{CONFIG_BASENAME}.json")))
            .merge(Yaml::file(format!("{CONFIG_BASENAME}.yaml")))
            .merge(Yaml::file(format!("{CONFIG_BASENAME}.yml")));

        if let Some(path) = custom_config {
            if !path.exists() {
                tracing::warn!("Config file {} not found, using defaults", path.display());
            }
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        if !overrides.is_empty() {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let config: DrillConfig = figment
            .extract()
            .context("Failed to load multidrill configuration")?;

        tracing::trace!("CONFIG LOAD: {:?}", config);
        config.validate()?;
        Ok(config)
    }
}
