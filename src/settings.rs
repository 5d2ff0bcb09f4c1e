use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "hubspot";
const ENV_PREFIX: &str = "HUBSPOT";

/// Credentials for the portal being exported. Read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub hub_id: String,
    pub api_key: String,
    /// Base URL override, e.g. for a proxy. Defaults to the public API.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Settings {
    /// Layered load: optional config file, then `HUBSPOT_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("HubSpot credentials missing: set HUBSPOT_HUB_ID and HUBSPOT_API_KEY")
    }
}
