use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ResolverConfig;
use crate::error::ConfigError;

/// Configuration values as written in a file, each one optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_module: Option<String>,
}

/// Loads configuration from defaults, a file and the environment
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a MODSAT_* environment variable, ignoring empty values
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Load raw configuration from a JSON file; a missing file is empty
    pub fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<RawConfig, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(RawConfig::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Raw configuration from environment variables
    pub fn load_env_config(&self) -> Result<RawConfig, ConfigError> {
        Ok(RawConfig {
            trace: self.env_flag("MODSAT_TRACE")?,
            explain: self.env_flag("MODSAT_EXPLAIN")?,
            base_module: self.get_env("MODSAT_BASE_MODULE"),
        })
    }

    /// Build the effective configuration
    pub fn load(&self, path: Option<&Path>) -> Result<ResolverConfig, ConfigError> {
        let mut config = ResolverConfig::default();

        if let Some(path) = path {
            config.merge_raw(&self.load_config_file(path)?);
        }
        config.merge_raw(&self.load_env_config()?);

        log::debug!("Resolver configuration: {:?}", config);
        Ok(config)
    }

    fn env_flag(&self, var: &str) -> Result<Option<bool>, ConfigError> {
        match self.get_env(var) {
            None => Ok(None),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(Some(true)),
                "0" | "false" | "no" | "off" => Ok(Some(false)),
                _ => Err(ConfigError::InvalidValue {
                    var: var.to_string(),
                    value,
                }),
            },
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}
