// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::context::AppContext;
use crate::model::{ParserConfig, SyntaxMode};
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Live extraction of dates and references while typing.
    #[serde(default = "default_true")]
    pub smart_input: bool,
    #[serde(default)]
    pub syntax_mode: SyntaxMode,
    #[serde(default = "default_true")]
    pub autocomplete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smart_input: true,
            syntax_mode: SyntaxMode::default(),
            autocomplete: true,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like [`Config::load`], but falls back to defaults. A missing file is
    /// expected on first run; anything else is logged.
    pub fn load_or_default(ctx: &dyn AppContext) -> Self {
        match Self::load(ctx) {
            Ok(config) => config,
            Err(e) if Self::is_missing_config_error(&e) => Self::default(),
            Err(e) => {
                log::warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Parser configuration with nothing suppressed yet.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            enabled: self.smart_input,
            syntax_mode: self.syntax_mode,
            ..ParserConfig::default()
        }
    }
}
