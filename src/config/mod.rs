use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub sampler: SamplerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Seconds between session-loop ticks
    pub period_secs: u64,
    /// Training-progress increment per successful tick
    pub progress_step: u8,
    /// Maximum rows returned by the logs endpoint
    pub recent_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://./sysdash.db".to_string(),
                max_connections: Some(5),
            },
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            sampler: SamplerConfig {
                period_secs: 2,
                progress_step: 5,
                recent_limit: 100,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            default_config
        };

        // Environment override for the listening port, SYSDASH_PORT first
        // with PORT as a fallback.
        if let Some(port) = std::env::var("SYSDASH_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
        {
            config.web.port = port.parse().map_err(|_| {
                AppError::configuration(format!("invalid port in environment: {port}"))
            })?;
        }

        Ok(config)
    }
}
