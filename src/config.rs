//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Every section has defaults
//! matching the reference deployment (IR sensor on BCM pin 18, server on
//! 0.0.0.0:8000), so an empty file is a valid configuration.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sensor wiring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    /// BCM pin number the reflective IR sensor is wired to.
    #[serde(default = "default_pin")]
    pub pin: u8,
}

const fn default_pin() -> u8 {
    18
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { pin: default_pin() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Highest BCM pin number exposed on the 40-pin Raspberry Pi header.
const MAX_BCM_PIN: u8 = 27;

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sensor.pin > MAX_BCM_PIN {
            return Err(ConfigError::InvalidValue {
                field: "sensor.pin",
                reason: format!(
                    "BCM pin {} is outside the header range 0..={MAX_BCM_PIN}",
                    self.sensor.pin
                ),
            }
            .into());
        }
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.bind_address",
            }
            .into());
        }
        self.socket_addr()?;
        Ok(())
    }

    /// The address the status server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    field: "server.bind_address",
                    reason: e.to_string(),
                }
                .into()
            })
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.sensor.pin, 18);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.socket_addr().unwrap().to_string(),
            "0.0.0.0:8000"
        );
    }

    #[test]
    fn empty_toml_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sensor.pin, 18);
        assert_eq!(config.server.bind_address, "0.0.0.0");
    }
}
