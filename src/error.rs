use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by the sensor hardware layer.
///
/// Everything here is fatal at startup: the daemon refuses to run without a
/// working sensor. After startup only `ReadLevel` can occur; the blockage
/// watcher absorbs it (a failed poll counts as an unobstructed reading).
#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("failed to connect to GPIO peripheral: {0}")]
    Connect(String),

    #[error("failed to subscribe to edge events on pin {pin}: {reason}")]
    Subscribe { pin: u8, reason: String },

    #[error("failed to read level on pin {pin}: {reason}")]
    ReadLevel { pin: u8, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
