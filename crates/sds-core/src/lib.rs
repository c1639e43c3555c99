//! Shared domain primitives for the spatial data query workspace.
//!
//! Holds the unit-aware distance math, the location and geography value
//! types every query result is built from, the `FindByPropertyRequest`
//! shape, and environment-driven configuration.

pub mod app_config;
pub mod config;
pub mod request;
pub mod spatial;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use request::{load_request, FindByPropertyRequest, MAX_TOP};
pub use spatial::{convert_distance, DistanceUnit, Geography, Location};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid distance unit: {0}")]
    InvalidDistanceUnit(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read request file {path}: {source}")]
    RequestFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse request file: {0}")]
    RequestFileParse(#[from] serde_yaml::Error),

    #[error("request validation failed: {0}")]
    Validation(String),
}
