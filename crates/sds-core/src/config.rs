use crate::app_config::AppConfig;
use crate::spatial::DistanceUnit;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://spatial.virtualearth.net/REST/v1/data/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("SDS_BASE_URL", DEFAULT_BASE_URL);
    if base_url.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SDS_BASE_URL".to_string(),
            reason: "must be non-empty".to_string(),
        });
    }

    let maps_key = lookup("SDS_MAPS_KEY").ok().filter(|k| !k.trim().is_empty());
    let log_level = or_default("SDS_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SDS_REQUEST_TIMEOUT_SECS", "30")?;
    let connect_timeout_secs = parse_u64("SDS_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("SDS_USER_AGENT", "sds-query/0.1");
    let default_distance_units = or_default("SDS_DISTANCE_UNITS", "km")
        .parse::<DistanceUnit>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SDS_DISTANCE_UNITS".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        base_url,
        maps_key,
        log_level,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        default_distance_units,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
