//! Configuration loading from the process environment.
//!
//! Missing variables fall back to the schema defaults and are never
//! fatal. Variables that are present but unparseable refuse startup: a
//! silently-corrected typo would make a run lie about its own
//! parameters.

use std::env;

use thiserror::Error;
use url::Url;

use crate::config::schema::{DriverConfig, ServiceConfig};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var} must be greater than zero")]
    NonPositive { var: &'static str },

    #[error("invalid TARGET_URL {value:?}: {source}")]
    TargetUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Load service configuration, overriding defaults from the environment.
///
/// Variables: `BIND_ADDRESS`, `SERVICE_NAME`, `REQUEST_TIMEOUT_SECS`,
/// `RNG_SEED`.
pub fn service_config_from_env() -> Result<ServiceConfig, ConfigError> {
    let mut config = ServiceConfig::default();
    if let Ok(address) = env::var("BIND_ADDRESS") {
        config.bind_address = address;
    }
    if let Ok(name) = env::var("SERVICE_NAME") {
        config.service_name = name;
    }
    if let Some(timeout) = parse_var::<u64>("REQUEST_TIMEOUT_SECS")? {
        config.request_timeout_secs = timeout;
    }
    if let Some(seed) = parse_var::<u64>("RNG_SEED")? {
        config.rng_seed = Some(seed);
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::NonPositive {
            var: "REQUEST_TIMEOUT_SECS",
        });
    }
    Ok(config)
}

/// Load driver configuration, overriding defaults from the environment.
///
/// Variables: `TARGET_URL`, `RATE`, `CHAOS_MODE`, `REQUEST_TIMEOUT_SECS`,
/// `MAX_IN_FLIGHT`, `RNG_SEED`.
pub fn driver_config_from_env() -> Result<DriverConfig, ConfigError> {
    let mut config = DriverConfig::default();
    if let Ok(target) = env::var("TARGET_URL") {
        config.target_url = target;
    }
    if let Some(rate) = parse_var::<f64>("RATE")? {
        config.rate = rate;
    }
    if let Some(chaos) = parse_var::<bool>("CHAOS_MODE")? {
        config.chaos = chaos;
    }
    if let Some(timeout) = parse_var::<u64>("REQUEST_TIMEOUT_SECS")? {
        config.request_timeout_secs = timeout;
    }
    if let Some(cap) = parse_var::<usize>("MAX_IN_FLIGHT")? {
        config.max_in_flight = Some(cap);
    }
    if let Some(seed) = parse_var::<u64>("RNG_SEED")? {
        config.rng_seed = Some(seed);
    }
    validate_driver(&config)?;
    Ok(config)
}

/// Semantic checks serde cannot express.
pub(crate) fn validate_driver(config: &DriverConfig) -> Result<(), ConfigError> {
    if config.rate <= 0.0 || config.rate.is_nan() {
        return Err(ConfigError::NonPositive { var: "RATE" });
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::NonPositive {
            var: "REQUEST_TIMEOUT_SECS",
        });
    }
    if config.max_in_flight == Some(0) {
        return Err(ConfigError::NonPositive {
            var: "MAX_IN_FLIGHT",
        });
    }
    Url::parse(&config.target_url).map_err(|source| ConfigError::TargetUrl {
        value: config.target_url.clone(),
        source,
    })?;
    Ok(())
}

fn parse_var<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(error) => Err(ConfigError::Invalid {
                var,
                value: raw,
                reason: error.to_string(),
            }),
        },
        Err(env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ConfigError::Invalid {
            var,
            value: String::new(),
            reason: error.to_string(),
        }),
    }
}
