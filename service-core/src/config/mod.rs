use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Read an environment variable, falling back to `default` when it is unset.
///
/// A variable without a default is required.
pub fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

/// Read an optional environment variable. Empty values count as unset.
pub fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, using `default` when it is unset
/// or does not parse.
pub fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, value = %val, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_uses_default_when_unset() {
        let value = get_env("SERVICE_CORE_TEST_UNSET_VAR", Some("fallback")).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_env_required_missing() {
        let err = get_env("SERVICE_CORE_TEST_REQUIRED_VAR", None).unwrap_err();
        assert!(err.to_string().contains("SERVICE_CORE_TEST_REQUIRED_VAR"));
    }

    #[test]
    fn test_get_env_parsed_default() {
        let value: u32 = get_env_parsed("SERVICE_CORE_TEST_PARSED_VAR", 4);
        assert_eq!(value, 4);
    }

    #[test]
    fn test_get_optional_env_unset() {
        assert!(get_optional_env("SERVICE_CORE_TEST_OPTIONAL_VAR").is_none());
    }
}
