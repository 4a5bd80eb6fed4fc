//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables that override secrets and the backend address.
pub const ENV_JWT_SECRET: &str = "GEO_GATEWAY_JWT_SECRET";
pub const ENV_BACKEND: &str = "GEO_GATEWAY_BACKEND";
pub const ENV_DADATA_API_KEY: &str = "DADATA_API_KEY";
pub const ENV_DADATA_SECRET_KEY: &str = "DADATA_SECRET_KEY";

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration from defaults plus environment only.
pub fn load_default() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay values from `lookup` (normally the process environment).
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup(ENV_JWT_SECRET) {
        config.auth.jwt_secret = secret;
    }
    if let Some(backend) = lookup(ENV_BACKEND) {
        config.backend.address = backend;
    }
    if let Some(key) = lookup(ENV_DADATA_API_KEY) {
        config.geocoding.api_key = key;
    }
    if let Some(secret) = lookup(ENV_DADATA_SECRET_KEY) {
        config.geocoding.secret_key = secret;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn env_overrides_replace_secrets() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_JWT_SECRET, "s3cr3t"),
            (ENV_DADATA_API_KEY, "key"),
        ]);
        let mut config = GatewayConfig::default();

        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.auth.jwt_secret, "s3cr3t");
        assert_eq!(config.geocoding.api_key, "key");
        assert_eq!(config.backend.address, "http://hugo:1313");
    }

    #[test]
    fn load_config_reports_validation_failures() {
        let path = std::env::temp_dir().join(format!("geo-gateway-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[backend]\naddress = \"ftp://hugo\"").unwrap();

        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "backend.address"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
