use std::fs;
use tracing::{debug, error, info};

use crate::types::client_config::{ClientConfig, ConfigError};

pub fn load_config(path: &str) -> Result<ClientConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: ClientConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let base_url = config.api.resolved_base_url();

    if base_url.is_empty() {
        return Err(ConfigError::InvalidConfig("base_url cannot be empty".into()));
    }

    // Only plain HTTP is spoken by the transport.
    if !base_url.starts_with("http://") {
        return Err(ConfigError::InvalidConfig(format!(
            "base_url must start with http:// (got {})",
            base_url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "timeout_secs must be greater than 0".into(),
        ));
    }

    if config.storage.path.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "storage.path cannot be empty".into(),
        ));
    }

    Ok(())
}
