use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Fan-out bounds are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.search.per_provider_limit == 0 {
        return Err(ConfigError::ValidationError(
            "search.per_provider_limit cannot be 0".to_string(),
        ));
    }

    if config.search.provider_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.provider_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.search.overall_deadline_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.overall_deadline_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
