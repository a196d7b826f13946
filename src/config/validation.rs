use crate::config::types::{Config, HttpConfig, ListingConfig, SinkConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sink_config(&config.sink)?;
    validate_http_config(&config.http)?;
    validate_listing_config(&config.listing)?;

    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates sink configuration
fn validate_sink_config(config: &SinkConfig) -> Result<(), ConfigError> {
    if config.credential.is_some() && config.base_url.is_none() {
        return Err(ConfigError::Validation(
            "a sink credential is configured but no sink URL is set".to_string(),
        ));
    }

    if let Some(url) = &config.base_url {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "sink URL must use http or https, got '{}'",
                url
            )));
        }
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "sink batch size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.timeout.is_zero() {
        return Err(ConfigError::Validation(
            "sink timeout must be greater than zero".to_string(),
        ));
    }

    if config.table.is_empty() {
        return Err(ConfigError::Validation(
            "sink table cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.page_timeout.is_zero() || config.resolve_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request timeouts must be greater than zero".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the listing site configuration
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    if config.base_url.scheme() != "http" && config.base_url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "listing URL must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.domain().is_empty() {
        return Err(ConfigError::InvalidUrl(format!(
            "listing URL has no host: '{}'",
            config.base_url
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build_config;
    use std::time::Duration;

    fn valid_config() -> Config {
        build_config(|_| None).unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = valid_config();
        config.sink.batch_size = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.http.resolve_timeout = Duration::ZERO;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_sink_timeout_rejected() {
        let mut config = valid_config();
        config.sink.timeout = Duration::ZERO;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_non_http_listing_rejected() {
        let mut config = valid_config();
        config.listing.base_url = url::Url::parse("ftp://listing.example/").unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_data_dir_rejected() {
        let mut config = valid_config();
        config.data_dir = std::path::PathBuf::new();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }
}
