//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{MortalShopError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_storage_config(&settings.storage)?;
    validate_catalog_config(&settings.catalog)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(MortalShopError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_id == 0 {
        return Err(MortalShopError::Config(
            "Administrator chat id is required".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.data_dir.is_empty() {
        return Err(MortalShopError::Config(
            "Storage data directory is required".to_string()
        ));
    }

    Ok(())
}

/// Validate catalog configuration
fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if url::Url::parse(&config.contact_url).is_err() {
        return Err(MortalShopError::Config(
            format!("Shop contact URL is not a valid URL: {}", config.contact_url)
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(MortalShopError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(MortalShopError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123456:TEST".to_string();
        settings.bot.admin_id = 99;
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&configured_settings()).is_ok());
    }

    #[test]
    fn test_missing_token_fails_fast() {
        let mut settings = configured_settings();
        settings.bot.token = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_missing_admin_fails_fast() {
        let mut settings = configured_settings();
        settings.bot.admin_id = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_contact_url_rejected() {
        let mut settings = configured_settings();
        settings.catalog.contact_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bogus_log_level_rejected() {
        let mut settings = configured_settings();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
