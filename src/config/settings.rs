//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Chat id of the single administrator who receives forwarded submissions
    pub admin_id: i64,
}

/// Storage configuration for submissions and attachments
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding per-user submission records and photo folders
    pub data_dir: String,
}

/// Catalog assets and contact configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// URL of the shop manager account used on "Order" buttons
    pub contact_url: String,
    /// Lookbook document sent with the popular-designs section
    pub lookbook_path: String,
    /// Font chart image sent before the font question
    pub font_chart_path: String,
    /// Directory with tank top photos for the merch media group
    pub tank_top_dir: String,
    /// Directory with t-shirt photos for the merch media group
    pub tshirt_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("MORTALSHOP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::MortalShopError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_id: 0,
            },
            storage: StorageConfig {
                data_dir: "users_data".to_string(),
            },
            catalog: CatalogConfig {
                contact_url: "https://t.me/mortal_shop_team".to_string(),
                lookbook_path: "assets/lookbook.jpg".to_string(),
                font_chart_path: "assets/font.jpg".to_string(),
                tank_top_dir: "assets/tank_tops".to_string(),
                tshirt_dir: "assets/tshirts".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
