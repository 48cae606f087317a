/// Database configuration and connection management
pub mod database;

/// Commission rate configuration from config.toml
pub mod rates;
