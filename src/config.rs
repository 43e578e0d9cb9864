//! Runtime configuration read from the environment (and `.env`, via `dotenv`).

use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_LOCALE_DIR: &str = "locales";
pub const DEFAULT_DATABASE: &str = "application_data.db";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Environment variable {0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub prefix: String,
    pub locale_dir: PathBuf,
    pub default_locale: String,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        if discord_token.trim().is_empty() {
            return Err(ConfigError::Empty("DISCORD_TOKEN"));
        }

        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            discord_token,
            prefix: or_default("BOT_PREFIX", DEFAULT_PREFIX),
            locale_dir: or_default("LOCALE_DIR", DEFAULT_LOCALE_DIR).into(),
            default_locale: or_default("DEFAULT_LOCALE", DEFAULT_LOCALE),
            database_path: or_default("DATABASE_PATH", DEFAULT_DATABASE).into(),
        })
    }
}
