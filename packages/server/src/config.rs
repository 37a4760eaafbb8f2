use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Audit logging is disabled when unset
    pub database_url: Option<String>,
    pub port: u16,
    /// Meta tag generation is disabled when unset
    pub openai_api_key: Option<String>,
    /// Enables the RapidAPI Instagram downloader
    pub rapidapi_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: optional_var("DATABASE_URL"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: optional_var("OPENAI_API_KEY"),
            rapidapi_key: optional_var("RAPIDAPI_KEY"),
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
