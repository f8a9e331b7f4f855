use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use usajobs_client::ApiCredentials;

/// Application configuration loaded from environment variables.
///
/// Loaded once at process start and passed into the components that
/// need it; nothing else reads the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiCredentials,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api: ApiCredentials {
                host: env::var("API_HOST").context("API_HOST must be set")?,
                user_agent: env::var("API_USER_AGENT").context("API_USER_AGENT must be set")?,
                authorization_key: env::var("API_AUTHORIZATION_KEY")
                    .context("API_AUTHORIZATION_KEY must be set")?,
            },
            database: DatabaseConfig {
                host: env::var("POSTGRES_HOST").context("POSTGRES_HOST must be set")?,
                database: env::var("POSTGRES_DATABASE").context("POSTGRES_DATABASE must be set")?,
                user: env::var("POSTGRES_USER").context("POSTGRES_USER must be set")?,
                password: env::var("POSTGRES_PWD").context("POSTGRES_PWD must be set")?,
                port: env::var("POSTGRES_PORT")
                    .unwrap_or_else(|_| "5432".to_string())
                    .parse()
                    .context("POSTGRES_PORT must be a valid number")?,
            },
        })
    }
}

impl DatabaseConfig {
    /// Connection URL in the form sqlx expects.
    pub fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}
