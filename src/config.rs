use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5002".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://game.db?mode=rwc".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is empty");
        }
        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }
        if self.database_max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be > 0");
        }

        if self.is_in_memory_database() && self.environment != "development" {
            tracing::warn!("In-memory database configured; scores will not survive a restart");
        }

        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    /// SQLite `:memory:` databases live and die with a single connection.
    pub fn is_in_memory_database(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

#[cfg(test)]
pub(crate) fn test_config(database_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 5002,
        environment: "development".to_string(),
        database_url: database_url.to_string(),
        database_max_connections: 1,
        cors_allowed_origins: "*".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_database_url() {
        let config = test_config("   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = test_config("sqlite::memory:");
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn detects_in_memory_urls() {
        assert!(test_config("sqlite::memory:").is_in_memory_database());
        assert!(test_config("sqlite://file?mode=memory&cache=shared").is_in_memory_database());
        assert!(!test_config("sqlite://game.db?mode=rwc").is_in_memory_database());
    }
}
