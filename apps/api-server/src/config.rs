//! Application configuration loaded from environment variables.

use std::env;

use microblog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Fixed page size for every post listing.
    pub posts_per_page: u64,
    /// Externally visible base URL, used in password reset links.
    pub public_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", 100),
            min_connections: env_parse("DB_MIN_CONNECTIONS", 10),
        });

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_parse("PORT", 8080);
        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            database,
            posts_per_page: env_parse::<u64>("POSTS_PER_PAGE", 10).max(1),
            public_url,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
