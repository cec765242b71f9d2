use anyhow::{Context, Result};
use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub skip_migrations: bool,
    pub port: u16,
    /// Competition week reported to clients as the league's current week.
    pub current_week: i32,
    pub gql_introspection: bool,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            skip_migrations: env::var("SKIP_MIGRATIONS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            current_week: env::var("CURRENT_WEEK")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|week| *week >= 1)
                .unwrap_or(1),
            gql_introspection: env::var("GQL_INTROSPECTION")
                .map(|v| v == "true")
                .unwrap_or(false),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string()),
            ),
        })
    }

    /// Configuration for a pool that is already connected, e.g. in tests.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            database_max_connections: 5,
            skip_migrations: false,
            port: 8080,
            current_week: 1,
            gql_introspection: true,
            allowed_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
