use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 21547;
const DEFAULT_DATABASE_URL: &str = "sqlite:taskboard.db";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:21548,http://127.0.0.1:21548";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Comma-separated list of allowed browser origins.
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup` (`PORT`, `DATABASE_URL`, `CORS_ORIGIN`),
    /// falling back to defaults for unset keys. A `PORT` that is set but not a
    /// valid port number is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into()),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Base URL the in-process MCP tools use to reach the REST API.
    pub fn api_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn cors_origins(&self) -> Vec<&str> {
        self.cors_origin
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            cors_origin: DEFAULT_CORS_ORIGIN.into(),
        }
    }
}
