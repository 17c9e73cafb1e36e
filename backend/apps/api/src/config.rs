//! Process configuration
//!
//! Read once at startup. Library crates receive typed config structs and
//! never look at the environment themselves.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::config::random_secret;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ACCESS_EXPIRE: &str = "15m";
const DEFAULT_REFRESH_EXPIRE: &str = "3d";
const DEFAULT_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub database_url: String,
    pub redis_uri: Option<String>,
    pub access_secret: Option<String>,
    pub refresh_secret: Option<String>,
    pub activation_secret: Option<String>,
    pub access_expire: String,
    pub refresh_expire: String,
    pub production: bool,
    pub origins: Vec<String>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PORT is not a number: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let production = get("NODE_ENV")
            .or_else(|| get("APP_ENV"))
            .is_some_and(|env| env.eq_ignore_ascii_case("production"));

        Ok(Self {
            port,
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_uri: get("REDIS_URI"),
            access_secret: get("ACCESS_TOKEN"),
            refresh_secret: get("REFRESH_TOKEN"),
            activation_secret: get("ACTIVATION_SECRET"),
            access_expire: get("ACCESS_TOKEN_EXPIRE")
                .unwrap_or_else(|| DEFAULT_ACCESS_EXPIRE.to_string()),
            refresh_expire: get("REFRESH_TOKEN_EXPIRE")
                .unwrap_or_else(|| DEFAULT_REFRESH_EXPIRE.to_string()),
            production,
            origins: get("ORIGIN")
                .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Token and cookie settings
    ///
    /// Production refuses to start without all three secrets; development
    /// fills the gaps with per-process random ones.
    pub fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        let secret = |value: &Option<String>, name: &str| match value {
            Some(secret) => Ok(secret.clone()),
            None if self.production => bail!("{name} must be set in production"),
            None => {
                tracing::warn!("{name} not set, using a random secret for this process");
                Ok(random_secret())
            }
        };

        Ok(AuthConfig::new(
            secret(&self.access_secret, "ACCESS_TOKEN")?,
            secret(&self.refresh_secret, "REFRESH_TOKEN")?,
            secret(&self.activation_secret, "ACTIVATION_SECRET")?,
            &self.access_expire,
            &self.refresh_expire,
            self.production,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/lms")]).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.access_expire, "15m");
        assert_eq!(config.refresh_expire, "3d");
        assert!(config.redis_uri.is_none());
        assert!(!config.production);
        assert_eq!(config.origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_database_url_required() {
        assert!(config(&[("PORT", "9000")]).is_err());
    }

    #[test]
    fn test_origins_are_split() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/lms"),
            ("ORIGIN", "https://a.example.com, https://b.example.com,"),
        ])
        .unwrap();

        assert_eq!(
            config.origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_production_requires_secrets() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/lms"),
            ("NODE_ENV", "production"),
            ("ACCESS_TOKEN", "a"),
        ])
        .unwrap();

        assert!(config.production);
        assert!(config.auth_config().is_err());
    }

    #[test]
    fn test_development_fills_missing_secrets() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/lms"),
            ("APP_ENV", "development"),
        ])
        .unwrap();

        assert!(config.auth_config().is_ok());
    }
}
