//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::cookie::CookieConfig;
use platform::duration::convert_to_seconds;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Activation tokens live for five minutes
pub const ACTIVATION_TTL_SECS: u64 = 5 * 60;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 secret for access tokens
    pub access_secret: String,
    /// HS256 secret for refresh tokens
    pub refresh_secret: String,
    /// HS256 secret for registration activation tokens
    pub activation_secret: String,
    pub access_ttl_secs: u64,
    /// Also the session record TTL in the key-value store
    pub refresh_ttl_secs: u64,
    pub activation_ttl_secs: u64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("activation_ttl_secs", &self.activation_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    /// Build from secrets and human-readable lifetimes (`"15m"`, `"3d"`)
    ///
    /// Production switches cookies to `Secure` and `SameSite=Strict`.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        activation_secret: impl Into<String>,
        access_expire: &str,
        refresh_expire: &str,
        production: bool,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            activation_secret: activation_secret.into(),
            access_ttl_secs: convert_to_seconds(access_expire),
            refresh_ttl_secs: convert_to_seconds(refresh_expire),
            activation_ttl_secs: ACTIVATION_TTL_SECS,
            cookie_secure: production,
            cookie_same_site: if production {
                SameSite::Strict
            } else {
                SameSite::Lax
            },
        }
    }

    /// Random secrets, insecure cookies, 15m / 3d lifetimes
    pub fn development() -> Self {
        Self::new(
            random_secret(),
            random_secret(),
            random_secret(),
            "15m",
            "3d",
            false,
        )
    }

    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(ACCESS_COOKIE, self.access_ttl_secs)
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(REFRESH_COOKIE, self.refresh_ttl_secs)
    }

    fn cookie(&self, name: &str, ttl_secs: u64) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }
}

/// 32 random bytes, hex encoded
pub fn random_secret() -> String {
    use rand::RngCore;
    let mut secret = [0u8; 32];
    rand::rng().fill_bytes(&mut secret);
    secret.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetimes_from_strings() {
        let config = AuthConfig::new("a", "r", "x", "15m", "3d", false);
        assert_eq!(config.access_ttl_secs, 900);
        assert_eq!(config.refresh_ttl_secs, 259_200);
        assert_eq!(config.activation_ttl_secs, 300);
    }

    #[test]
    fn test_production_cookies() {
        let config = AuthConfig::new("a", "r", "x", "5m", "3d", true);
        let cookie = config.access_cookie();
        assert!(cookie.secure);
        assert_eq!(cookie.same_site, SameSite::Strict);
        assert_eq!(cookie.max_age_secs, Some(300));

        let config = AuthConfig::new("a", "r", "x", "5m", "3d", false);
        let cookie = config.refresh_cookie();
        assert!(!cookie.secure);
        assert_eq!(cookie.same_site, SameSite::Lax);
        assert_eq!(cookie.name, REFRESH_COOKIE);
    }

    #[test]
    fn test_development_secrets_differ() {
        let config = AuthConfig::development();
        assert_eq!(config.access_secret.len(), 64);
        assert_ne!(config.access_secret, config.refresh_secret);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig::new("top-secret", "r", "x", "5m", "3d", false);
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
