//! Cookie Management Infrastructure
//!
//! Builds `Set-Cookie` values by hand and reads the `Cookie` request header.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Duration, Utc};

/// IMF-fixdate, the only `Expires` format browsers are required to accept
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: false,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value
    ///
    /// With `max_age_secs` set, `Expires` is stamped as now + max-age.
    pub fn build_set_cookie(&self, value: &str) -> String {
        self.build_set_cookie_at(value, Utc::now())
    }

    fn build_set_cookie_at(&self, value: &str, now: DateTime<Utc>) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            let expires = now + Duration::seconds(max_age);
            cookie.push_str(&format!("; Max-Age={}", max_age));
            cookie.push_str(&format!("; Expires={}", expires.format(EXPIRES_FORMAT)));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!(
            "; SameSite={}; Path={}; Max-Age=0; Expires={}",
            self.same_site.as_str(),
            self.path,
            DateTime::<Utc>::UNIX_EPOCH.format(EXPIRES_FORMAT),
        ));
        cookie
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(cookie: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(cookie).ok()
}
