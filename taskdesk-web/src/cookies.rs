/// Signed cookie helpers
///
/// Session, flash and CSRF cookies share the same attributes: `Path=/`,
/// `HttpOnly`, `SameSite=Lax`, and `Secure` in production. Values are signed
/// with the session secret; a cookie whose signature does not verify reads as
/// absent.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use taskdesk_shared::auth::session::{sign_value, verify_signed};

use crate::config::Config;

/// Signing key and attributes for the cookies the server issues
#[derive(Debug, Clone)]
pub struct CookieSettings {
    secret: String,
    secure: bool,
}

impl CookieSettings {
    pub fn new(secret: impl Into<String>, secure: bool) -> Self {
        Self {
            secret: secret.into(),
            secure,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session.secret.clone(), config.server.production)
    }

    /// Builds a signed cookie carrying `value`
    pub fn signed(&self, name: &'static str, value: &str) -> Cookie<'static> {
        Cookie::build((name, sign_value(value, &self.secret)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Reads and verifies a signed cookie
    pub fn read(&self, jar: &CookieJar, name: &str) -> Option<String> {
        jar.get(name)
            .and_then(|cookie| verify_signed(cookie.value(), &self.secret))
    }

    /// Removes a cookie previously set by [`CookieSettings::signed`]
    pub fn remove(&self, jar: CookieJar, name: &'static str) -> CookieJar {
        jar.remove(Cookie::build((name, "")).path("/").build())
    }
}
