/// One-shot notices shown on the next rendered page
///
/// Handlers push a message before redirecting; the page that renders next
/// takes every pending message and clears the cookie.
///
/// The messages travel in the signed `taskdesk_flash` cookie as hex-encoded
/// JSON, so a tampered cookie yields no messages rather than forged ones.
///
/// # Example
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use taskdesk_web::cookies::CookieSettings;
/// use taskdesk_web::flash::{self, FlashLevel};
///
/// let cookies = CookieSettings::new("a-session-secret-of-at-least-32-bytes", false);
/// let jar = flash::push(CookieJar::new(), &cookies, FlashLevel::Success, "Task added.");
///
/// let (_jar, messages) = flash::take(jar, &cookies);
/// assert_eq!(messages[0].message, "Task added.");
/// ```

use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::cookies::CookieSettings;

/// Name of the flash cookie
pub const FLASH_COOKIE: &str = "taskdesk_flash";

/// Severity of a flash message, used as its CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }
}

/// A single pending notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

fn pending(jar: &CookieJar, cookies: &CookieSettings) -> Vec<FlashMessage> {
    cookies
        .read(jar, FLASH_COOKIE)
        .and_then(|encoded| hex::decode(encoded).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Queues a message for the next rendered page
pub fn push(
    jar: CookieJar,
    cookies: &CookieSettings,
    level: FlashLevel,
    message: impl Into<String>,
) -> CookieJar {
    let mut messages = pending(&jar, cookies);
    messages.push(FlashMessage::new(level, message));

    match serde_json::to_vec(&messages) {
        Ok(bytes) => jar.add(cookies.signed(FLASH_COOKIE, &hex::encode(bytes))),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode flash messages");
            jar
        }
    }
}

/// Takes every pending message and clears the cookie
pub fn take(jar: CookieJar, cookies: &CookieSettings) -> (CookieJar, Vec<FlashMessage>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }

    let messages = pending(&jar, cookies);
    (cookies.remove(jar, FLASH_COOKIE), messages)
}
