/// Cross-site request forgery protection
///
/// Uses the double-submit pattern: a random token lives in the signed
/// `taskdesk_csrf` cookie and is repeated in a hidden `csrf_token` field of
/// every rendered form. A POST is accepted only if both are present and
/// equal. Another site can make the browser send the cookie but cannot read
/// it to fill in the field.

use axum_extra::extract::cookie::CookieJar;
use rand::RngCore;

use crate::{cookies::CookieSettings, error::WebError};

/// Name of the CSRF cookie
pub const CSRF_COOKIE: &str = "taskdesk_csrf";

/// Name of the hidden form field
pub const CSRF_FIELD: &str = "csrf_token";

/// Random bytes per token
const TOKEN_BYTES: usize = 32;

/// Message shown when verification fails
pub const EXPIRED_FORM_MESSAGE: &str = "The form has expired. Please try again.";

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns the current token, issuing a new cookie when there is none
pub fn ensure_token(jar: CookieJar, cookies: &CookieSettings) -> (CookieJar, String) {
    if let Some(token) = cookies.read(&jar, CSRF_COOKIE) {
        return (jar, token);
    }

    let token = generate_token();
    let jar = jar.add(cookies.signed(CSRF_COOKIE, &token));
    (jar, token)
}

/// Checks a submitted token against the cookie
///
/// # Errors
///
/// Returns `WebError::BadRequest` if the cookie is missing or tampered, or
/// the submitted token does not match.
pub fn verify(jar: &CookieJar, cookies: &CookieSettings, submitted: &str) -> Result<(), WebError> {
    let expected = cookies.read(jar, CSRF_COOKIE);

    match expected {
        Some(expected) if constant_time_eq(expected.as_bytes(), submitted.as_bytes()) => Ok(()),
        _ => {
            tracing::warn!("CSRF token missing or mismatched");
            Err(WebError::BadRequest(EXPIRED_FORM_MESSAGE.to_string()))
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
