/// Session tokens and signed cookie values
///
/// A session is an opaque random token handed to the browser in a cookie.
/// The server keeps only the token's SHA-256 hash (see
/// [`crate::store::session`]). Cookie values are additionally signed with
/// HMAC-SHA256 so a tampered cookie is rejected before any lookup.
///
/// # Token Format
///
/// `tds_` followed by 40 base62 characters (44 chars total).
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::session::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert!(token.starts_with("tds_"));
/// assert_eq!(hash, hash_session_token(&token));
/// ```

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

use super::context::{AuthContext, SessionState};
use crate::store::{session::SessionStore, user::CredentialStore, StoreError};

type HmacSha256 = Hmac<Sha256>;

/// Length of the random part of a session token
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Session token prefix
const TOKEN_PREFIX: &str = "tds_";

/// Separator between a signed value and its signature
const SIGNATURE_SEPARATOR: char = '.';

/// Generates a new session token
///
/// # Returns
///
/// Tuple of (plaintext_token, sha256_hash)
pub fn generate_session_token() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random_part: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Hashes a session token using SHA-256
///
/// Returns the hex-encoded digest (64 characters).
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn mac_for(value: &str, secret: &str) -> Option<HmacSha256> {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return None;
    };
    mac.update(value.as_bytes());
    Some(mac)
}

/// Signs a cookie value
///
/// Returns `value.signature` where the signature is the hex HMAC-SHA256 of
/// the value under `secret`. The value itself must not contain `.`.
pub fn sign_value(value: &str, secret: &str) -> String {
    let signature = mac_for(value, secret)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default();
    format!("{}{}{}", value, SIGNATURE_SEPARATOR, signature)
}

/// Verifies a signed cookie value and returns the original value
///
/// Returns `None` for unsigned, malformed or tampered input. The signature
/// comparison is constant-time.
pub fn verify_signed(signed: &str, secret: &str) -> Option<String> {
    let (value, signature) = signed.rsplit_once(SIGNATURE_SEPARATOR)?;
    let signature = hex::decode(signature).ok()?;

    mac_for(value, secret)?
        .verify_slice(&signature)
        .ok()
        .map(|_| value.to_string())
}

/// Resolves the session bound to `token`
///
/// Returns [`SessionState::Anonymous`] when there is no token, the token is
/// unknown or expired, or its user no longer exists.
pub async fn resolve_session(
    users: &dyn CredentialStore,
    sessions: &dyn SessionStore,
    token: Option<&str>,
) -> Result<SessionState, StoreError> {
    let Some(token) = token else {
        return Ok(SessionState::Anonymous);
    };

    let Some(user_id) = sessions.find_user_id(token).await? else {
        return Ok(SessionState::Anonymous);
    };

    let state = match users.find_by_id(user_id).await? {
        Some(user) => SessionState::Authenticated(AuthContext::new(user)),
        None => SessionState::Anonymous,
    };

    Ok(state)
}
