/// User record
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     username VARCHAR(100) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address, trimmed and lower-cased
    ///
    /// Must be unique across all users
    pub email: String,

    /// Display name, unique across all users
    pub username: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    /// Normalized email address
    pub email: String,

    /// Username as entered (surrounding whitespace removed)
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

impl CreateUser {
    /// Builds a new user record, normalizing email and username
    pub fn new(
        email: impl AsRef<str>,
        username: impl AsRef<str>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: normalize_email(email.as_ref()),
            username: username.as_ref().trim().to_string(),
            password_hash: password_hash.into(),
        }
    }
}

/// Normalizes an email address for storage and lookup
///
/// Email comparison is case-insensitive, so every address is stored and
/// queried in lower case.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
