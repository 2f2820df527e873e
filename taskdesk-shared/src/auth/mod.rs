/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Session tokens, cookie signing and session resolution
/// - [`context`]: The resolved identity threaded through request handlers
/// - [`authorization`]: Task ownership checks
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::password::{hash_password, verify_password};
/// use taskdesk_shared::auth::session::{sign_value, verify_signed};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let cookie = sign_value("tds_token", "a-session-secret-of-at-least-32-bytes");
/// assert_eq!(
///     verify_signed(&cookie, "a-session-secret-of-at-least-32-bytes").as_deref(),
///     Some("tds_token")
/// );
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod context;
pub mod password;
pub mod session;
