/// Persistence layer for TaskDesk
///
/// Each entity has its own store trait. Stores are the only code that
/// touches the datastore; records in [`crate::models`] stay plain data.
///
/// # Stores
///
/// - [`user::CredentialStore`]: user accounts
/// - [`task::TaskStore`]: to-do items
/// - [`session::SessionStore`]: login sessions
///
/// Every trait has a PostgreSQL implementation (`Pg*Store`) and is also
/// implemented by [`memory::MemoryStore`], which keeps everything in process
/// for tests and local experiments.
///
/// # Example
///
/// ```
/// use taskdesk_shared::models::user::CreateUser;
/// use taskdesk_shared::store::{memory::MemoryStore, user::CredentialStore};
///
/// # async fn example() -> Result<(), taskdesk_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let user = store.create(CreateUser::new("a@x.com", "alice", "$argon2id$...")).await?;
/// assert_eq!(store.find_by_email("a@x.com").await?, Some(user));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod session;
pub mod task;
pub mod user;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value
    #[error("{field} already exists")]
    Conflict {
        /// Name of the conflicting field (e.g. "email", "title")
        field: &'static str,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps unique-constraint violations to [`StoreError::Conflict`]
    ///
    /// Constraint names come from the migrations in `migrations/`.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some("users_email_key") => "email",
                    Some("users_username_key") => "username",
                    Some("todos_title_key") => "title",
                    _ => "value",
                };
                return StoreError::Conflict { field };
            }
        }

        StoreError::Database(err)
    }

    /// Returns the conflicting field if this is a uniqueness conflict
    pub fn conflict_field(&self) -> Option<&'static str> {
        match self {
            StoreError::Conflict { field } => Some(field),
            StoreError::Database(_) => None,
        }
    }
}
