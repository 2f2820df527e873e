/// Data records for TaskDesk
///
/// Records are plain data. Nothing in this module talks to the database;
/// persistence lives in [`crate::store`].
///
/// # Models
///
/// - `user`: Accounts created through registration
/// - `task`: To-do items owned by a single user, plus the editable draft
///   used by the edit form
///
/// # Example
///
/// ```
/// use taskdesk_shared::models::user::CreateUser;
///
/// let new_user = CreateUser::new(" Alice@Example.com ", "alice", "$argon2id$...");
/// assert_eq!(new_user.email, "alice@example.com");
/// ```

pub mod task;
pub mod user;
