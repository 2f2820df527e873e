/// Task ownership checks
///
/// Only the owner of a task may view, edit or delete it. Every task route
/// calls [`require_ownership`] after loading the record and before doing any
/// work on it.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::authorization::require_ownership;
/// use taskdesk_shared::auth::context::AuthContext;
/// use taskdesk_shared::models::task::Task;
///
/// fn check(auth: &AuthContext, task: &Task) -> Result<(), Box<dyn std::error::Error>> {
///     require_ownership(auth, task)?;
///     Ok(())
/// }
/// ```

use uuid::Uuid;

use super::context::AuthContext;
use crate::models::task::Task;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// The current user does not own the task
    #[error("User {user_id} does not own task {task_id}")]
    NotOwner { task_id: Uuid, user_id: Uuid },
}

/// Checks that the current user owns `task`
///
/// # Errors
///
/// Returns [`AuthzError::NotOwner`] when `task.author_id` differs from the
/// authenticated user.
pub fn require_ownership(auth: &AuthContext, task: &Task) -> Result<(), AuthzError> {
    if !task.is_owned_by(auth.user_id()) {
        tracing::warn!(
            task_id = %task.id,
            user_id = %auth.user_id(),
            "Ownership check failed"
        );
        return Err(AuthzError::NotOwner {
            task_id: task.id,
            user_id: auth.user_id(),
        });
    }

    Ok(())
}
