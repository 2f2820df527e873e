/// Resolved request identity
///
/// The session middleware resolves the cookie into a [`SessionState`] once
/// per request. Handlers behind the login guard receive an [`AuthContext`]
/// explicitly instead of reading a global "current user".

use uuid::Uuid;

use crate::models::user::User;

/// Identity of an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The logged-in user
    pub user: User,
}

impl AuthContext {
    /// Wraps a resolved user
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// ID of the logged-in user
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Session state of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No valid session cookie
    #[default]
    Anonymous,

    /// A session is bound to a user
    Authenticated(AuthContext),
}

impl SessionState {
    /// Returns the current user, if any
    pub fn current_user(&self) -> Option<&User> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(auth) => Some(&auth.user),
        }
    }

    /// Returns the auth context, if any
    pub fn auth(&self) -> Option<&AuthContext> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(auth) => Some(auth),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}
