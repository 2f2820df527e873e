/// In-memory store
///
/// Implements every store trait on top of a single mutex-guarded state, so a
/// whole application can run without PostgreSQL. Unique constraints are
/// enforced the same way the database enforces them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{session::SessionStore, task::TaskStore, user::CredentialStore, StoreError};
use crate::auth::session::{generate_session_token, hash_session_token};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{normalize_email, CreateUser, User};

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    tasks: Vec<Task>,
    /// token hash -> (user, expiry)
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
}

/// Process-local implementation of all stores
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.trim();
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;

        if state.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict { field: "email" });
        }
        if state.users.iter().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict { field: "username" });
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.len() as i64)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| t.is_owned_by(user_id))
            .cloned()
            .collect();

        // Stable sort keeps insertion order among equal keys
        tasks.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(b.priority.cmp(&a.priority))
                .then(a.created_at.cmp(&b.created_at))
        });

        Ok(tasks)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut state = self.state.lock().await;

        if state.tasks.iter().any(|t| t.title == data.title) {
            return Err(StoreError::Conflict { field: "title" });
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            author_id: data.author_id,
            title: data.title,
            priority: data.priority,
            due_date: data.due_date,
            body: data.body,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());

        Ok(task)
    }

    async fn update(&self, id: Uuid, data: UpdateTask) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.lock().await;

        if let Some(ref title) = data.title {
            if state.tasks.iter().any(|t| t.id != id && &t.title == title) {
                return Err(StoreError::Conflict { field: "title" });
            }
        }

        let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if !data.is_empty() {
            data.apply_to(task);
            task.updated_at = Utc::now();
        }

        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        Ok(state.tasks.len() < before)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, StoreError> {
        let (token, token_hash) = generate_session_token();
        let mut state = self.state.lock().await;
        state
            .sessions
            .insert(token_hash, (user_id, Utc::now() + ttl));
        Ok(token)
    }

    async fn find_user_id(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let token_hash = hash_session_token(token);
        let mut state = self.state.lock().await;

        match state.sessions.get(&token_hash).copied() {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(Some(user_id)),
            Some(_) => {
                state.sessions.remove(&token_hash);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.sessions.remove(&hash_session_token(token)).is_some())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - state.sessions.len()) as u64)
    }
}
