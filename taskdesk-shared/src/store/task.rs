/// Task store
///
/// Persists to-do items. Listing is always scoped to one owner; ownership
/// checks for mutation live in [`crate::auth::authorization`], not here.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::StoreError;
use crate::models::task::{CreateTask, Task, UpdateTask};

/// Storage for to-do items
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists the tasks owned by `user_id`
    ///
    /// Ordered by due date, then priority tasks first, then creation time.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Finds a task by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] with field `title` when any task
    /// (from any user) already has this title.
    async fn create(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Overwrites the given fields in place
    ///
    /// Returns the updated task, or `None` if it does not exist. An empty
    /// update returns the stored task unchanged.
    async fn update(&self, id: Uuid, data: UpdateTask) -> Result<Option<Task>, StoreError>;

    /// Deletes a task, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// PostgreSQL-backed task store
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Creates a store on top of an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, author_id, title, priority, due_date, body, created_at, updated_at
            FROM todos
            WHERE author_id = $1
            ORDER BY due_date ASC, priority DESC, created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, author_id, title, priority, due_date, body, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, data: CreateTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO todos (author_id, title, priority, due_date, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, title, priority, due_date, body, created_at, updated_at
            "#,
        )
        .bind(data.author_id)
        .bind(data.title)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.body)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)?;

        debug!(task_id = %task.id, author_id = %task.author_id, "Inserted task");
        Ok(task)
    }

    async fn update(&self, id: Uuid, data: UpdateTask) -> Result<Option<Task>, StoreError> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE todos SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.body.is_some() {
            bind_count += 1;
            query.push_str(&format!(", body = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, author_id, title, priority, due_date, body, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(body) = data.body {
            q = q.bind(body);
        }

        let task = q
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_write)?;

        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
