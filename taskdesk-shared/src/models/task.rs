/// Task record and the editable draft used by the edit pipeline
///
/// Editing runs as an explicit pipeline instead of binding the form onto the
/// stored record:
///
/// ```text
/// Task ──From──▶ TaskDraft ──(form, validation)──▶ TaskDraft ──diff──▶ UpdateTask
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     author_id UUID NOT NULL REFERENCES users(id),
///     title VARCHAR(250) NOT NULL UNIQUE,
///     priority BOOLEAN NOT NULL DEFAULT FALSE,
///     due_date DATE NOT NULL,
///     body TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `title` is unique across every user's tasks, not per owner.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use taskdesk_shared::models::task::TaskDraft;
/// use uuid::Uuid;
///
/// let draft = TaskDraft {
///     title: "buy milk".to_string(),
///     priority: false,
///     due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     body: "from store".to_string(),
/// };
///
/// let create = draft.into_create(Uuid::new_v4());
/// assert_eq!(create.title, "buy milk");
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A to-do item owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub author_id: Uuid,

    /// Title (globally unique)
    pub title: String,

    /// Whether the task is flagged as a priority
    pub priority: bool,

    /// Calendar date the task is due
    pub due_date: NaiveDate,

    /// Free-form description
    pub body: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Checks whether `user_id` owns this task
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTask {
    /// Owner of the new task (the current user)
    pub author_id: Uuid,

    /// Title
    pub title: String,

    /// Priority flag
    pub priority: bool,

    /// Due date
    pub due_date: NaiveDate,

    /// Description
    pub body: String,
}

/// Input for updating a task
///
/// Only `Some` fields are written. The owner can never be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New priority flag
    pub priority: Option<bool>,

    /// New due date
    pub due_date: Option<NaiveDate>,

    /// New description
    pub body: Option<String>,
}

impl UpdateTask {
    /// Returns true when the update would not change anything
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.body.is_none()
    }

    /// Applies the update to an in-memory record
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(body) = self.body {
            task.body = body;
        }
    }
}

/// Editable, validated task fields
///
/// Produced either from a stored task (to pre-populate the edit form) or from
/// a submitted form after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub priority: bool,
    pub due_date: NaiveDate,
    pub body: String,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            priority: task.priority,
            due_date: task.due_date,
            body: task.body.clone(),
        }
    }
}

impl TaskDraft {
    /// Turns the draft into a create request owned by `author_id`
    pub fn into_create(self, author_id: Uuid) -> CreateTask {
        CreateTask {
            author_id,
            title: self.title,
            priority: self.priority,
            due_date: self.due_date,
            body: self.body,
        }
    }

    /// Computes the fields that differ from the stored record
    pub fn diff(&self, current: &Task) -> UpdateTask {
        UpdateTask {
            title: (self.title != current.title).then(|| self.title.clone()),
            priority: (self.priority != current.priority).then_some(self.priority),
            due_date: (self.due_date != current.due_date).then_some(self.due_date),
            body: (self.body != current.body).then(|| self.body.clone()),
        }
    }
}
