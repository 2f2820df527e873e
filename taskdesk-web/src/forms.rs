/// Form payloads and their validation
///
/// Each form deserializes from `application/x-www-form-urlencoded` with
/// every field defaulted, so a missing field becomes a validation message on
/// the re-rendered page instead of an extractor rejection.
///
/// Validation uses `validator` derives; failures are collected into
/// [`FormErrors`] keyed by field name.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use taskdesk_shared::models::task::TaskDraft;
use validator::{Validate, ValidationError, ValidationErrors};

/// Accepted due date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field-level validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// First message recorded for `field`
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value.".to_string());
                form_errors.add(&field, message);
            }
        }

        form_errors
    }
}

/// Registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(
        length(min = 1, message = "Email is required."),
        email(message = "Enter a valid email address."),
        custom(function = "validate_email_length")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Username is required (at most 100 characters)."))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords must match."))]
    pub confirm_password: String,

    pub csrf_token: String,
}

impl RegisterForm {
    /// Trims surrounding whitespace from the text fields
    ///
    /// Passwords are kept exactly as typed.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.username = self.username.trim().to_string();
        self
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(FormErrors::from)
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(
        length(min = 1, message = "Email is required."),
        custom(function = "validate_email_length")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,

    pub csrf_token: String,
}

impl LoginForm {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(FormErrors::from)
    }
}

/// Add/edit task form
///
/// `priority` is a checkbox: browsers omit the field when it is unchecked.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TaskForm {
    #[validate(length(min = 1, max = 250, message = "Title is required (at most 250 characters)."))]
    pub title: String,

    #[validate(
        length(min = 1, message = "Due date is required."),
        custom(function = "validate_due_date")
    )]
    pub due_date: String,

    #[validate(length(min = 1, message = "Description is required."))]
    pub body: String,

    pub priority: Option<String>,

    pub csrf_token: String,
}

impl TaskForm {
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.due_date = self.due_date.trim().to_string();
        self.body = self.body.trim().to_string();
        self
    }

    pub fn is_priority(&self) -> bool {
        self.priority.is_some()
    }

    /// Validates the form into a task draft
    pub fn to_draft(&self) -> Result<TaskDraft, FormErrors> {
        self.validate().map_err(FormErrors::from)?;

        let due_date = parse_due_date(&self.due_date).ok_or_else(|| {
            let mut errors = FormErrors::new();
            errors.add("due_date", DUE_DATE_MESSAGE);
            errors
        })?;

        Ok(TaskDraft {
            title: self.title.clone(),
            priority: self.is_priority(),
            due_date,
            body: self.body.clone(),
        })
    }
}

impl From<&TaskDraft> for TaskForm {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            due_date: draft.due_date.format(DATE_FORMAT).to_string(),
            body: draft.body.clone(),
            priority: draft.priority.then(|| "on".to_string()),
            csrf_token: String::new(),
        }
    }
}

/// Width of the `users.email` column
const EMAIL_MAX_CHARS: usize = 255;

const EMAIL_TOO_LONG_MESSAGE: &str = "Email must be at most 255 characters.";

fn validate_email_length(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() <= EMAIL_MAX_CHARS {
        return Ok(());
    }

    let mut error = ValidationError::new("email_length");
    error.message = Some(EMAIL_TOO_LONG_MESSAGE.into());
    Err(error)
}

const DUE_DATE_MESSAGE: &str = "Enter the due date as YYYY-MM-DD.";

fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    // Empty input is reported by the length rule
    if value.is_empty() || parse_due_date(value).is_some() {
        return Ok(());
    }

    let mut error = ValidationError::new("due_date");
    error.message = Some(DUE_DATE_MESSAGE.into());
    Err(error)
}
