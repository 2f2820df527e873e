/// Task pages
///
/// Every handler here runs behind the login guard and receives the caller's
/// [`AuthContext`]. Lists only ever show the caller's own tasks; detail, edit
/// and delete check ownership of the addressed task first and turn a
/// non-owner away with a warning flash, leaving the task untouched.
///
/// An id that is malformed or names no task renders the 404 page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use taskdesk_shared::{
    auth::{authorization::require_ownership, context::AuthContext},
    models::task::{Task, TaskDraft},
    store::StoreError,
};
use tracing::info;
use uuid::Uuid;

use super::page_context;
use crate::{
    app::AppState,
    csrf,
    error::{WebError, WebResult},
    flash::{self, FlashLevel, FlashMessage},
    forms::{FormErrors, TaskForm},
    views::{self, tasks::TaskFormMode},
};

pub const TITLE_TAKEN_MESSAGE: &str = "A task with that title already exists.";
pub const NOT_ALLOWED_DELETE_MESSAGE: &str = "You are not allowed to delete this task.";
pub const NOT_ALLOWED_EDIT_MESSAGE: &str = "You are not allowed to edit this task.";
pub const NOT_ALLOWED_VIEW_MESSAGE: &str = "You are not allowed to view this task.";

fn task_not_found() -> WebError {
    WebError::NotFound("That task does not exist.".to_string())
}

/// Loads the task addressed by a raw path segment
async fn load_task(state: &AppState, raw_id: &str) -> WebResult<Task> {
    let id = Uuid::parse_str(raw_id).map_err(|_| task_not_found())?;

    state
        .tasks
        .get_by_id(id)
        .await?
        .ok_or_else(task_not_found)
}

/// Sends a non-owner back to their list
fn reject(state: &AppState, jar: CookieJar, message: &str) -> Response {
    let jar = flash::push(jar, &state.cookies, FlashLevel::Warning, message);
    (jar, Redirect::to("/todo")).into_response()
}

#[allow(clippy::too_many_arguments)]
fn render_task_form(
    state: &AppState,
    jar: CookieJar,
    auth: &AuthContext,
    status: StatusCode,
    mode: TaskFormMode,
    form: &TaskForm,
    errors: &FormErrors,
    notice: Option<FlashMessage>,
) -> Response {
    let (jar, csrf_token) = csrf::ensure_token(jar, &state.cookies);
    let (jar, ctx) = page_context(state, jar, Some(&auth.user), notice);

    (
        status,
        jar,
        Html(views::tasks::task_form_page(
            &ctx,
            mode,
            form,
            errors,
            &csrf_token,
        )),
    )
        .into_response()
}

fn title_taken() -> Option<FlashMessage> {
    Some(FlashMessage::new(FlashLevel::Danger, TITLE_TAKEN_MESSAGE))
}

/// `GET /todo`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
) -> WebResult<Response> {
    let tasks = state.tasks.list_by_owner(auth.user_id()).await?;

    let (jar, ctx) = page_context(&state, jar, Some(&auth.user), None);
    Ok((jar, Html(views::tasks::task_list_page(&ctx, &tasks))).into_response())
}

/// `GET /todo/:id`
pub async fn show_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let task = load_task(&state, &id).await?;

    if require_ownership(&auth, &task).is_err() {
        return Ok(reject(&state, jar, NOT_ALLOWED_VIEW_MESSAGE));
    }

    let (jar, ctx) = page_context(&state, jar, Some(&auth.user), None);
    Ok((jar, Html(views::tasks::task_detail_page(&ctx, &task))).into_response())
}

/// `GET /add_todo`
pub async fn new_task_form(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
) -> Response {
    render_task_form(
        &state,
        jar,
        &auth,
        StatusCode::OK,
        TaskFormMode::Add,
        &TaskForm::default(),
        &FormErrors::new(),
        None,
    )
}

/// `POST /add_todo`
///
/// The new task always belongs to the caller. A title already used by any
/// task re-renders the form with 409.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> WebResult<Response> {
    csrf::verify(&jar, &state.cookies, &form.csrf_token)?;

    let form = form.normalized();
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(render_task_form(
                &state,
                jar,
                &auth,
                StatusCode::UNPROCESSABLE_ENTITY,
                TaskFormMode::Add,
                &form,
                &errors,
                None,
            ))
        }
    };

    match state.tasks.create(draft.into_create(auth.user_id())).await {
        Ok(task) => {
            info!(task_id = %task.id, user_id = %auth.user_id(), "Task created");

            let jar = flash::push(jar, &state.cookies, FlashLevel::Success, "Task added.");
            Ok((jar, Redirect::to("/todo")).into_response())
        }
        Err(StoreError::Conflict { .. }) => Ok(render_task_form(
            &state,
            jar,
            &auth,
            StatusCode::CONFLICT,
            TaskFormMode::Add,
            &form,
            &FormErrors::new(),
            title_taken(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// `GET /edit_todo/:id`
pub async fn edit_task_form(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let task = load_task(&state, &id).await?;

    if require_ownership(&auth, &task).is_err() {
        return Ok(reject(&state, jar, NOT_ALLOWED_EDIT_MESSAGE));
    }

    let form = TaskForm::from(&TaskDraft::from(&task));

    Ok(render_task_form(
        &state,
        jar,
        &auth,
        StatusCode::OK,
        TaskFormMode::Edit(task.id),
        &form,
        &FormErrors::new(),
        None,
    ))
}

/// `POST /edit_todo/:id`
///
/// The submitted draft is diffed against the stored task and only changed
/// fields are written; an unchanged form skips the write.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<TaskForm>,
) -> WebResult<Response> {
    csrf::verify(&jar, &state.cookies, &form.csrf_token)?;

    let task = load_task(&state, &id).await?;

    if require_ownership(&auth, &task).is_err() {
        return Ok(reject(&state, jar, NOT_ALLOWED_EDIT_MESSAGE));
    }

    let mode = TaskFormMode::Edit(task.id);
    let form = form.normalized();
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(render_task_form(
                &state,
                jar,
                &auth,
                StatusCode::UNPROCESSABLE_ENTITY,
                mode,
                &form,
                &errors,
                None,
            ))
        }
    };

    let location = format!("/todo/{}", task.id);
    let changes = draft.diff(&task);

    if changes.is_empty() {
        let jar = flash::push(jar, &state.cookies, FlashLevel::Info, "No changes to save.");
        return Ok((jar, Redirect::to(&location)).into_response());
    }

    match state.tasks.update(task.id, changes).await {
        Ok(Some(updated)) => {
            info!(task_id = %updated.id, user_id = %auth.user_id(), "Task updated");

            let jar = flash::push(jar, &state.cookies, FlashLevel::Success, "Task updated.");
            Ok((jar, Redirect::to(&location)).into_response())
        }
        Ok(None) => Err(task_not_found()),
        Err(StoreError::Conflict { .. }) => Ok(render_task_form(
            &state,
            jar,
            &auth,
            StatusCode::CONFLICT,
            mode,
            &form,
            &FormErrors::new(),
            title_taken(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// `GET /delete_todo/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let task = load_task(&state, &id).await?;

    if require_ownership(&auth, &task).is_err() {
        return Ok(reject(&state, jar, NOT_ALLOWED_DELETE_MESSAGE));
    }

    state.tasks.delete(task.id).await?;
    info!(task_id = %task.id, user_id = %auth.user_id(), "Task deleted");

    let jar = flash::push(jar, &state.cookies, FlashLevel::Success, "Task deleted.");
    Ok((jar, Redirect::to("/todo")).into_response())
}
