/// Authentication pages
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Logout
///
/// # Endpoints
///
/// - `GET/POST /register` - Register a new account and log in
/// - `GET/POST /login` - Log in with email and password
/// - `GET /logout` - End the current session
///
/// Successful registration and login both start a new session: any session
/// the browser already carried is deleted first, a fresh token is stored and
/// handed out in the signed `taskdesk_session` cookie.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use taskdesk_shared::{
    auth::{
        context::SessionState,
        password::{hash_password, verify_dummy_password, verify_password},
    },
    models::user::{normalize_email, CreateUser},
    store::StoreError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::page_context;
use crate::{
    app::AppState,
    csrf,
    error::WebResult,
    flash::{self, FlashLevel, FlashMessage},
    forms::{FormErrors, LoginForm, RegisterForm},
    middleware::session::SESSION_COOKIE,
    views,
};

pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered!";
pub const USERNAME_TAKEN_MESSAGE: &str = "Username already taken!";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

fn render_register(
    state: &AppState,
    jar: CookieJar,
    session: &SessionState,
    status: StatusCode,
    form: &RegisterForm,
    errors: &FormErrors,
    notice: Option<FlashMessage>,
) -> Response {
    let (jar, csrf_token) = csrf::ensure_token(jar, &state.cookies);
    let (jar, ctx) = page_context(state, jar, session.current_user(), notice);

    (
        status,
        jar,
        Html(views::auth::register_page(&ctx, form, errors, &csrf_token)),
    )
        .into_response()
}

fn render_login(
    state: &AppState,
    jar: CookieJar,
    session: &SessionState,
    status: StatusCode,
    form: &LoginForm,
    errors: &FormErrors,
    notice: Option<FlashMessage>,
) -> Response {
    let (jar, csrf_token) = csrf::ensure_token(jar, &state.cookies);
    let (jar, ctx) = page_context(state, jar, session.current_user(), notice);

    (
        status,
        jar,
        Html(views::auth::login_page(&ctx, form, errors, &csrf_token)),
    )
        .into_response()
}

/// Binds a new session to `user_id` and sets the session cookie
async fn start_session(state: &AppState, jar: CookieJar, user_id: Uuid) -> WebResult<CookieJar> {
    if let Some(previous) = state.cookies.read(&jar, SESSION_COOKIE) {
        state.sessions.delete(&previous).await?;
    }

    let token = state
        .sessions
        .create(user_id, state.config.session_ttl())
        .await?;

    Ok(jar.add(state.cookies.signed(SESSION_COOKIE, &token)))
}

/// `GET /register`
pub async fn register_form(
    State(state): State<AppState>,
    Extension(session): Extension<SessionState>,
    jar: CookieJar,
) -> Response {
    render_register(
        &state,
        jar,
        &session,
        StatusCode::OK,
        &RegisterForm::default(),
        &FormErrors::new(),
        None,
    )
}

/// `POST /register`
///
/// # Errors
///
/// - `400 Bad Request`: CSRF token missing or stale
/// - `500 Internal Server Error`: store or hashing failure
///
/// Validation failures (422) and taken email/username (409) re-render the
/// form; nothing is created.
pub async fn register(
    State(state): State<AppState>,
    Extension(session): Extension<SessionState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> WebResult<Response> {
    csrf::verify(&jar, &state.cookies, &form.csrf_token)?;

    let form = form.normalized();
    if let Err(errors) = form.check() {
        return Ok(render_register(
            &state,
            jar,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            &errors,
            None,
        ));
    }

    let taken = if state
        .users
        .find_by_email(&normalize_email(&form.email))
        .await?
        .is_some()
    {
        Some(EMAIL_TAKEN_MESSAGE)
    } else if state
        .users
        .find_by_username(&form.username)
        .await?
        .is_some()
    {
        Some(USERNAME_TAKEN_MESSAGE)
    } else {
        None
    };

    if let Some(message) = taken {
        info!(reason = message, "Registration rejected");
        return Ok(render_register(
            &state,
            jar,
            &session,
            StatusCode::CONFLICT,
            &form,
            &FormErrors::new(),
            Some(FlashMessage::new(FlashLevel::Danger, message)),
        ));
    }

    let password_hash = hash_password(&form.password)?;

    let user = match state
        .users
        .create(CreateUser::new(&form.email, &form.username, password_hash))
        .await
    {
        Ok(user) => user,
        Err(StoreError::Conflict { field }) => {
            // Lost a race with a concurrent registration
            let message = if field == "email" {
                EMAIL_TAKEN_MESSAGE
            } else {
                USERNAME_TAKEN_MESSAGE
            };
            return Ok(render_register(
                &state,
                jar,
                &session,
                StatusCode::CONFLICT,
                &form,
                &FormErrors::new(),
                Some(FlashMessage::new(FlashLevel::Danger, message)),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, username = %user.username, "User registered");

    let jar = start_session(&state, jar, user.id).await?;
    let jar = flash::push(
        jar,
        &state.cookies,
        FlashLevel::Success,
        format!("Welcome, {}!", user.username),
    );

    Ok((jar, Redirect::to("/todo")).into_response())
}

/// `GET /login`
pub async fn login_form(
    State(state): State<AppState>,
    Extension(session): Extension<SessionState>,
    jar: CookieJar,
) -> Response {
    render_login(
        &state,
        jar,
        &session,
        StatusCode::OK,
        &LoginForm::default(),
        &FormErrors::new(),
        None,
    )
}

/// `POST /login`
///
/// Unknown email and wrong password produce the same 401 page.
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<SessionState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    csrf::verify(&jar, &state.cookies, &form.csrf_token)?;

    let form = form.normalized();
    if let Err(errors) = form.check() {
        return Ok(render_login(
            &state,
            jar,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            &errors,
            None,
        ));
    }

    let user = state
        .users
        .find_by_email(&normalize_email(&form.email))
        .await?;

    let authenticated = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash).unwrap_or_else(|e| {
            warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
            false
        }),
        None => verify_dummy_password(&form.password),
    };

    let user = match user {
        Some(user) if authenticated => user,
        _ => {
            info!("Login failed");
            return Ok(render_login(
                &state,
                jar,
                &session,
                StatusCode::UNAUTHORIZED,
                &form,
                &FormErrors::new(),
                Some(FlashMessage::new(
                    FlashLevel::Danger,
                    INVALID_CREDENTIALS_MESSAGE,
                )),
            ));
        }
    };

    match state.sessions.purge_expired().await {
        Ok(0) => {}
        Ok(purged) => debug!(purged, "Purged expired sessions"),
        Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
    }

    let jar = start_session(&state, jar, user.id).await?;
    info!(user_id = %user.id, "User logged in");

    let jar = flash::push(
        jar,
        &state.cookies,
        FlashLevel::Success,
        format!("Welcome back, {}!", user.username),
    );

    Ok((jar, Redirect::to("/todo")).into_response())
}

/// `GET /logout`
///
/// Always succeeds, with or without a session. The cookie is cleared even
/// when the stored session cannot be deleted.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = state.cookies.read(&jar, SESSION_COOKIE) {
        match state.sessions.delete(&token).await {
            Ok(true) => info!("User logged out"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to delete session on logout"),
        }
    }

    let jar = state.cookies.remove(jar, SESSION_COOKIE);
    let jar = flash::push(jar, &state.cookies, FlashLevel::Info, "You have been logged out.");

    (jar, Redirect::to("/")).into_response()
}
