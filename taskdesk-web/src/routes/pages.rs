/// Static pages and the not-found fallback

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use taskdesk_shared::auth::context::{AuthContext, SessionState};

use super::page_context;
use crate::{app::AppState, error::WebError, views};

/// `GET /`
pub async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<SessionState>,
    jar: CookieJar,
) -> Response {
    let (jar, ctx) = page_context(&state, jar, session.current_user(), None);
    (jar, Html(views::home_page(&ctx))).into_response()
}

/// `GET /about`
pub async fn about(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
) -> Response {
    let (jar, ctx) = page_context(&state, jar, Some(&auth.user), None);
    (jar, Html(views::about_page(&ctx))).into_response()
}

/// Fallback for unknown paths
pub async fn not_found() -> WebError {
    WebError::NotFound("The page you requested does not exist.".to_string())
}
