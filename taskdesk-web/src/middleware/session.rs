/// Session resolution and the login guard
///
/// [`load_session`] runs on every request: it reads the signed session
/// cookie, resolves it through the stores and inserts a [`SessionState`]
/// into the request extensions.
///
/// [`require_auth`] wraps the protected routes. Anonymous requests are
/// redirected to `/login` with a flash before any handler runs; otherwise
/// the handler receives an [`AuthContext`] extension.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use taskdesk_shared::auth::{context::SessionState, session::resolve_session};
use tracing::debug;

use crate::{
    app::AppState,
    error::WebError,
    flash::{self, FlashLevel},
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "taskdesk_session";

/// Flash shown when an anonymous visitor hits a protected page
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Resolves the session cookie into a [`SessionState`] extension
pub async fn load_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = state.cookies.read(&jar, SESSION_COOKIE);

    let session = resolve_session(&*state.users, &*state.sessions, token.as_deref()).await?;

    if token.is_some() && !session.is_authenticated() {
        debug!("Session cookie did not resolve to a user");
    }

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Lets authenticated requests through with an [`AuthContext`] extension
///
/// [`AuthContext`]: taskdesk_shared::auth::context::AuthContext
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = request
        .extensions()
        .get::<SessionState>()
        .cloned()
        .unwrap_or_default();

    match session {
        SessionState::Authenticated(auth) => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        SessionState::Anonymous => {
            debug!(path = %request.uri().path(), "Anonymous request to protected page");

            let jar = flash::push(jar, &state.cookies, FlashLevel::Info, LOGIN_REQUIRED_MESSAGE);
            (jar, Redirect::to("/login")).into_response()
        }
    }
}
