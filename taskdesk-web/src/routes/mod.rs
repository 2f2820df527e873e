/// Route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `pages`: Home, about and the not-found fallback
/// - `auth`: Registration, login and logout
/// - `tasks`: Task list, add, edit, delete and detail
/// - `health`: Health check endpoint

pub mod auth;
pub mod health;
pub mod pages;
pub mod tasks;

use axum_extra::extract::cookie::CookieJar;
use taskdesk_shared::models::user::User;

use crate::{
    app::AppState,
    flash::{self, FlashMessage},
    views::PageContext,
};

/// Takes pending flashes and builds the context for a rendered page
///
/// `notice` is shown on this page directly, without a redirect.
pub(crate) fn page_context(
    state: &AppState,
    jar: CookieJar,
    user: Option<&User>,
    notice: Option<FlashMessage>,
) -> (CookieJar, PageContext) {
    let (jar, mut flashes) = flash::take(jar, &state.cookies);
    flashes.extend(notice);

    (jar, PageContext::new(user.cloned(), flashes))
}
