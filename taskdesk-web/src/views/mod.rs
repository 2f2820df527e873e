/// Server-rendered HTML pages
///
/// Pages are assembled with `format!`. Every piece of user-supplied text
/// passes through [`html_escape`] before it is interpolated.
///
/// - `auth`: registration and login forms
/// - `tasks`: task list, add/edit form and detail view

pub mod auth;
pub mod tasks;

use axum::http::StatusCode;
use taskdesk_shared::models::user::User;

use crate::flash::FlashMessage;

/// Per-request data every page needs: who is logged in and pending notices
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<User>,
    pub flashes: Vec<FlashMessage>,
}

impl PageContext {
    pub fn new(user: Option<User>, flashes: Vec<FlashMessage>) -> Self {
        Self { user, flashes }
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1f2328; }
nav { display: flex; gap: 1rem; align-items: center; padding: 0.75rem 1.5rem; background: #24292f; }
nav a { color: #fff; text-decoration: none; }
nav .spacer { flex: 1; }
nav .user { color: #c9d1d9; }
main { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
.flash { padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.flash-success { background: #dafbe1; }
.flash-info { background: #ddf4ff; }
.flash-warning { background: #fff8c5; }
.flash-danger { background: #ffebe9; }
form .field { margin-bottom: 1rem; display: flex; flex-direction: column; gap: 0.25rem; }
form .error { color: #cf222e; font-size: 0.875rem; }
input[type=text], input[type=email], input[type=password], input[type=date], textarea { padding: 0.5rem; font: inherit; }
button, .button { padding: 0.5rem 1rem; border: 0; border-radius: 6px; background: #1f883d; color: #fff; text-decoration: none; font: inherit; cursor: pointer; }
.danger { background: #cf222e; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #d0d7de; }
.badge { background: #cf222e; color: #fff; border-radius: 4px; padding: 0 0.4rem; font-size: 0.75rem; }
.empty-state { color: #656d76; }
"#;

fn nav(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            r#"<nav>
  <a href="/">Home</a>
  <a href="/todo">Tasks</a>
  <a href="/add_todo">Add task</a>
  <a href="/about">About</a>
  <span class="spacer"></span>
  <span class="user">{}</span>
  <a href="/logout">Log out</a>
</nav>"#,
            html_escape(&user.username)
        ),
        None => r#"<nav>
  <a href="/">Home</a>
  <span class="spacer"></span>
  <a href="/login">Log in</a>
  <a href="/register">Register</a>
</nav>"#
            .to_string(),
    }
}

fn flashes(messages: &[FlashMessage]) -> String {
    messages
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="flash flash-{}" role="alert">{}</div>"#,
                flash.level.as_str(),
                html_escape(&flash.message)
            )
        })
        .collect()
}

fn document(title: &str, nav: &str, flashes: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{} · TaskDesk</title>
  <style>{}</style>
</head>
<body>
{}
<main>
{}
{}
</main>
</body>
</html>"#,
        html_escape(title),
        STYLE,
        nav,
        flashes,
        content
    )
}

/// Wraps page content in the shared layout
pub fn layout(title: &str, ctx: &PageContext, content: &str) -> String {
    document(
        title,
        &nav(ctx.user.as_ref()),
        &flashes(&ctx.flashes),
        content,
    )
}

/// Hidden CSRF input for forms
pub(crate) fn csrf_input(token: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        crate::csrf::CSRF_FIELD,
        html_escape(token)
    )
}

/// Inline validation message for a form field
pub(crate) fn field_error(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<span class="error">{}</span>"#, html_escape(m)))
        .unwrap_or_default()
}

pub fn home_page(ctx: &PageContext) -> String {
    let call_to_action = match &ctx.user {
        Some(user) => format!(
            r#"<p>Welcome back, {}.</p>
<p><a class="button" href="/todo">Go to your tasks</a></p>"#,
            html_escape(&user.username)
        ),
        None => r#"<p><a class="button" href="/register">Create an account</a> or <a href="/login">log in</a>.</p>"#
            .to_string(),
    };

    layout(
        "Home",
        ctx,
        &format!(
            r#"<h1>TaskDesk</h1>
<p>A small to-do list: add tasks with a due date, flag the important ones, and tick them off.</p>
{}"#,
            call_to_action
        ),
    )
}

pub fn about_page(ctx: &PageContext) -> String {
    layout(
        "About",
        ctx,
        &format!(
            r#"<h1>About</h1>
<p>TaskDesk {} keeps a private list of tasks for every account.
Tasks are sorted by due date, with priority tasks first on the same day.</p>
<p>Only you can see, edit or delete your tasks.</p>"#,
            env!("CARGO_PKG_VERSION")
        ),
    )
}

/// Standalone error page
///
/// Errors render outside any session, so the navigation only links home.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = match status {
        StatusCode::NOT_FOUND => "Page not found",
        StatusCode::BAD_REQUEST => "Bad request",
        _ => "Something went wrong",
    };

    document(
        heading,
        r#"<nav><a href="/">Home</a></nav>"#,
        "",
        &format!(
            r#"<h1>{} <small>({})</small></h1>
<p>{}</p>
<p><a href="/">Back to the home page</a></p>"#,
            heading,
            status.as_u16(),
            html_escape(message)
        ),
    )
}
