/// Registration and login pages

use super::{csrf_input, field_error, html_escape, layout, PageContext};
use crate::forms::{FormErrors, LoginForm, RegisterForm};

/// Registration form; passwords are never echoed back
pub fn register_page(
    ctx: &PageContext,
    form: &RegisterForm,
    errors: &FormErrors,
    csrf_token: &str,
) -> String {
    layout(
        "Register",
        ctx,
        &format!(
            r#"<h1>Register</h1>
<form method="post" action="/register">
  {}
  <div class="field">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{}" required>
    {}
  </div>
  <div class="field">
    <label for="username">Username</label>
    <input type="text" id="username" name="username" value="{}" required>
    {}
  </div>
  <div class="field">
    <label for="password">Password</label>
    <input type="password" id="password" name="password" required>
    {}
  </div>
  <div class="field">
    <label for="confirm_password">Confirm password</label>
    <input type="password" id="confirm_password" name="confirm_password" required>
    {}
  </div>
  <button type="submit">Register</button>
</form>
<p>Already have an account? <a href="/login">Log in</a>.</p>"#,
            csrf_input(csrf_token),
            html_escape(&form.email),
            field_error(errors.first("email")),
            html_escape(&form.username),
            field_error(errors.first("username")),
            field_error(errors.first("password")),
            field_error(errors.first("confirm_password")),
        ),
    )
}

pub fn login_page(
    ctx: &PageContext,
    form: &LoginForm,
    errors: &FormErrors,
    csrf_token: &str,
) -> String {
    layout(
        "Log in",
        ctx,
        &format!(
            r#"<h1>Log in</h1>
<form method="post" action="/login">
  {}
  <div class="field">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{}" required>
    {}
  </div>
  <div class="field">
    <label for="password">Password</label>
    <input type="password" id="password" name="password" required>
    {}
  </div>
  <button type="submit">Log in</button>
</form>
<p>New here? <a href="/register">Create an account</a>.</p>"#,
            csrf_input(csrf_token),
            html_escape(&form.email),
            field_error(errors.first("email")),
            field_error(errors.first("password")),
        ),
    )
}
