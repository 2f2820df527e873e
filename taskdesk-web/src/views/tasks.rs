/// Task list, add/edit form and detail pages

use taskdesk_shared::models::task::Task;
use uuid::Uuid;

use super::{csrf_input, field_error, html_escape, layout, PageContext};
use crate::forms::{FormErrors, TaskForm, DATE_FORMAT};

/// Whether the task form creates a new task or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormMode {
    Add,
    Edit(Uuid),
}

impl TaskFormMode {
    fn action(&self) -> String {
        match self {
            TaskFormMode::Add => "/add_todo".to_string(),
            TaskFormMode::Edit(id) => format!("/edit_todo/{}", id),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            TaskFormMode::Add => "Add task",
            TaskFormMode::Edit(_) => "Edit task",
        }
    }
}

fn priority_badge(task: &Task) -> &'static str {
    if task.priority {
        r#" <span class="badge">priority</span>"#
    } else {
        ""
    }
}

/// The current user's tasks, already ordered by the store
pub fn task_list_page(ctx: &PageContext, tasks: &[Task]) -> String {
    let content = if tasks.is_empty() {
        r#"<h1>Your tasks</h1>
<p class="empty-state">Nothing to do yet. <a href="/add_todo">Add your first task</a>.</p>"#
            .to_string()
    } else {
        let rows: String = tasks
            .iter()
            .map(|task| {
                format!(
                    r#"<tr>
  <td>{}</td>
  <td><a href="/todo/{}">{}</a>{}</td>
  <td><a href="/edit_todo/{}">Edit</a> · <a href="/delete_todo/{}">Delete</a></td>
</tr>"#,
                    task.due_date.format(DATE_FORMAT),
                    task.id,
                    html_escape(&task.title),
                    priority_badge(task),
                    task.id,
                    task.id
                )
            })
            .collect();

        format!(
            r#"<h1>Your tasks</h1>
<table>
<thead><tr><th>Due</th><th>Title</th><th></th></tr></thead>
<tbody>
{}
</tbody>
</table>
<p><a class="button" href="/add_todo">Add task</a></p>"#,
            rows
        )
    };

    layout("Tasks", ctx, &content)
}

pub fn task_form_page(
    ctx: &PageContext,
    mode: TaskFormMode,
    form: &TaskForm,
    errors: &FormErrors,
    csrf_token: &str,
) -> String {
    let cancel_href = match mode {
        TaskFormMode::Add => "/todo".to_string(),
        TaskFormMode::Edit(id) => format!("/todo/{}", id),
    };

    layout(
        mode.heading(),
        ctx,
        &format!(
            r#"<h1>{}</h1>
<form method="post" action="{}">
  {}
  <div class="field">
    <label for="title">Title</label>
    <input type="text" id="title" name="title" value="{}" maxlength="250" required>
    {}
  </div>
  <div class="field">
    <label for="due_date">Due date</label>
    <input type="date" id="due_date" name="due_date" value="{}" required>
    {}
  </div>
  <div class="field">
    <label for="body">Description</label>
    <textarea id="body" name="body" rows="4" required>{}</textarea>
    {}
  </div>
  <div class="field">
    <label><input type="checkbox" name="priority"{}> Priority</label>
  </div>
  <button type="submit">Save</button>
  <a href="{}">Cancel</a>
</form>"#,
            mode.heading(),
            mode.action(),
            csrf_input(csrf_token),
            html_escape(&form.title),
            field_error(errors.first("title")),
            html_escape(&form.due_date),
            field_error(errors.first("due_date")),
            html_escape(&form.body),
            field_error(errors.first("body")),
            if form.is_priority() { " checked" } else { "" },
            cancel_href
        ),
    )
}

pub fn task_detail_page(ctx: &PageContext, task: &Task) -> String {
    layout(
        &task.title,
        ctx,
        &format!(
            r#"<h1>{}{}</h1>
<p><strong>Due:</strong> {}</p>
<p>{}</p>
<p><small>Created {} · Updated {}</small></p>
<p>
  <a class="button" href="/edit_todo/{}">Edit</a>
  <a class="button danger" href="/delete_todo/{}">Delete</a>
  <a href="/todo">Back to tasks</a>
</p>"#,
            html_escape(&task.title),
            priority_badge(task),
            task.due_date.format(DATE_FORMAT),
            html_escape(&task.body),
            task.created_at.format("%Y-%m-%d %H:%M UTC"),
            task.updated_at.format("%Y-%m-%d %H:%M UTC"),
            task.id,
            task.id
        ),
    )
}
