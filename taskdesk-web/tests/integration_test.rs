/// Integration tests for the TaskDesk web server
///
/// These tests drive the full router against the in-memory stores:
/// - Registration, login and logout
/// - The login guard on protected pages
/// - Task add, list, detail, edit and delete
/// - Ownership checks between two users
/// - CSRF protection and cookie tampering

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Duration;
use common::{add_task, login, register, TestApp};
use taskdesk_shared::store::{memory::MemoryStore, session::SessionStore, StoreError};
use uuid::Uuid;

/// Session store whose deletes always fail
struct UndeletableSessions(MemoryStore);

#[async_trait]
impl SessionStore for UndeletableSessions {
    async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, StoreError> {
        self.0.create(user_id, ttl).await
    }

    async fn find_user_id(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        self.0.find_user_id(token).await
    }

    async fn delete(&self, _token: &str) -> Result<bool, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        self.0.purge_expired().await
    }
}

/// Walkthrough: alice adds a task, bob cannot see or delete it, alice can
#[tokio::test]
async fn test_two_user_scenario() {
    let app = TestApp::new();
    let mut alice = app.client();
    let mut bob = app.client();

    register(&mut alice, "a@x.com", "alice", "p1")
        .await
        .assert_redirect("/todo");

    add_task(&mut alice, "buy milk", "2024-01-01", "from store", false)
        .await
        .assert_redirect("/todo");

    let list = alice.get("/todo").await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("buy milk"));
    assert!(list.body.contains("Task added."));

    let task = app.task_titled("a@x.com", "buy milk").await;

    register(&mut bob, "b@x.com", "bob", "p1")
        .await
        .assert_redirect("/todo");

    let bob_list = bob.get("/todo").await;
    assert!(!bob_list.body.contains("buy milk"));

    bob.get(&format!("/delete_todo/{}", task.id))
        .await
        .assert_redirect("/todo");
    let after = bob.get("/todo").await;
    assert!(after.body.contains("You are not allowed to delete this task."));
    assert!(app.state.tasks.get_by_id(task.id).await.unwrap().is_some());

    alice
        .get(&format!("/delete_todo/{}", task.id))
        .await
        .assert_redirect("/todo");
    assert!(app.state.tasks.get_by_id(task.id).await.unwrap().is_none());

    let list = alice.get("/todo").await;
    assert!(!list.body.contains("buy milk"));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let app = TestApp::new();
    let mut client = app.client();

    register(&mut client, "a@x.com", "alice", "p1").await;

    let user = app
        .state
        .users
        .find_by_email("a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(user.password_hash, "p1");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_anonymous_requests_redirect_to_login() {
    let app = TestApp::new();
    let mut client = app.client();

    for path in [
        "/todo",
        "/about",
        "/add_todo",
        "/todo/00000000-0000-0000-0000-000000000000",
        "/edit_todo/00000000-0000-0000-0000-000000000000",
        "/delete_todo/00000000-0000-0000-0000-000000000000",
    ] {
        client.get(path).await.assert_redirect("/login");
    }

    let login_page = client.get("/login").await;
    assert!(login_page.body.contains("Please log in to access this page."));
}

#[tokio::test]
async fn test_anonymous_post_creates_nothing() {
    let app = TestApp::new();
    let mut client = app.client();

    client
        .post_form(
            "/add_todo",
            &[
                ("title", "sneaky"),
                ("due_date", "2024-01-01"),
                ("body", "x"),
            ],
        )
        .await
        .assert_redirect("/login");
}

#[tokio::test]
async fn test_public_pages() {
    let app = TestApp::new();
    let mut client = app.client();

    for path in ["/", "/login", "/register"] {
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::OK, "GET {}", path);
    }
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::new();
    let mut first = app.client();
    let mut second = app.client();

    register(&mut first, "a@x.com", "alice", "p1").await;

    let response = register(&mut second, "A@X.com", "someone", "p2").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.body.contains("Email already registered!"));
    assert_eq!(app.state.users.count().await.unwrap(), 1);
    assert!(second.cookie("taskdesk_session").is_none());
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let app = TestApp::new();
    let mut first = app.client();
    let mut second = app.client();

    register(&mut first, "a@x.com", "alice", "p1").await;

    let response = register(&mut second, "other@x.com", "alice", "p2").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.body.contains("Username already taken!"));
    assert_eq!(app.state.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client
        .submit(
            "/register",
            "/register",
            &[
                ("email", "a@x.com"),
                ("username", "alice"),
                ("password", "p1"),
                ("confirm_password", "p2"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Passwords must match."));
    assert_eq!(app.state.users.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = register(&mut client, "not-an-email", "alice", "p1").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.state.users.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let mut owner = app.client();
    register(&mut owner, "a@x.com", "alice", "p1").await;

    let mut client = app.client();

    let wrong_password = login(&mut client, "a@x.com", "nope").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert!(wrong_password.body.contains("Invalid email or password."));

    let unknown_email = login(&mut client, "nobody@x.com", "p1").await;
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert!(unknown_email.body.contains("Invalid email or password."));

    assert!(client.cookie("taskdesk_session").is_none());
    client.get("/todo").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_login_then_logout() {
    let app = TestApp::new();
    let mut registering = app.client();
    register(&mut registering, "a@x.com", "alice", "p1").await;

    let mut client = app.client();
    login(&mut client, " A@x.com ", "p1")
        .await
        .assert_redirect("/todo");

    let list = client.get("/todo").await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("alice"));

    let stale_session = client.cookie("taskdesk_session").unwrap().to_string();

    client.get("/logout").await.assert_redirect("/");
    assert!(client.cookie("taskdesk_session").is_none());
    client.get("/todo").await.assert_redirect("/login");

    // The old cookie no longer resolves once the session is deleted
    let mut replay = app.client();
    replay.set_cookie("taskdesk_session", &stale_session);
    replay.get("/todo").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::new();
    let mut client = app.client();

    client.get("/logout").await.assert_redirect("/");
}

#[tokio::test]
async fn test_logout_clears_cookie_when_session_delete_fails() {
    let app = TestApp::with_sessions(Arc::new(UndeletableSessions(MemoryStore::new())));
    let mut client = app.client();

    // Registering a fresh browser creates a session without deleting one
    register(&mut client, "a@x.com", "alice", "p1")
        .await
        .assert_redirect("/todo");
    assert!(client.cookie("taskdesk_session").is_some());

    client.get("/logout").await.assert_redirect("/");
    assert!(client.cookie("taskdesk_session").is_none());
    client.get("/todo").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_tampered_session_cookie_is_anonymous() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;

    let cookie = client.cookie("taskdesk_session").unwrap().to_string();
    let (token, _signature) = cookie.rsplit_once('.').unwrap();

    let mut forger = app.client();
    forger.set_cookie("taskdesk_session", &format!("{}.{}", token, "00".repeat(32)));
    forger.get("/todo").await.assert_redirect("/login");

    // An unsigned raw token is rejected as well
    forger.set_cookie("taskdesk_session", token);
    forger.get("/todo").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_post_without_csrf_token_is_rejected() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;

    let response = client
        .post_form(
            "/add_todo",
            &[
                ("title", "buy milk"),
                ("due_date", "2024-01-01"),
                ("body", "from store"),
                ("csrf_token", "forged"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("The form has expired. Please try again."));
    assert!(app.tasks_of("a@x.com").await.is_empty());
}

#[tokio::test]
async fn test_add_task_validation() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;

    let response = add_task(&mut client, "buy milk", "tomorrow", "from store", false).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("YYYY-MM-DD"));
    assert!(response.body.contains(r#"value="buy milk""#));
    assert!(app.tasks_of("a@x.com").await.is_empty());
}

#[tokio::test]
async fn test_task_title_unique_across_users() {
    let app = TestApp::new();
    let mut alice = app.client();
    let mut bob = app.client();
    register(&mut alice, "a@x.com", "alice", "p1").await;
    register(&mut bob, "b@x.com", "bob", "p1").await;

    add_task(&mut alice, "buy milk", "2024-01-01", "from store", false).await;

    let response = add_task(&mut bob, "buy milk", "2024-02-01", "oat milk", true).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.body.contains("A task with that title already exists."));
    assert!(app.tasks_of("b@x.com").await.is_empty());
}

#[tokio::test]
async fn test_task_list_order() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;

    add_task(&mut client, "later", "2024-03-01", "x", false).await;
    add_task(&mut client, "sooner", "2024-01-01", "x", false).await;
    add_task(&mut client, "sooner but urgent", "2024-01-01", "x", true).await;

    let body = client.get("/todo").await.body;
    let urgent = body.find("sooner but urgent").unwrap();
    let sooner = body.find(">sooner<").unwrap();
    let later = body.find(">later<").unwrap();

    assert!(urgent < sooner);
    assert!(sooner < later);
}

#[tokio::test]
async fn test_detail_view() {
    let app = TestApp::new();
    let mut alice = app.client();
    let mut bob = app.client();
    register(&mut alice, "a@x.com", "alice", "p1").await;
    register(&mut bob, "b@x.com", "bob", "p1").await;
    add_task(&mut alice, "buy milk", "2024-01-01", "from store", true).await;
    let task = app.task_titled("a@x.com", "buy milk").await;

    let detail = alice.get(&format!("/todo/{}", task.id)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("from store"));
    assert!(detail.body.contains("2024-01-01"));

    bob.get(&format!("/todo/{}", task.id))
        .await
        .assert_redirect("/todo");
    let after = bob.get("/todo").await;
    assert!(after.body.contains("You are not allowed to view this task."));
}

#[tokio::test]
async fn test_edit_task_by_owner() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;
    add_task(&mut client, "buy milk", "2024-01-01", "from store", false).await;
    let task = app.task_titled("a@x.com", "buy milk").await;

    let edit_path = format!("/edit_todo/{}", task.id);
    let form = client.get(&edit_path).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains(r#"value="buy milk""#));
    assert!(form.body.contains(r#"value="2024-01-01""#));

    client
        .submit(
            &edit_path,
            &edit_path,
            &[
                ("title", "buy oat milk"),
                ("due_date", "2024-01-02"),
                ("body", "from store"),
                ("priority", "on"),
            ],
        )
        .await
        .assert_redirect(&format!("/todo/{}", task.id));

    let updated = app.state.tasks.get_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "buy oat milk");
    assert_eq!(updated.due_date.to_string(), "2024-01-02");
    assert!(updated.priority);
    assert_eq!(updated.author_id, task.author_id);

    let detail = client.get(&format!("/todo/{}", task.id)).await;
    assert!(detail.body.contains("Task updated."));
}

#[tokio::test]
async fn test_edit_without_changes_skips_write() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;
    add_task(&mut client, "buy milk", "2024-01-01", "from store", false).await;
    let task = app.task_titled("a@x.com", "buy milk").await;

    let edit_path = format!("/edit_todo/{}", task.id);
    client
        .submit(
            &edit_path,
            &edit_path,
            &[
                ("title", "buy milk"),
                ("due_date", "2024-01-01"),
                ("body", "from store"),
            ],
        )
        .await
        .assert_redirect(&format!("/todo/{}", task.id));

    let unchanged = app.state.tasks.get_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.updated_at, task.updated_at);
}

#[tokio::test]
async fn test_edit_by_non_owner_leaves_task_unchanged() {
    let app = TestApp::new();
    let mut alice = app.client();
    let mut bob = app.client();
    register(&mut alice, "a@x.com", "alice", "p1").await;
    register(&mut bob, "b@x.com", "bob", "p1").await;
    add_task(&mut alice, "buy milk", "2024-01-01", "from store", false).await;
    let task = app.task_titled("a@x.com", "buy milk").await;

    let edit_path = format!("/edit_todo/{}", task.id);
    bob.get(&edit_path).await.assert_redirect("/todo");

    // Bob posts with his own valid CSRF token
    bob.submit(
        "/add_todo",
        &edit_path,
        &[
            ("title", "hijacked"),
            ("due_date", "2030-01-01"),
            ("body", "mine now"),
        ],
    )
    .await
    .assert_redirect("/todo");

    let stored = app.state.tasks.get_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored, task);
}

#[tokio::test]
async fn test_edit_title_conflict() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;
    add_task(&mut client, "buy milk", "2024-01-01", "from store", false).await;
    add_task(&mut client, "buy bread", "2024-01-01", "from bakery", false).await;
    let bread = app.task_titled("a@x.com", "buy bread").await;

    let edit_path = format!("/edit_todo/{}", bread.id);
    let response = client
        .submit(
            &edit_path,
            &edit_path,
            &[
                ("title", "buy milk"),
                ("due_date", "2024-01-01"),
                ("body", "from bakery"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.body.contains("A task with that title already exists."));
    assert_eq!(
        app.state.tasks.get_by_id(bread.id).await.unwrap().unwrap().title,
        "buy bread"
    );
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_render_not_found() {
    let app = TestApp::new();
    let mut client = app.client();
    register(&mut client, "a@x.com", "alice", "p1").await;

    for path in [
        "/todo/not-a-uuid",
        "/todo/00000000-0000-0000-0000-000000000000",
        "/edit_todo/42",
        "/delete_todo/00000000-0000-0000-0000-000000000000",
    ] {
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "GET {}", path);
        assert!(response.body.contains("Page not found"));
    }
}

#[tokio::test]
async fn test_unknown_route_renders_not_found() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client.get("/no/such/page").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn test_security_headers_on_pages() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client.get("/").await;
    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers.get("content-security-policy").is_some());
    assert!(response.headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = register(&mut client, "a@x.com", "alice", "p1").await;
    let set_cookie = response
        .headers
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|v| v.starts_with("taskdesk_session="))
        .unwrap();

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
}
