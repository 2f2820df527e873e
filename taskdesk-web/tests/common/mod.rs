//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An application wired to the in-memory stores
//! - A browser-like client that keeps cookies between requests
//! - CSRF token scraping from rendered forms
//! - Helpers for registering, logging in and adding tasks

#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use taskdesk_shared::{
    models::task::Task,
    store::{memory::MemoryStore, session::SessionStore},
};
use taskdesk_web::{
    app::{build_router, AppState},
    config::Config,
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context: the shared state and a router over it
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SESSION_SECRET" => Some(TEST_SECRET.to_string()),
        "DATABASE_URL" => Some("postgresql://unused/taskdesk_test".to_string()),
        _ => None,
    })
    .expect("test config should load")
}

impl TestApp {
    pub fn new() -> Self {
        Self::from_state(AppState::in_memory(test_config()))
    }

    /// In-memory users and tasks with the given session store
    pub fn with_sessions(sessions: Arc<dyn SessionStore>) -> Self {
        let store = MemoryStore::new();

        Self::from_state(AppState::with_stores(
            Arc::new(store.clone()),
            Arc::new(store),
            sessions,
            test_config(),
        ))
    }

    fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());

        Self { state, router }
    }

    /// A new browser with an empty cookie jar
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookies: BTreeMap::new(),
        }
    }

    /// Tasks owned by the user registered under `email`
    pub async fn tasks_of(&self, email: &str) -> Vec<Task> {
        let user = self
            .state
            .users
            .find_by_email(email)
            .await
            .unwrap()
            .expect("user should exist");

        self.state.tasks.list_by_owner(user.id).await.unwrap()
    }

    /// The single task with `title`, whoever owns it
    pub async fn task_titled(&self, email: &str, title: &str) -> Task {
        self.tasks_of(email)
            .await
            .into_iter()
            .find(|t| t.title == title)
            .expect("task should exist")
    }
}

/// A response with its body read
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(
            self.status,
            StatusCode::SEE_OTHER,
            "expected redirect to {}, body: {}",
            to,
            self.body
        );
        assert_eq!(self.location.as_deref(), Some(to));
    }
}

/// Keeps cookies between requests like a browser would
pub struct TestClient {
    router: Router,
    cookies: BTreeMap<String, String>,
}

impl TestClient {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Posts a form exactly as given, without adding a CSRF token
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();

        self.send(request).await
    }

    /// Loads `form_page`, then posts `fields` plus its CSRF token to `action`
    pub async fn submit(
        &mut self,
        form_page: &str,
        action: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let page = self.get(form_page).await;
        let token = scrape_csrf_token(&page.body).expect("form page should carry a CSRF token");

        let mut with_token = fields.to_vec();
        with_token.push(("csrf_token", token.as_str()));

        self.post_form(action, &with_token).await
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, cookie_header.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            let pair = set_cookie.split(';').next().unwrap_or_default();
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let removed = value.is_empty() || set_cookie.contains("Max-Age=0");

            if removed {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Extracts the hidden `csrf_token` value from a rendered form
pub fn scrape_csrf_token(html: &str) -> Option<String> {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(input: &str) -> String {
    let mut out = String::new();
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

pub async fn register(
    client: &mut TestClient,
    email: &str,
    username: &str,
    password: &str,
) -> TestResponse {
    client
        .submit(
            "/register",
            "/register",
            &[
                ("email", email),
                ("username", username),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
}

pub async fn login(client: &mut TestClient, email: &str, password: &str) -> TestResponse {
    client
        .submit(
            "/login",
            "/login",
            &[("email", email), ("password", password)],
        )
        .await
}

pub async fn add_task(
    client: &mut TestClient,
    title: &str,
    due_date: &str,
    body: &str,
    priority: bool,
) -> TestResponse {
    let mut fields = vec![("title", title), ("due_date", due_date), ("body", body)];
    if priority {
        fields.push(("priority", "on"));
    }

    client.submit("/add_todo", "/add_todo", &fields).await
}
