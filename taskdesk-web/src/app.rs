/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdesk_web::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskdesk_web::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use sqlx::PgPool;
use taskdesk_shared::store::{
    memory::MemoryStore,
    session::{PgSessionStore, SessionStore},
    task::{PgTaskStore, TaskStore},
    user::{CredentialStore, PgCredentialStore},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{
    config::Config,
    cookies::CookieSettings,
    middleware::{
        security::{security_headers, SecurityHeaders},
        session::{load_session, require_auth},
    },
    routes,
};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Stores sit behind trait objects, so the same router runs against
/// PostgreSQL in production and [`MemoryStore`] in tests.
#[derive(Clone)]
pub struct AppState {
    /// User accounts
    pub users: Arc<dyn CredentialStore>,

    /// To-do items
    pub tasks: Arc<dyn TaskStore>,

    /// Login sessions
    pub sessions: Arc<dyn SessionStore>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Signing key and attributes for issued cookies
    pub cookies: CookieSettings,
}

impl AppState {
    /// Creates application state backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        Self::with_stores(
            Arc::new(PgCredentialStore::new(db.clone())),
            Arc::new(PgTaskStore::new(db.clone())),
            Arc::new(PgSessionStore::new(db)),
            config,
        )
    }

    /// Creates application state backed by a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        let store = MemoryStore::new();

        Self::with_stores(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            config,
        )
    }

    pub fn with_stores(
        users: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        let cookies = CookieSettings::from_config(&config);

        Self {
            users,
            tasks,
            sessions,
            config: Arc::new(config),
            cookies,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET      /                   # Home (public)
/// ├── GET/POST /register           # Registration (public)
/// ├── GET/POST /login              # Login (public)
/// ├── GET      /logout             # Logout (public)
/// ├── GET      /health             # Health check (public)
/// ├── GET      /todo               # Task list (login required)
/// ├── GET      /todo/:id           # Task detail (login required, owner only)
/// ├── GET      /about              # About page (login required)
/// ├── GET/POST /add_todo           # Add task (login required)
/// ├── GET/POST /edit_todo/:id      # Edit task (login required, owner only)
/// └── GET      /delete_todo/:id    # Delete task (login required, owner only)
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. Logging (tower-http TraceLayer)
/// 3. Session resolution (every route)
/// 4. Login guard (protected routes only)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::pages::home))
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route(
            "/login",
            get(routes::auth::login_form).post(routes::auth::login),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/health", get(routes::health::health_check));

    let protected_routes = Router::new()
        .route("/todo", get(routes::tasks::list_tasks))
        .route("/todo/:id", get(routes::tasks::show_task))
        .route("/about", get(routes::pages::about))
        .route(
            "/add_todo",
            get(routes::tasks::new_task_form).post(routes::tasks::create_task),
        )
        .route(
            "/edit_todo/:id",
            get(routes::tasks::edit_task_form).post(routes::tasks::update_task),
        )
        .route("/delete_todo/:id", get(routes::tasks::delete_task))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(routes::pages::not_found)
        .layer(from_fn_with_state(state.clone(), load_session))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(from_fn_with_state(
            SecurityHeaders::new(state.config.server.production),
            security_headers,
        ))
        .with_state(state)
}
