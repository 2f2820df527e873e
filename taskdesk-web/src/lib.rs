//! # TaskDesk Web Server Library
//!
//! This library provides the server-rendered to-do application: accounts,
//! sessions and per-user task lists.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `cookies`: Signed cookie helpers
//! - `csrf`: Form token issuing and verification
//! - `error`: Error handling and HTML error pages
//! - `flash`: One-shot notices carried across redirects
//! - `forms`: Form payloads and validation
//! - `middleware`: Session resolution, login guard, security headers
//! - `routes`: Route handlers
//! - `views`: HTML rendering

pub mod app;
pub mod config;
pub mod cookies;
pub mod csrf;
pub mod error;
pub mod flash;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod views;
