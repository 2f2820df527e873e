//! # TaskDesk Shared Library
//!
//! This crate contains the data records, stores and authentication
//! primitives used by the TaskDesk web server.
//!
//! ## Module Organization
//!
//! - `models`: Plain data records (users, tasks) and task drafts
//! - `store`: Credential, task and session stores (PostgreSQL and in-memory)
//! - `auth`: Password hashing, session tokens and the ownership guard
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
