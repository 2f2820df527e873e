/// Middleware modules for the web server
///
/// This module contains custom middleware for:
/// - Session resolution and the login guard
/// - Security headers

pub mod security;
pub mod session;
