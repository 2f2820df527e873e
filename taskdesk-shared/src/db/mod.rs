/// Database layer for TaskDesk
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Migration runner for the SQL files in `migrations/`
///
/// The stores in [`crate::store`] take a cloned pool; nothing else in the
/// workspace issues queries.

pub mod migrations;
pub mod pool;
