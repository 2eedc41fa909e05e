/// Database utilities
///
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: embedded sqlx migration runner

pub mod migrations;
pub mod pool;
