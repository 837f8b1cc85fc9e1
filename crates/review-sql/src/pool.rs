use std::str::FromStr;

/// Timeout for checking a connection out of the pool. Queries which cannot
/// acquire a connection within this bound fail rather than blocking
/// indefinitely.
const ACQUIRE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Builds a bounded connection pool for the moderation store.
///
/// Every logical query checks a connection out of this pool, uses it, and
/// returns it. The pool is cheaply cloneable and safe for concurrent use by
/// request handlers and the alert scheduler alike.
pub async fn connect(database_url: &str, max_connections: u32) -> sqlx::Result<sqlx::PgPool> {
    let options = sqlx::postgres::PgConnectOptions::from_str(database_url)?
        // Prefer TLS but don't require it.
        .ssl_mode(sqlx::postgres::PgSslMode::Prefer);

    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
}
