use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

use super::config::DatabaseConfig;
use crate::error::{Result, TripcastError};

/// Open a SeaORM connection pool from configuration.
///
/// # Errors
///
/// Fails with a configuration error when no URL is set, and with a
/// service-unavailable error when the database cannot be reached.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| TripcastError::configuration("DATABASE_URL is not set"))?;

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);

    let conn = Database::connect(opt).await.map_err(|e| {
        TripcastError::service_unavailable(format!(
            "Failed to connect to database {}: {}",
            config.redacted_url().unwrap_or_default(),
            e
        ))
    })?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connected"
    );

    Ok(conn)
}
