//! # Database Connection
//!
//! Opens the catalog database the commands read from.
//!
//! ## Thread Safety
//! The `Database` struct from `storefront-db` contains a `SqlitePool` which
//! is inherently thread-safe. Commands run queries concurrently without
//! explicit locking.

use std::path::Path;

use storefront_db::{Database, DbConfig};
use tracing::info;

use crate::error::{ApiError, ApiResult};

/// Connects to the SQLite file at `path`, creating its directory and running
/// pending migrations.
pub async fn connect(path: &Path) -> ApiResult<Database> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::internal(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }

    let db = Database::new(DbConfig::new(path)).await?;
    info!(path = %path.display(), "Database connected and migrations applied");
    Ok(db)
}

/// Private in-memory catalog (tests and throwaway sessions).
pub async fn connect_in_memory() -> ApiResult<Database> {
    Ok(Database::new(DbConfig::in_memory()).await?)
}
