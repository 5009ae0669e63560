//! # Data Loading Boundary
//!
//! Catalog fetches go through [`load`], which turns the outcome into a
//! [`LoadState`] and logs failures. There is no retry: a failed fetch shows
//! the empty state until the shopper navigates again.

use std::fmt::Display;
use std::future::Future;

use storefront_core::LoadState;
use tracing::{debug, error};

/// Awaits `fetch` and records how it went.
///
/// ## Usage
/// ```rust,ignore
/// let products = load("products", ctx.db.products().list_all()).await;
/// render(products.items_or_empty());
/// ```
pub async fn load<T, E, F>(what: &str, fetch: F) -> LoadState<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match fetch.await {
        Ok(value) => {
            debug!(what = %what, "Loaded");
            LoadState::Loaded(value)
        }
        Err(e) => {
            error!(what = %what, error = %e, "Load failed");
            LoadState::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_db::DbError;

    #[tokio::test]
    async fn test_success_is_loaded() {
        let state = load("numbers", async { Ok::<_, DbError>(vec![1, 2, 3]) }).await;
        assert_eq!(state.items_or_empty(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_is_failed_with_empty_items() {
        let state: LoadState<Vec<u8>> =
            load("numbers", async { Err(DbError::ConnectionFailed("offline".into())) }).await;

        assert!(state.is_failed());
        assert_eq!(state.error(), Some("Connection failed: offline"));
        assert!(state.items_or_empty().is_empty());
    }
}
