//! # State Module
//!
//! Application state, owned by one explicit [`AppContext`] that `run()`
//! builds and hands to every command. There is no global cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  run()                                                                  │
//! │    │  AppContext::open(config)                                          │
//! │    ▼                                                                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppContext                              │   │
//! │  │  ┌──────────────┐ ┌──────────────┐ ┌────────────┐ ┌──────────┐  │   │
//! │  │  │  Database    │ │  CartStore   │ │ Navigator  │ │ Config   │  │   │
//! │  │  │  (SQLite     │ │  Mutex<Cart> │ │ RoleLookup │ │ State    │  │   │
//! │  │  │   pool)      │ │  + slot      │ │ = users    │ │          │  │   │
//! │  │  └──────────────┘ └──────────────┘ └────────────┘ └──────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool (thread-safe)                    │
//! │  • CartStore: Mutex around the cart, watch channel for subscribers     │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;
mod storage;

pub use cart::CartStore;
pub use config::{ConfigState, StoreVariant};
pub use db::{connect, connect_in_memory};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

use std::sync::Arc;

use storefront_db::{Database, UserRepository};
use tracing::info;

use crate::error::ApiResult;
use crate::navigation::Navigator;

/// Everything a command may touch.
#[derive(Debug)]
pub struct AppContext {
    pub config: ConfigState,
    pub db: Database,
    pub cart: CartStore,
    pub navigator: Navigator<UserRepository>,
}

impl AppContext {
    /// Wires the context from its parts.
    pub fn new(config: ConfigState, db: Database, storage: Arc<dyn CartStorage>) -> Self {
        let cart = CartStore::open(storage, config.cart_key.clone());
        let navigator = Navigator::new(db.users());
        AppContext {
            config,
            db,
            cart,
            navigator,
        }
    }

    /// Opens the on-disk database and cart slot the config points at.
    pub async fn open(config: ConfigState) -> ApiResult<Self> {
        let data_dir = config.resolved_data_dir()?;
        let db_path = config.resolved_db_path()?;
        info!(
            data_dir = %data_dir.display(),
            db_path = %db_path.display(),
            variant = ?config.variant,
            "Opening storefront"
        );

        let db = connect(&db_path).await?;
        Ok(Self::new(config, db, Arc::new(FileStorage::new(data_dir))))
    }

    /// In-memory database and cart slot.
    pub async fn in_memory(config: ConfigState) -> ApiResult<Self> {
        let db = connect_in_memory().await?;
        Ok(Self::new(config, db, Arc::new(MemoryStorage::new())))
    }
}
