//! # storefront-db: Database Layer for the Storefront
//!
//! This crate provides database access for the storefront: the catalog the
//! shop reads from, the admin data behind the CRUD screens, and the chat log.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  App command (list_products)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │◄───│ ProductRepo    │   │  (embedded)  │   │   │
//! │  │   │ SqlitePool    │    │ CategoryRepo   │   │ 001_init.sql │   │   │
//! │  │   │               │    │ PromoCodeRepo  │   │              │   │   │
//! │  │   │               │    │ UserRepo       │   │              │   │   │
//! │  │   │               │    │ MessageRepo    │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data directory                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/storefront.db")).await?;
//! let products = db.products().list_by_category(&category_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::message::MessageRepository;
pub use repository::product::ProductRepository;
pub use repository::promo::PromoCodeRepository;
pub use repository::user::UserRepository;
