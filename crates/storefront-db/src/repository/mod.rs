//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  App command                                                           │
//! │       │                                                                 │
//! │       │  db.products().list_by_category(&id)                           │
//! │       ▼                                                                 │
//! │  ProductRepository / CategoryRepository / PromoCodeRepository /        │
//! │  UserRepository / MessageRepository                                    │
//! │       │                                                                 │
//! │       │  Row struct (FromRow) ──► TryFrom ──► domain type               │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository decodes into a private row struct first so a malformed
//! column surfaces as [`DbError::CorruptRow`](crate::DbError::CorruptRow)
//! naming the offending row.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads and product CRUD
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`PromoCodeRepository`](promo::PromoCodeRepository) - Code lookup and CRUD
//! - [`UserRepository`](user::UserRepository) - Profiles and role flags
//! - [`MessageRepository`](message::MessageRepository) - Append-only chat log

pub mod category;
pub mod message;
pub mod product;
pub mod promo;
pub mod user;
