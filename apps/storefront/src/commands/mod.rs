//! # Commands Module
//!
//! Every operation the storefront exposes. The CLI in `lib.rs` is one
//! caller; each command takes the [`AppContext`](crate::state::AppContext)
//! explicitly and returns a serializable response or an
//! [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── product.rs     ◄─── Catalog reads, admin product CRUD
//! ├── category.rs    ◄─── Category list, admin CRUD
//! ├── cart.rs        ◄─── Cart manipulation, promo preview
//! ├── promo.rs       ◄─── Admin promo code CRUD
//! ├── user.rs        ◄─── Profiles and role flags
//! ├── chat.rs        ◄─── Messaging between users
//! ├── navigation.rs  ◄─── Route guard entry point
//! └── config.rs      ◄─── Configuration retrieval
//! ```
//!
//! ## Guarding
//! Commands behind a gated route call `ctx.navigator.require(route, user)`
//! first, which is the single role lookup for that command.

pub mod cart;
pub mod category;
pub mod chat;
pub mod config;
pub mod navigation;
pub mod product;
pub mod promo;
pub mod user;
