//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart,
//! pricing, validation and access rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/storefront                              │   │
//! │  │    AppContext ──► CartStore ──► Navigator ──► commands          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │ pricing │ │  cart   │ │validation│ │ access │  │   │
//! │  │   │ Product │ │effective│ │  Cart   │ │  forms   │ │ Route  │  │   │
//! │  │   │ Promo   │ │  price  │ │ Totals  │ │FieldErrs │ │ guard  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, PromoCode, UserProfile, ChatMessage)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Effective unit price and promo code pricing
//! - [`cart`] - Cart lines and aggregate totals
//! - [`validation`] - Admin form validation with per-field errors
//! - [`access`] - Route requirements and access decisions
//! - [`loading`] - Explicit loading/error/success states for fetched data
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Money, Product};
//!
//! let mut shoes = Product::new("Trail shoes", Money::from_cents(10_000));
//! shoes.promo_active = true;
//! shoes.has_public_discount = true;
//! shoes.discount_percentage = Some(20);
//!
//! let mut cart = Cart::new();
//! cart.add(&shoes);
//! cart.add(&shoes);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().cents(), 16_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod error;
pub mod loading;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{authorize, AccessDecision, Principal, Requirement, Route};
pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use loading::LoadState;
pub use money::Money;
pub use pricing::{effective_price, promo_price};
pub use types::*;
pub use validation::{CategoryForm, ProductForm, PromoCodeForm, UserForm};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage slot key the cart is persisted under when no override is configured.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Upper bound of a discount percentage.
pub const MAX_DISCOUNT_PERCENTAGE: u8 = 100;

/// Maximum length of a chat message body.
pub const MAX_MESSAGE_LENGTH: usize = 2000;
