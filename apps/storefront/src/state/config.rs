//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`, `--data-dir`)
//! 2. Environment variables (`STOREFRONT_*`)
//! 3. Defaults (this file, platform data directory)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use storefront_core::{Money, DEFAULT_CART_KEY};

use crate::error::{ApiError, ApiResult};

/// Which of the two storefronts this build is serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreVariant {
    /// General product shop
    #[default]
    Shop,

    /// Accounts marketplace, with chat-mediated escrow trades
    Accounts,
}

impl StoreVariant {
    /// Parses `shop` / `accounts`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shop" => Some(StoreVariant::Shop),
            "accounts" => Some(StoreVariant::Accounts),
            _ => None,
        }
    }

    /// The escrow desk only exists in the accounts marketplace.
    pub fn has_escrow(&self) -> bool {
        matches!(self, StoreVariant::Accounts)
    }

    fn default_store_name(&self) -> &'static str {
        match self {
            StoreVariant::Shop => "Storefront",
            StoreVariant::Accounts => "Accounts Marketplace",
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    pub variant: StoreVariant,

    /// Store name (shown in headers)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Storage key the cart is persisted under
    pub cart_key: String,

    /// Explicit database file; defaults to `<data_dir>/storefront.db`
    pub db_path: Option<PathBuf>,

    /// Explicit data directory; defaults to the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for ConfigState {
    fn default() -> Self {
        let variant = StoreVariant::default();
        ConfigState {
            variant,
            store_name: variant.default_store_name().to_string(),
            currency_symbol: "$".to_string(),
            cart_key: DEFAULT_CART_KEY.to_string(),
            db_path: None,
            data_dir: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_VARIANT`: `shop` or `accounts`
    /// - `STOREFRONT_STORE_NAME`: Override store name
    /// - `STOREFRONT_CURRENCY_SYMBOL`: Override currency symbol
    /// - `STOREFRONT_CART_KEY`: Override the cart storage key
    /// - `STOREFRONT_DB_PATH`: Database file
    /// - `STOREFRONT_DATA_DIR`: Directory for the database and cart slot
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigState::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(variant) = var("STOREFRONT_VARIANT") {
            match StoreVariant::parse(&variant) {
                Some(variant) => {
                    config.variant = variant;
                    config.store_name = variant.default_store_name().to_string();
                }
                None => tracing::warn!(value = %variant, "Unknown STOREFRONT_VARIANT, using shop"),
            }
        }

        if let Some(store_name) = var("STOREFRONT_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = var("STOREFRONT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(key) = var("STOREFRONT_CART_KEY") {
            config.cart_key = key;
        }

        if let Some(path) = var("STOREFRONT_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = var("STOREFRONT_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Directory holding the database and the cart slot.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/dev.storefront.storefront`
    /// - **Windows**: `%APPDATA%\storefront\storefront\data`
    /// - **Linux**: `~/.local/share/storefront`
    pub fn resolved_data_dir(&self) -> ApiResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let dirs = ProjectDirs::from("dev", "storefront", "storefront")
            .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn resolved_db_path(&self) -> ApiResult<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.resolved_data_dir()?.join("storefront.db")),
        }
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}
