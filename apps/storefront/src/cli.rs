//! # Command Line
//!
//! Maps `storefront <group> <action>` onto the commands layer. Every
//! subcommand prints one JSON document on stdout.
//!
//! ```text
//!   storefront --user <id> cart promo SAVE10
//!        │
//!        ▼
//!   Cli::parse ──► ConfigState::from_env + flag overrides
//!        │
//!        ▼
//!   AppContext::open ──► dispatch ──► commands::cart::cart_with_promo
//!                                          │
//!                                          ▼
//!                                 serde_json::Value (stdout)
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::commands;
use crate::error::{ApiError, ApiResult};
use crate::state::{AppContext, ConfigState, StoreVariant};
use storefront_core::{CategoryForm, ProductForm, PromoCodeForm, UserForm};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront catalog, cart and admin tools", long_about = None)]
pub struct Cli {
    /// Acting user id (omit to act signed out)
    #[arg(long, short, global = true, env = "STOREFRONT_USER")]
    pub user: Option<String>,

    /// Database file (overrides STOREFRONT_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for the database and the cart slot (overrides STOREFRONT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// `shop` or `accounts` (overrides STOREFRONT_VARIANT)
    #[arg(long, global = true, value_parser = parse_variant)]
    pub variant: Option<StoreVariant>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and manage the catalog
    #[command(subcommand)]
    Products(ProductsCommand),

    /// Browse and manage categories
    #[command(subcommand)]
    Categories(CategoriesCommand),

    /// The persisted shopping cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Admin promo code management
    #[command(subcommand)]
    Promo(PromoCommand),

    /// Profiles and role flags
    #[command(subcommand)]
    Users(UsersCommand),

    /// Messages between users
    #[command(subcommand)]
    Chat(ChatCommand),

    /// Check whether the acting user may open a view
    Open {
        /// home, catalog, product, cart, chat, escrow, admin-products,
        /// admin-categories, admin-promo-codes, admin-users
        route: String,
        /// Product id for the `product` route
        id: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Search {
        term: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Show {
        id: String,
    },
    Add(ProductArgs),
    Edit {
        id: String,
        #[command(flatten)]
        changes: ProductEditArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price_cents: i64,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub category: Option<String>,
    /// Image URL; repeat for more. The first is the thumbnail.
    #[arg(long = "image")]
    pub images: Vec<String>,
    /// Discount percentage applied to this product
    #[arg(long)]
    pub discount: Option<i64>,
    /// Show the discount to everyone instead of only via promo codes
    #[arg(long)]
    pub public: bool,
}

impl From<ProductArgs> for ProductForm {
    fn from(args: ProductArgs) -> Self {
        ProductForm {
            name: args.name,
            description: args.description,
            price_cents: args.price_cents,
            images: args.images,
            category_id: args.category,
            promo_active: args.discount.is_some(),
            discount_percentage: args.discount,
            has_public_discount: args.public,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProductEditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price_cents: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
    /// Empty string files the product as uncategorized
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub discount: Option<i64>,
    /// Drop any discount
    #[arg(long, conflicts_with = "discount")]
    pub no_discount: bool,
    #[arg(long)]
    pub public: Option<bool>,
}

impl ProductEditArgs {
    fn apply(self, form: &mut ProductForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(cents) = self.price_cents {
            form.price_cents = cents;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category_id = Some(category).filter(|c| !c.trim().is_empty());
        }
        if let Some(pct) = self.discount {
            form.promo_active = true;
            form.discount_percentage = Some(pct);
        }
        if self.no_discount {
            form.promo_active = false;
            form.discount_percentage = None;
            form.has_public_discount = false;
        }
        if let Some(public) = self.public {
            form.has_public_discount = public;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    List,
    Show { id: String },
    Add { name: String },
    Rename { id: String, name: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    Remove { product_id: String },
    /// Set a line's quantity; zero or less removes it
    Set {
        product_id: String,
        #[arg(
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(..=u32::MAX as i64)
        )]
        quantity: i64,
    },
    Clear,
    /// Preview totals with a promo code (the cart is not changed)
    Promo { code: String },
}

#[derive(Debug, Subcommand)]
pub enum PromoCommand {
    List,
    Add {
        code: String,
        #[arg(long)]
        percent: i64,
        /// Limit the code to one product
        #[arg(long)]
        product: Option<String>,
        /// RFC 3339 timestamp, e.g. 2026-12-31T23:59:59Z
        #[arg(long, value_parser = parse_timestamp)]
        expires: Option<DateTime<Utc>>,
        /// Create the code switched off
        #[arg(long)]
        inactive: bool,
    },
    Enable { id: String },
    Disable { id: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// The acting user's profile
    Me,
    /// Change the acting user's own profile
    Edit {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
    },
    List,
    Add {
        email: String,
        display_name: String,
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        escrow_agent: bool,
    },
    Roles {
        id: String,
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        escrow_agent: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    Send { to: String, body: String },
    History {
        with: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Inbox,
}

fn parse_variant(value: &str) -> Result<StoreVariant, String> {
    StoreVariant::parse(value).ok_or_else(|| format!("unknown variant '{}' (shop or accounts)", value))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}

fn json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Could not encode output: {}", e)))
}

impl Cli {
    /// Environment config with this invocation's flags layered on top.
    pub fn config(&self) -> ConfigState {
        let mut config = ConfigState::from_env();
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(db) = &self.db {
            config.db_path = Some(db.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        config
    }
}

/// Runs one parsed command against `ctx`.
pub async fn dispatch(ctx: &AppContext, user: Option<&str>, command: Command) -> ApiResult<Value> {
    match command {
        Command::Products(cmd) => products(ctx, user, cmd).await,
        Command::Categories(cmd) => categories(ctx, user, cmd).await,
        Command::Cart(cmd) => cart(ctx, cmd).await,
        Command::Promo(cmd) => promo(ctx, user, cmd).await,
        Command::Users(cmd) => users(ctx, user, cmd).await,
        Command::Chat(cmd) => chat(ctx, user, cmd).await,
        Command::Open { route, id } => {
            let route = commands::navigation::parse_route(&route, id.as_deref())?;
            json(commands::navigation::open_route(ctx, user, route).await?)
        }
        Command::Config => json(commands::config::get_config(ctx)),
    }
}

async fn products(ctx: &AppContext, user: Option<&str>, cmd: ProductsCommand) -> ApiResult<Value> {
    use commands::product::*;

    match cmd {
        ProductsCommand::List { category } => json(list_products(ctx, category.as_deref()).await),
        ProductsCommand::Search { term, limit } => json(search_products(ctx, &term, limit).await),
        ProductsCommand::Show { id } => json(get_product(ctx, &id).await?),
        ProductsCommand::Add(args) => json(create_product(ctx, user, args.into()).await?),
        ProductsCommand::Edit { id, changes } => {
            let current = get_product(ctx, &id).await?;
            let mut form = ProductForm::from_product(&current.product);
            changes.apply(&mut form);
            json(update_product(ctx, user, &id, form).await?)
        }
        ProductsCommand::Delete { id } => json(delete_product(ctx, user, &id).await?),
    }
}

async fn categories(ctx: &AppContext, user: Option<&str>, cmd: CategoriesCommand) -> ApiResult<Value> {
    use commands::category::*;

    match cmd {
        CategoriesCommand::List => json(list_categories(ctx).await),
        CategoriesCommand::Show { id } => json(get_category(ctx, &id).await?),
        CategoriesCommand::Add { name } => json(create_category(ctx, user, CategoryForm { name }).await?),
        CategoriesCommand::Rename { id, name } => {
            json(rename_category(ctx, user, &id, CategoryForm { name }).await?)
        }
        CategoriesCommand::Delete { id } => json(delete_category(ctx, user, &id).await?),
    }
}

async fn cart(ctx: &AppContext, cmd: CartCommand) -> ApiResult<Value> {
    use commands::cart::*;

    match cmd {
        CartCommand::Show => json(get_cart(ctx)),
        CartCommand::Add { product_id } => json(add_to_cart(ctx, &product_id).await?),
        CartCommand::Remove { product_id } => json(remove_from_cart(ctx, &product_id)),
        CartCommand::Set { product_id, quantity } => json(update_cart_item(ctx, &product_id, quantity)),
        CartCommand::Clear => json(clear_cart(ctx)),
        CartCommand::Promo { code } => json(cart_with_promo(ctx, &code).await?),
    }
}

async fn promo(ctx: &AppContext, user: Option<&str>, cmd: PromoCommand) -> ApiResult<Value> {
    use commands::promo::*;

    match cmd {
        PromoCommand::List => json(list_promo_codes(ctx, user).await?),
        PromoCommand::Add {
            code,
            percent,
            product,
            expires,
            inactive,
        } => {
            let form = PromoCodeForm {
                code,
                discount_percentage: percent,
                product_id: product,
                is_active: !inactive,
                expires_at: expires,
            };
            json(create_promo_code(ctx, user, form).await?)
        }
        PromoCommand::Enable { id } => json(set_promo_active(ctx, user, &id, true).await?),
        PromoCommand::Disable { id } => json(set_promo_active(ctx, user, &id, false).await?),
        PromoCommand::Delete { id } => json(delete_promo_code(ctx, user, &id).await?),
    }
}

async fn users(ctx: &AppContext, user: Option<&str>, cmd: UsersCommand) -> ApiResult<Value> {
    use commands::user::*;

    match cmd {
        UsersCommand::Me => json(current_user(ctx, user).await?),
        UsersCommand::Edit { email, display_name } => {
            json(update_profile(ctx, user, email, display_name).await?)
        }
        UsersCommand::List => json(list_users(ctx, user).await?),
        UsersCommand::Add {
            email,
            display_name,
            admin,
            escrow_agent,
        } => {
            let form = UserForm {
                email,
                display_name,
                is_admin: admin,
                is_escrow_agent: escrow_agent,
            };
            json(create_user(ctx, user, form).await?)
        }
        UsersCommand::Roles {
            id,
            admin,
            escrow_agent,
        } => json(set_user_roles(ctx, user, &id, admin, escrow_agent).await?),
    }
}

async fn chat(ctx: &AppContext, user: Option<&str>, cmd: ChatCommand) -> ApiResult<Value> {
    use commands::chat::*;

    match cmd {
        ChatCommand::Send { to, body } => json(send_message(ctx, user, &to, &body).await?),
        ChatCommand::History { with, limit } => json(conversation(ctx, user, &with, limit).await?),
        ChatCommand::Inbox => json(inbox(ctx, user).await?),
    }
}
