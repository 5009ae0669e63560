//! # Seed Data Generator
//!
//! Populates the database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! ```
//!
//! ## Generated Data
//! - Categories: accounts, game keys, subscriptions, software
//! - Products in every category, with a mix of:
//!   - no discount
//!   - a public discount (shown and applied without a code)
//!   - a code-only discount (needs a promo code at checkout)
//! - Promo codes: one cart-wide, one product-specific, one expired
//! - Users: an admin, an escrow agent, and two shoppers
//! - A short chat thread between the shoppers and the escrow agent

use chrono::{Duration, Utc};
use std::env;
use storefront_core::{
    new_id, Category, ChatMessage, Money, Product, PromoCode, UserProfile,
};
use storefront_db::{Database, DbConfig};

/// Demo catalog: category name → (product name, price in cents, discount).
///
/// Discount is `(percentage, public)`; `None` means no discount.
const CATALOG: &[(&str, &[(&str, i64, Option<(u8, bool)>)])] = &[
    (
        "Accounts",
        &[
            ("Steam Account Lvl 40", 4_500, Some((20, true))),
            ("Epic Games Account", 3_000, None),
            ("Riot Account Diamond", 12_000, Some((10, false))),
            ("Battle.net Account", 2_500, None),
        ],
    ),
    (
        "Game Keys",
        &[
            ("Elden Ring Key", 3_999, Some((25, true))),
            ("Cyberpunk 2077 Key", 2_999, None),
            ("Hades II Key", 2_499, Some((15, false))),
            ("Stardew Valley Key", 1_499, None),
        ],
    ),
    (
        "Subscriptions",
        &[
            ("Netflix Premium 1 Month", 1_999, None),
            ("Spotify Family 3 Months", 4_499, Some((30, true))),
            ("Xbox Game Pass Ultimate", 1_699, None),
        ],
    ),
    (
        "Software",
        &[
            ("Office 365 Personal", 6_999, Some((5, false))),
            ("Windows 11 Pro License", 19_900, None),
            ("Photo Editor Lifetime", 8_900, Some((50, true))),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./storefront_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./storefront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Storefront Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------
    println!();
    println!("Generating catalog...");

    let mut generated = 0;
    let mut code_only = Vec::new();

    for (category_idx, (category_name, products)) in CATALOG.iter().enumerate() {
        let category = db.categories().insert(&Category::new(*category_name)).await?;

        for (product_idx, (name, price_cents, discount)) in products.iter().enumerate() {
            let product = generate_product(
                name,
                *price_cents,
                *discount,
                &category.id,
                category_idx * 10 + product_idx,
            );

            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.name, e);
                continue;
            }
            if product.promo_active && !product.has_public_discount {
                code_only.push(product.id.clone());
            }
            generated += 1;
        }
        println!("  {} ✓", category_name);
    }
    println!("✓ Generated {} products", generated);

    // -------------------------------------------------------------------------
    // Promo codes
    // -------------------------------------------------------------------------
    let now = Utc::now();
    let mut codes = vec![
        promo("WELCOME10", 10, None, Some(now + Duration::days(90))),
        promo("EXPIRED50", 50, None, Some(now - Duration::days(1))),
    ];
    if let Some(product_id) = code_only.first() {
        codes.push(promo("VIP20", 20, Some(product_id.clone()), None));
    }
    for code in &codes {
        db.promo_codes().insert(code).await?;
    }
    println!("✓ Created {} promo codes", codes.len());

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------
    let mut admin = UserProfile::new("admin@storefront.dev", "Store Admin");
    admin.is_admin = true;
    let mut agent = UserProfile::new("escrow@storefront.dev", "Escrow Agent");
    agent.is_escrow_agent = true;
    let buyer = UserProfile::new("buyer@storefront.dev", "Demo Buyer");
    let seller = UserProfile::new("seller@storefront.dev", "Demo Seller");

    for user in [&admin, &agent, &buyer, &seller] {
        db.users().insert(user).await?;
    }
    println!("✓ Created 4 users");
    println!("  admin:  {}", admin.id);
    println!("  escrow: {}", agent.id);
    println!("  buyer:  {}", buyer.id);

    // -------------------------------------------------------------------------
    // Chat
    // -------------------------------------------------------------------------
    let thread = [
        (&buyer, &seller, "Hi, is the Riot account still available?"),
        (&seller, &buyer, "Yes! I can hand it over through escrow."),
        (&buyer, &agent, "Could you hold the payment for this trade?"),
        (&agent, &buyer, "Sure, send me the order details."),
    ];
    for (from, to, body) in thread {
        db.messages().append(&ChatMessage::new(&from.id, &to.id, body)?).await?;
    }
    println!("✓ Seeded {} chat messages", thread.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog product. `seed` staggers `created_at` so the
/// newest-first listing is stable.
fn generate_product(
    name: &str,
    price_cents: i64,
    discount: Option<(u8, bool)>,
    category_id: &str,
    seed: usize,
) -> Product {
    let mut product = Product::new(name, Money::from_cents(price_cents));
    product.created_at = Utc::now() - Duration::minutes(seed as i64);
    product.updated_at = product.created_at;
    product.description = format!("{name}. Delivered digitally after payment clears.");
    product.images = vec![format!("products/{}/cover.png", product.id)];
    product.category_id = Some(category_id.to_string());

    if let Some((percentage, public)) = discount {
        product.promo_active = true;
        product.discount_percentage = Some(percentage);
        product.has_public_discount = public;
    }

    product
}

fn promo(
    code: &str,
    discount_percentage: u8,
    product_id: Option<String>,
    expires_at: Option<chrono::DateTime<Utc>>,
) -> PromoCode {
    let now = Utc::now();
    PromoCode {
        id: new_id(),
        code: code.to_string(),
        discount_percentage,
        product_id,
        is_active: true,
        expires_at,
        created_at: now,
        updated_at: now,
    }
}
