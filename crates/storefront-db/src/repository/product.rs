//! # Product Repository
//!
//! Catalog reads for the shop and product CRUD for the admin screens.
//!
//! ## Catalog Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shop view              Query                    Order                  │
//! │  ─────────              ─────                    ─────                  │
//! │  Home / catalog  ─────► list_all()               newest first           │
//! │  Category page   ─────► list_by_category(id)     newest first           │
//! │  Product page    ─────► get_by_id(id)            -                      │
//! │  Search box      ─────► search(term, limit)      name                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Images are stored as a JSON array column; their order is the display order.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{Money, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, images, category_id, \
     promo_active, discount_percentage, has_public_discount, created_at, updated_at";

/// Raw `products` row.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    price_cents: i64,
    images: String,
    category_id: Option<String>,
    promo_active: bool,
    discount_percentage: Option<i64>,
    has_public_discount: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let images: Vec<String> = serde_json::from_str(&row.images)
            .map_err(|e| DbError::corrupt("Product", &row.id, e))?;

        let discount_percentage = row
            .discount_percentage
            .map(u8::try_from)
            .transpose()
            .map_err(|e| DbError::corrupt("Product", &row.id, e))?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            images,
            category_id: row.category_id,
            promo_active: row.promo_active,
            discount_percentage,
            has_public_discount: row.has_public_discount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed products");
        into_products(rows)
    }

    /// Lists the products of one category, newest first.
    ///
    /// An unknown category id simply yields an empty list.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ?1 ORDER BY created_at DESC"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(category_id = %category_id, count = rows.len(), "Listed products by category");
        into_products(rows)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Case-insensitive substring search on product names.
    ///
    /// An empty term returns the newest products.
    pub async fn search(&self, term: &str, limit: u32) -> DbResult<Vec<Product>> {
        let term = term.trim();
        debug!(term = %term, limit = %limit, "Searching products");

        let rows: Vec<ProductRow> = if term.is_empty() {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT ?1");
            sqlx::query_as(&sql).bind(limit).fetch_all(&self.pool).await?
        } else {
            let sql = format!(
                "SELECT {PRODUCT_COLUMNS} FROM products \
                 WHERE name LIKE ?1 ESCAPE '\\' COLLATE NOCASE ORDER BY name LIMIT ?2"
            );
            sqlx::query_as(&sql)
                .bind(like_pattern(term))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
        };

        into_products(rows)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let images = serde_json::to_string(&product.images)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, images, category_id,
                promo_active, discount_percentage, has_public_discount,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(images)
        .bind(&product.category_id)
        .bind(product.promo_active)
        .bind(product.discount_percentage.map(i64::from))
        .bind(product.has_public_discount)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let images = serde_json::to_string(&product.images)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                images = ?5,
                category_id = ?6,
                promo_active = ?7,
                discount_percentage = ?8,
                has_public_discount = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(images)
        .bind(&product.category_id)
        .bind(product.promo_active)
        .bind(product.discount_percentage.map(i64::from))
        .bind(product.has_public_discount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product. Carts holding a snapshot of it are unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Builds a `LIKE` pattern matching `term` anywhere, with wildcards escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;
    use storefront_core::Category;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, price_cents: i64, age_minutes: i64) -> Product {
        let mut p = Product::new(name, Money::from_cents(price_cents));
        p.created_at = Utc::now() - Duration::minutes(age_minutes);
        p.updated_at = p.created_at;
        p
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = test_db().await;
        let repo = db.products();

        let mut p = product("Steam account", 2_500, 0);
        p.description = "Level 40, 120 games".to_string();
        p.images = vec!["a.png".to_string(), "b.png".to_string()];
        p.promo_active = true;
        p.discount_percentage = Some(15);
        p.has_public_discount = true;
        repo.insert(&p).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, p.name);
        assert_eq!(loaded.images, p.images);
        assert_eq!(loaded.discount_percentage, Some(15));
        assert!(loaded.has_public_promo());
        assert_eq!(loaded.price, p.price);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&product("Old", 100, 30)).await.unwrap();
        repo.insert(&product("New", 100, 1)).await.unwrap();
        repo.insert(&product("Middle", 100, 10)).await.unwrap();

        let names: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["New", "Middle", "Old"]);
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let db = test_db().await;
        let repo = db.products();
        let games = Category::new("Games");

        let mut in_games = product("In games", 100, 0);
        in_games.category_id = Some(games.id.clone());
        repo.insert(&in_games).await.unwrap();
        repo.insert(&product("Uncategorized", 100, 0)).await.unwrap();

        let listed = repo.list_by_category(&games.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, in_games.id);

        assert!(repo.list_by_category("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_escapes_wildcards() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&product("Netflix Premium", 100, 0)).await.unwrap();
        repo.insert(&product("Spotify Family", 100, 0)).await.unwrap();
        repo.insert(&product("100% Cotton Tee", 100, 0)).await.unwrap();

        let hits = repo.search("premium", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Netflix Premium");

        let hits = repo.search("100%", 10).await.unwrap();
        assert_eq!(hits.len(), 1);

        assert_eq!(repo.search("", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let repo = db.products();
        let mut p = product("Draft", 100, 0);
        repo.insert(&p).await.unwrap();

        p.name = "Final".to_string();
        p.price = Money::from_cents(250);
        repo.update(&p).await.unwrap();
        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Final");
        assert_eq!(loaded.price.cents(), 250);

        repo.delete(&p.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(matches!(repo.delete(&p.id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.update(&p).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_corrupt_images_column_is_reported() {
        let db = test_db().await;
        let p = product("Broken", 100, 0);
        db.products().insert(&p).await.unwrap();

        sqlx::query("UPDATE products SET images = 'not json' WHERE id = ?1")
            .bind(&p.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            db.products().get_by_id(&p.id).await,
            Err(DbError::CorruptRow { .. })
        ));
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
