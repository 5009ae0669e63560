//! # Promo Code Repository
//!
//! Codes are stored normalized (trimmed, upper-case) so a lookup with
//! whatever the shopper typed finds the same row.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::PromoCode;

const PROMO_COLUMNS: &str =
    "id, code, discount_percentage, product_id, is_active, expires_at, created_at, updated_at";

#[derive(Debug, FromRow)]
struct PromoCodeRow {
    id: String,
    code: String,
    discount_percentage: i64,
    product_id: Option<String>,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PromoCodeRow> for PromoCode {
    type Error = DbError;

    fn try_from(row: PromoCodeRow) -> DbResult<Self> {
        let discount_percentage = u8::try_from(row.discount_percentage)
            .map_err(|e| DbError::corrupt("PromoCode", &row.id, e))?;

        Ok(PromoCode {
            id: row.id,
            code: row.code,
            discount_percentage,
            product_id: row.product_id,
            is_active: row.is_active,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for promo code operations.
#[derive(Debug, Clone)]
pub struct PromoCodeRepository {
    pool: SqlitePool,
}

impl PromoCodeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PromoCodeRepository { pool }
    }

    /// Lists every code, newest first.
    pub async fn list(&self) -> DbResult<Vec<PromoCode>> {
        let sql = format!("SELECT {PROMO_COLUMNS} FROM promo_codes ORDER BY created_at DESC");
        let rows: Vec<PromoCodeRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed promo codes");
        rows.into_iter().map(PromoCode::try_from).collect()
    }

    /// Looks a code up as typed by a shopper.
    ///
    /// Inactive and expired codes are still returned; redeemability is
    /// decided by [`PromoCode::check`].
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<PromoCode>> {
        let code = PromoCode::normalize(code);
        let sql = format!("SELECT {PROMO_COLUMNS} FROM promo_codes WHERE code = ?1");
        let row: Option<PromoCodeRow> = sqlx::query_as(&sql)
            .bind(&code)
            .fetch_optional(&self.pool)
            .await?;

        debug!(code = %code, found = row.is_some(), "Promo code lookup");
        row.map(PromoCode::try_from).transpose()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PromoCode>> {
        let sql = format!("SELECT {PROMO_COLUMNS} FROM promo_codes WHERE id = ?1");
        let row: Option<PromoCodeRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PromoCode::try_from).transpose()
    }

    /// Inserts a new code.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The normalized code already exists
    pub async fn insert(&self, promo: &PromoCode) -> DbResult<PromoCode> {
        let mut promo = promo.clone();
        promo.code = PromoCode::normalize(&promo.code);
        debug!(code = %promo.code, "Inserting promo code");

        sqlx::query(
            r#"
            INSERT INTO promo_codes (
                id, code, discount_percentage, product_id, is_active,
                expires_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&promo.id)
        .bind(&promo.code)
        .bind(i64::from(promo.discount_percentage))
        .bind(&promo.product_id)
        .bind(promo.is_active)
        .bind(promo.expires_at)
        .bind(promo.created_at)
        .bind(promo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("code", &promo.code),
            other => other,
        })?;

        Ok(promo)
    }

    /// Replaces every editable field of a code.
    pub async fn update(&self, promo: &PromoCode) -> DbResult<()> {
        let code = PromoCode::normalize(&promo.code);
        debug!(id = %promo.id, code = %code, "Updating promo code");

        let result = sqlx::query(
            r#"
            UPDATE promo_codes SET
                code = ?2,
                discount_percentage = ?3,
                product_id = ?4,
                is_active = ?5,
                expires_at = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&promo.id)
        .bind(&code)
        .bind(i64::from(promo.discount_percentage))
        .bind(&promo.product_id)
        .bind(promo.is_active)
        .bind(promo.expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("code", &code),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PromoCode", &promo.id));
        }
        Ok(())
    }

    /// Switches a code on or off without touching anything else.
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        debug!(id = %id, is_active, "Toggling promo code");

        let result =
            sqlx::query("UPDATE promo_codes SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(is_active)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PromoCode", id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting promo code");

        let result = sqlx::query("DELETE FROM promo_codes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PromoCode", id));
        }
        Ok(())
    }
}
