//! # User Repository
//!
//! Profiles and the two role flags the route guards read. Authentication
//! itself lives outside the storefront; users here are keyed by the id the
//! identity provider hands out.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use storefront_core::UserProfile;

const USER_COLUMNS: &str =
    "id, email, display_name, is_admin, is_escrow_agent, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    email: String,
    display_name: String,
    is_admin: bool,
    is_escrow_agent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            is_admin: row.is_admin,
            is_escrow_agent: row.is_escrow_agent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user profile operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY email");
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserProfile::from))
    }

    /// Email lookup is case-insensitive.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower(?1)");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserProfile::from))
    }

    /// Inserts a new profile.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The email is already registered
    pub async fn insert(&self, user: &UserProfile) -> DbResult<UserProfile> {
        debug!(id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, display_name, is_admin, is_escrow_agent, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.is_admin)
        .bind(user.is_escrow_agent)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", &user.email),
            other => other,
        })?;

        Ok(user.clone())
    }

    /// Updates email and display name. Role flags are left alone.
    pub async fn update_profile(&self, user: &UserProfile) -> DbResult<()> {
        debug!(id = %user.id, "Updating user profile");

        let result = sqlx::query(
            "UPDATE users SET email = ?2, display_name = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", &user.email),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }
        Ok(())
    }

    /// Grants or revokes the admin and escrow-agent roles.
    pub async fn set_roles(&self, id: &str, is_admin: bool, is_escrow_agent: bool) -> DbResult<()> {
        info!(id = %id, is_admin, is_escrow_agent, "Changing user roles");

        let result = sqlx::query(
            "UPDATE users SET is_admin = ?2, is_escrow_agent = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(is_admin)
        .bind(is_escrow_agent)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        let user = repo
            .insert(&UserProfile::new("Ana@Example.com", "Ana"))
            .await
            .unwrap();

        assert_eq!(repo.get_by_id(&user.id).await.unwrap().unwrap().display_name, "Ana");
        assert_eq!(
            repo.get_by_email("ana@example.com").await.unwrap().unwrap().id,
            user.id
        );
        assert!(repo.get_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        repo.insert(&UserProfile::new("a@b.co", "A")).await.unwrap();

        let err = repo.insert(&UserProfile::new("a@b.co", "Other")).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_roles_survive_profile_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        let mut user = repo.insert(&UserProfile::new("m@b.co", "Mod")).await.unwrap();

        repo.set_roles(&user.id, false, true).await.unwrap();

        user.display_name = "Moderator".to_string();
        user.is_admin = true;
        repo.update_profile(&user).await.unwrap();

        let loaded = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(loaded.display_name, "Moderator");
        assert!(!loaded.is_admin);
        assert!(loaded.is_escrow_agent);

        assert!(matches!(
            repo.set_roles("ghost", true, true).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
