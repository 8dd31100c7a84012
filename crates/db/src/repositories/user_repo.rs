//! Repository for the `users` table.

use coupon_core::types::{now_millis, DbId};
use sqlx::SqlitePool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, account, password_hash, role, private_key, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let now = now_millis();
        let query = format!(
            "INSERT INTO users (name, account, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.account)
            .bind(&input.password_hash)
            .bind(input.role.bits())
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Insert a user unless the account already exists.
    ///
    /// Returns `true` if a row was created.
    pub async fn create_if_absent(pool: &SqlitePool, input: &CreateUser) -> Result<bool, sqlx::Error> {
        let now = now_millis();
        let result = sqlx::query(
            "INSERT INTO users (name, account, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             ON CONFLICT (account) DO NOTHING",
        )
        .bind(&input.name)
        .bind(&input.account)
        .bind(&input.password_hash)
        .bind(input.role.bits())
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by login account.
    pub async fn find_by_account(
        pool: &SqlitePool,
        account: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE account = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(account)
            .fetch_optional(pool)
            .await
    }

    /// List users ordered by id.
    pub async fn list(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let now = now_millis();
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                account = COALESCE($3, account),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                private_key = COALESCE($6, private_key),
                updated_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.account)
            .bind(&input.password_hash)
            .bind(input.role.map(|role| role.bits()))
            .bind(&input.private_key)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
