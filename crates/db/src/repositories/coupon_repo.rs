//! Repository for the `coupons` table.

use coupon_core::types::{now_millis, DbId, Timestamp};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::coupon::{Coupon, CouponFilter, CreateCoupon, UpdateCoupon};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, coupon_type, creator, taker, created_at, updated_at";

/// Provides CRUD operations for coupons, plus the conditional claim.
pub struct CouponRepo;

impl CouponRepo {
    // -----------------------------------------------------------------------
    // Inserts
    // -----------------------------------------------------------------------

    /// Insert a new unclaimed coupon, returning the created row.
    ///
    /// A duplicate `code` surfaces as a unique-violation `sqlx::Error`.
    pub async fn create(pool: &SqlitePool, input: &CreateCoupon) -> Result<Coupon, sqlx::Error> {
        let now = now_millis();
        let query = format!(
            "INSERT INTO coupons (code, coupon_type, creator, taker, created_at, updated_at)
             VALUES ($1, $2, $3, 0, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(&input.code)
            .bind(input.coupon_type)
            .bind(input.creator)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Insert many coupons in one transaction, skipping codes that already
    /// exist. Returns the codes actually inserted, in input order.
    pub async fn bulk_create(
        pool: &SqlitePool,
        inputs: &[CreateCoupon],
    ) -> Result<Vec<String>, sqlx::Error> {
        let now = now_millis();
        let mut tx = pool.begin().await?;
        let mut inserted = Vec::with_capacity(inputs.len());

        for input in inputs {
            let result = sqlx::query(
                "INSERT INTO coupons (code, coupon_type, creator, taker, created_at, updated_at)
                 VALUES ($1, $2, $3, 0, $4, $4)
                 ON CONFLICT (code) DO NOTHING",
            )
            .bind(&input.code)
            .bind(input.coupon_type)
            .bind(input.creator)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() > 0 {
                inserted.push(input.code.clone());
            }
        }

        tx.commit().await?;
        tracing::debug!(
            requested = inputs.len(),
            inserted = inserted.len(),
            "Bulk coupon insert committed",
        );
        Ok(inserted)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE id = $1");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_code(
        pool: &SqlitePool,
        code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE code = $1");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Lowest-id unclaimed coupon of the given type.
    pub async fn find_available_one(
        pool: &SqlitePool,
        coupon_type: i64,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupons
             WHERE coupon_type = $1 AND taker = 0
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(coupon_type)
            .fetch_optional(pool)
            .await
    }

    /// The coupon of `coupon_type` most recently claimed by `taker`.
    pub async fn most_recent_by_taker_and_type(
        pool: &SqlitePool,
        taker: DbId,
        coupon_type: i64,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupons
             WHERE taker = $1 AND coupon_type = $2
             ORDER BY updated_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(taker)
            .bind(coupon_type)
            .fetch_optional(pool)
            .await
    }

    /// Number of unclaimed coupons of the given type.
    pub async fn count_available_by_type(
        pool: &SqlitePool,
        coupon_type: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM coupons WHERE coupon_type = $1 AND taker = 0",
        )
        .bind(coupon_type)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// Stock listing with optional type and claimed-state filters, newest first.
    pub async fn list_filtered(
        pool: &SqlitePool,
        filter: CouponFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM coupons"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        qb.build_query_as::<Coupon>().fetch_all(pool).await
    }

    pub async fn count_filtered(pool: &SqlitePool, filter: CouponFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM coupons");
        push_filter(&mut qb, filter);

        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Coupons held by `taker`, most recently claimed first.
    pub async fn list_by_taker(
        pool: &SqlitePool,
        taker: DbId,
        coupon_type: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupons
             WHERE taker = $1 AND ($2 IS NULL OR coupon_type = $2)
             ORDER BY updated_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(taker)
            .bind(coupon_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_taker(
        pool: &SqlitePool,
        taker: DbId,
        coupon_type: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM coupons
             WHERE taker = $1 AND ($2 IS NULL OR coupon_type = $2)",
        )
        .bind(taker)
        .bind(coupon_type)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Conditional mutations
    // -----------------------------------------------------------------------

    /// Assign an unclaimed coupon to `taker`. Returns rows affected:
    /// `1` on success, `0` if someone else claimed it first.
    pub async fn claim(
        pool: &SqlitePool,
        id: DbId,
        taker: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE coupons SET taker = $2, updated_at = $3
             WHERE id = $1 AND taker = 0",
        )
        .bind(id)
        .bind(taker)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Edit a coupon only while it is unclaimed.
    ///
    /// Returns `None` if the coupon does not exist or has been claimed.
    pub async fn update_unclaimed(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateCoupon,
        now: Timestamp,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "UPDATE coupons SET
                code = COALESCE($2, code),
                coupon_type = COALESCE($3, coupon_type),
                updated_at = $4
             WHERE id = $1 AND taker = 0
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(input.coupon_type)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Delete a coupon only while it is unclaimed. Returns `true` if removed.
    pub async fn delete_unclaimed(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1 AND taker = 0")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: CouponFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(coupon_type) = filter.coupon_type {
        qb.push(" AND coupon_type = ");
        qb.push_bind(coupon_type);
    }
    match filter.taken {
        Some(true) => {
            qb.push(" AND taker <> 0");
        }
        Some(false) => {
            qb.push(" AND taker = 0");
        }
        None => {}
    }
}
