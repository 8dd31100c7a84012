use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid coupon type: {0}")]
    InvalidCouponType(i64),

    #[error("Coupon code already exists: {0}")]
    DuplicateCode(String),

    /// Edit or delete attempted on a coupon that has already been claimed.
    #[error("Coupon {0} has already been claimed and can no longer be changed")]
    CouponLocked(DbId),

    /// The per-user, per-type claim cooldown has not elapsed yet.
    #[error("Claimed too recently, retry in {remaining_hours}h {remaining_minutes}m")]
    RateLimited {
        remaining_hours: i64,
        remaining_minutes: i64,
    },

    #[error("No coupons of type {0} are left in stock")]
    OutOfStock(i64),

    /// Another request claimed the selected coupon first.
    #[error("Coupon {0} was claimed by another request, please retry")]
    AlreadyClaimed(DbId),

    #[error("Internal error: {0}")]
    Internal(String),
}
