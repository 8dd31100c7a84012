//! Coupon-type catalogue.
//!
//! Types are a process-lifetime constant; adding one means editing
//! [`ALL_COUPON_TYPES`] and restarting.

use serde::Serialize;

use crate::error::CoreError;

/// Name reported for a type id that is not in the catalogue.
pub const UNKNOWN_TYPE_NAME: &str = "unknown";

/// Maximum length of a coupon code, in characters.
pub const MAX_CODE_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CouponType {
    #[serde(rename = "type")]
    pub id: i64,
    pub name: &'static str,
}

pub const FITNESS_CARD: CouponType = CouponType {
    id: 1,
    name: "Fitness card",
};

pub const ALL_COUPON_TYPES: [CouponType; 1] = [FITNESS_CARD];

pub fn all_coupon_types() -> &'static [CouponType] {
    &ALL_COUPON_TYPES
}

pub fn find(id: i64) -> Option<CouponType> {
    ALL_COUPON_TYPES.iter().copied().find(|t| t.id == id)
}

pub fn is_valid(id: i64) -> bool {
    find(id).is_some()
}

pub fn name_of(id: i64) -> &'static str {
    find(id).map_or(UNKNOWN_TYPE_NAME, |t| t.name)
}

/// Resolve `id` against the catalogue, failing with
/// [`CoreError::InvalidCouponType`] for unknown ids.
pub fn validate(id: i64) -> Result<CouponType, CoreError> {
    find(id).ok_or(CoreError::InvalidCouponType(id))
}

/// Check a single coupon code: non-blank and at most [`MAX_CODE_LENGTH`]
/// characters. Codes are compared case-sensitively everywhere.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.trim().is_empty() {
        return Err(CoreError::Validation("Coupon code must not be empty".into()));
    }
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Coupon code must be at most {MAX_CODE_LENGTH} characters"
        )));
    }
    Ok(())
}
