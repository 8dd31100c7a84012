//! Shared response envelope types for API handlers.
//!
//! Every API response, success or failure, uses the
//! `{ "code": .., "msg": .., "data": .. }` envelope. `code` is `0` on
//! success; error codes are assigned in [`crate::error`].

use serde::Serialize;

use crate::extract::Json;

/// Application code carried by every successful response.
pub const SUCCESS_CODE: u32 = 0;

/// Standard `{ code, msg, data }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(ok(coupon))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u32,
    pub msg: String,
    pub data: T,
}

/// Wrap `data` in a success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: SUCCESS_CODE,
        msg: "success".to_string(),
        data,
    })
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub list: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

/// Payload wrapping an unpaged catalogue (`{ "list": [...] }`).
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub list: Vec<T>,
}
