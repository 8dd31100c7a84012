//! Shared query parameter types for API handlers.

use serde::Deserialize;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_SIZE: i64 = 10;
const MAX_SIZE: i64 = 100;

/// Page-based pagination parameters (`?page=&size=`).
///
/// `page` below 1 becomes 1; `size` outside `1..=100` falls back to 10.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn size(&self) -> i64 {
        match self.size {
            Some(size) if (1..=MAX_SIZE).contains(&size) => size,
            _ => DEFAULT_SIZE,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.size()
    }
}

/// Optional `?type=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct TypeParams {
    #[serde(rename = "type")]
    pub coupon_type: Option<i64>,
}
