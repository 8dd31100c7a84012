/// All primary keys are SQLite `INTEGER PRIMARY KEY` rowids.
pub type DbId = i64;

/// Millisecond Unix timestamp (UTC).
pub type Timestamp = i64;

/// `taker` value of a coupon nobody has claimed yet.
pub const NO_TAKER: DbId = 0;

/// Current wall-clock time as a millisecond [`Timestamp`].
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
