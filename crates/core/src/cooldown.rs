//! Per-user, per-type claim cooldown.
//!
//! There is no ledger table: the anchor is the `updated_at` of the most
//! recently claimed coupon of that type held by the user, which the claim
//! statement rewrites to the claim time.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Minimum interval between two claims of the same type by one user.
pub const CLAIM_COOLDOWN_MS: i64 = 12 * MS_PER_HOUR;

/// Time left before the next claim is allowed, truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooldownRemaining {
    pub remaining_hours: i64,
    pub remaining_minutes: i64,
}

impl CooldownRemaining {
    fn from_millis(ms: i64) -> Self {
        Self {
            remaining_hours: ms / MS_PER_HOUR,
            remaining_minutes: (ms / MS_PER_MINUTE) % 60,
        }
    }
}

/// Returns the remaining wait if a claim made at `last_claimed_at` still
/// blocks a new one at `now`, or `None` once the window has fully elapsed.
///
/// A `last_claimed_at` in the future (clock skew) counts as "just claimed".
pub fn remaining(last_claimed_at: Timestamp, now: Timestamp) -> Option<CooldownRemaining> {
    let elapsed = (now - last_claimed_at).max(0);
    if elapsed >= CLAIM_COOLDOWN_MS {
        return None;
    }
    Some(CooldownRemaining::from_millis(CLAIM_COOLDOWN_MS - elapsed))
}

/// Fails with [`CoreError::RateLimited`] while the cooldown is active.
/// `None` means the user never claimed this type.
pub fn check(last_claimed_at: Option<Timestamp>, now: Timestamp) -> Result<(), CoreError> {
    match last_claimed_at.and_then(|last| remaining(last, now)) {
        Some(left) => Err(CoreError::RateLimited {
            remaining_hours: left.remaining_hours,
            remaining_minutes: left.remaining_minutes,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const T: Timestamp = 1_700_000_000_000;

    #[test]
    fn never_claimed_passes() {
        assert!(check(None, T).is_ok());
    }

    #[test]
    fn one_minute_before_boundary_is_rejected() {
        let now = T + 11 * MS_PER_HOUR + 59 * MS_PER_MINUTE;
        assert_matches!(
            check(Some(T), now),
            Err(CoreError::RateLimited {
                remaining_hours: 0,
                remaining_minutes: 1
            })
        );
    }

    #[test]
    fn exact_boundary_is_accepted() {
        assert!(check(Some(T), T + CLAIM_COOLDOWN_MS).is_ok());
        assert!(check(Some(T), T + CLAIM_COOLDOWN_MS + 1000).is_ok());
    }

    #[test]
    fn one_millisecond_short_is_still_rejected() {
        assert!(check(Some(T), T + CLAIM_COOLDOWN_MS - 1).is_err());
    }

    #[test]
    fn remaining_is_split_into_hours_and_minutes() {
        let now = T + 2 * MS_PER_HOUR + 30 * MS_PER_MINUTE;
        assert_eq!(
            remaining(T, now),
            Some(CooldownRemaining {
                remaining_hours: 9,
                remaining_minutes: 30
            })
        );
    }

    #[test]
    fn immediately_after_claim_reports_full_window() {
        assert_eq!(
            remaining(T, T),
            Some(CooldownRemaining {
                remaining_hours: 12,
                remaining_minutes: 0
            })
        );
    }

    #[test]
    fn future_anchor_is_capped_at_full_window() {
        assert_eq!(
            remaining(T + MS_PER_HOUR, T),
            Some(CooldownRemaining {
                remaining_hours: 12,
                remaining_minutes: 0
            })
        );
    }
}
