//! Permission bits and bitmask composition.
//!
//! A user's permissions are stored as a single integer: the bitwise OR of
//! the [`Role`] masks they were granted. The catalogue is fixed at compile
//! time and ordered by bit index.
//!
//! `admin` occupies bit 0 by convention only. It is NOT a superset: a route
//! guarded by [`STOCK`] rejects an administrator whose mask lacks the stock
//! bit.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Opaque permission bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMask(i64);

impl RoleMask {
    /// A mask granting nothing.
    pub const EMPTY: RoleMask = RoleMask(0);

    pub const fn from_bits(bits: i64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> i64 {
        self.0
    }

    pub const fn union(self, other: RoleMask) -> Self {
        Self(self.0 | other.0)
    }

    /// `true` if any bit of `required` is set in this mask.
    pub const fn intersects(self, required: RoleMask) -> bool {
        self.0 & required.0 != 0
    }

    /// `true` if this mask carries the bit of `role`.
    pub const fn has(self, role: Role) -> bool {
        self.intersects(role.mask)
    }

    /// Names of the catalogue roles present in this mask, in bit order.
    /// Unknown bits are ignored.
    pub fn names(self) -> Vec<&'static str> {
        ALL_ROLES
            .iter()
            .filter(|role| self.has(**role))
            .map(|role| role.name)
            .collect()
    }
}

impl BitOr for RoleMask {
    type Output = RoleMask;

    fn bitor(self, rhs: RoleMask) -> RoleMask {
        self.union(rhs)
    }
}

impl From<Role> for RoleMask {
    fn from(role: Role) -> Self {
        role.mask
    }
}

/// A named permission bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Stable machine name.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// `1 << index`.
    pub mask: RoleMask,
}

impl Role {
    const fn new(name: &'static str, label: &'static str, index: u32) -> Self {
        Self {
            name,
            label,
            mask: RoleMask(1 << index),
        }
    }
}

pub const ADMIN: Role = Role::new("admin", "Administrator", 0);
pub const LOGIN: Role = Role::new("login", "Login", 1);
pub const STOCK: Role = Role::new("stock", "Stock management", 2);
pub const APPLY_COUPON: Role = Role::new("apply_coupon", "Apply for coupons", 3);

/// Every defined role, ordered by bit index.
pub const ALL_ROLES: [Role; 4] = [ADMIN, LOGIN, STOCK, APPLY_COUPON];

pub fn all_roles() -> &'static [Role] {
    &ALL_ROLES
}

/// Bitwise OR of the given roles' masks.
pub fn merge(roles: &[Role]) -> RoleMask {
    roles
        .iter()
        .fold(RoleMask::EMPTY, |acc, role| acc.union(role.mask))
}

/// `true` iff `user & required != 0`.
pub fn has_role(user: RoleMask, required: RoleMask) -> bool {
    user.intersects(required)
}
