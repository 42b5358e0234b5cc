//! Saturating 256-bit arithmetic: clamp to `[0, MAX]` instead of wrapping
//! or trapping.
//!
//! The checked opcode family uses `U256::checked_*` directly and faults on
//! overflow; these exist so program authors can opt out of that where
//! clamping is the domain semantic (tier-time diffing must never fault).

use primitive_types::U256;

pub fn sat_add(a: U256, b: U256) -> U256 {
    a.checked_add(b).unwrap_or(U256::MAX)
}

pub fn sat_sub(a: U256, b: U256) -> U256 {
    a.checked_sub(b).unwrap_or_else(U256::zero)
}

pub fn sat_mul(a: U256, b: U256) -> U256 {
    a.checked_mul(b).unwrap_or(U256::MAX)
}

pub fn sat_exp(a: U256, b: U256) -> U256 {
    a.checked_pow(b).unwrap_or(U256::MAX)
}
