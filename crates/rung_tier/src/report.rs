//! Packing, unpacking and lane-wise updates of tier reports.

use primitive_types::U256;
use thiserror::Error;

/// Number of tier lanes in a report.
pub const LANES: usize = 8;

/// Lane value meaning "this tier was never achieved".
pub const NEVER_LANE: u32 = u32::MAX;

/// Report with every lane at the "never achieved" sentinel.
pub const NEVER_REPORT: U256 = U256([u64::MAX; 4]);

/// Report with every lane achieved at time 0.
pub const ALWAYS_REPORT: U256 = U256([0; 4]);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierError {
    #[error("max tier exceeded: {tier} > 8")]
    MaxTierExceeded { tier: u32 },
}

pub type Result<T> = std::result::Result<T, TierError>;

/// Pack 8 lane timestamps into one report word, lane 0 least significant.
pub fn pack(lanes: [u32; LANES]) -> U256 {
    let mut out = U256::zero();
    for (i, lane) in lanes.iter().enumerate() {
        out = out | (U256::from(*lane) << (i * 32));
    }
    out
}

/// Unpack a report word into its 8 lane timestamps.
pub fn unpack(report: U256) -> [u32; LANES] {
    let mut out = [0u32; LANES];
    for (i, lane) in out.iter_mut().enumerate() {
        *lane = (report >> (i * 32)).low_u32();
    }
    out
}

/// Read a single lane. `i` must be below [`LANES`].
#[inline]
pub fn lane(report: U256, i: usize) -> u32 {
    debug_assert!(i < LANES);
    (report >> (i * 32)).low_u32()
}

fn write_lane(report: U256, i: usize, value: u32) -> U256 {
    debug_assert!(i < LANES);
    let mask = U256::from(u32::MAX) << (i * 32);
    (report & !mask) | (U256::from(value) << (i * 32))
}

/// Lane-wise saturating difference `a - b`. Never faults: an inconsistent
/// history (lane of `b` newer than `a`) clamps to zero.
pub fn diff(a: U256, b: U256) -> U256 {
    let mut out = U256::zero();
    for i in 0..LANES {
        let d = lane(a, i).saturating_sub(lane(b, i));
        out = out | (U256::from(d) << (i * 32));
    }
    out
}

/// Overwrite lanes `[start, end)` with `time`.
///
/// `end > 8` faults with [`TierError::MaxTierExceeded`]. An inverted range
/// (`end < start`) returns the report unchanged; range math over untrusted
/// histories may legitimately produce one.
pub fn update_times_for_range(report: U256, start: u8, end: u8, time: u32) -> Result<U256> {
    if end as usize > LANES {
        return Err(TierError::MaxTierExceeded { tier: end as u32 });
    }
    let mut out = report;
    for i in start..end {
        out = write_lane(out, i as usize, time);
    }
    Ok(out)
}

/// Time at which `tier` was first continuously achieved.
///
/// Tier 0 is the implicit baseline: always held, always reports 0. Tiers
/// 1..=8 read lane `tier - 1`; anything above 8 faults.
pub fn time_for_tier(report: U256, tier: u32) -> Result<u32> {
    match tier {
        0 => Ok(0),
        1..=8 => Ok(lane(report, tier as usize - 1)),
        _ => Err(TierError::MaxTierExceeded { tier }),
    }
}
