//! Tier report codec and algebra.
//!
//! A report packs 8 monotonic "tier achieved at" timestamps into one 256-bit
//! word, lane 0 in the least-significant 32 bits. Lane value `0xFFFF_FFFF`
//! means "never achieved". All algebra is lane-wise; the word is never
//! treated as one big number except by the packing itself.

pub mod report;
pub mod select_lte;

pub use report::{
    diff, lane, pack, time_for_tier, unpack, update_times_for_range, TierError, ALWAYS_REPORT,
    LANES, NEVER_LANE, NEVER_REPORT,
};
pub use select_lte::{select_lte, Logic, Mode};
