//! SELECT_LTE: reduce several reports against a pivot time, lane by lane.
//!
//! Every tiered-access and multi-source-eligibility policy reduces to a
//! composition of `diff`, `update_times_for_range` and this combinator.

use primitive_types::U256;

use crate::report::{lane, pack, LANES, NEVER_LANE};

/// How many reports must qualify for a lane to be defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    /// At least one report with `lane <= pivot`.
    Any,
    /// All reports with `lane <= pivot`.
    Every,
}

/// Which qualifying value a defined lane keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Oldest (smallest) qualifying timestamp.
    Min,
    /// Newest (largest) timestamp still `<= pivot`.
    Max,
    /// The first qualifying report in list order, ignoring the rest.
    First,
}

/// Combine `reports` against `pivot`, independently per lane.
///
/// A lane with no qualifying value under `logic` is the `NEVER_LANE`
/// sentinel regardless of `mode`.
pub fn select_lte(pivot: u32, reports: &[U256], logic: Logic, mode: Mode) -> U256 {
    let mut out = [NEVER_LANE; LANES];
    for (i, slot) in out.iter_mut().enumerate() {
        let mut picked: Option<u32> = None;
        let mut all_qualify = true;
        for report in reports {
            let t = lane(*report, i);
            if t > pivot {
                all_qualify = false;
                continue;
            }
            picked = Some(match (mode, picked) {
                (_, None) => t,
                (Mode::Min, Some(prev)) => prev.min(t),
                (Mode::Max, Some(prev)) => prev.max(t),
                (Mode::First, Some(prev)) => prev,
            });
        }
        if logic == Logic::Every && !all_qualify {
            continue;
        }
        if let Some(t) = picked {
            *slot = t;
        }
    }
    pack(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ALWAYS_REPORT, NEVER_REPORT};

    const T: u32 = 1_000_000;

    #[test]
    fn every_min_with_a_never_report_is_never() {
        let r = select_lte(T, &[ALWAYS_REPORT, NEVER_REPORT], Logic::Every, Mode::Min);
        assert_eq!(r, NEVER_REPORT, "NEVER never qualifies, so Every fails");
    }

    #[test]
    fn any_min_with_a_never_report_is_always() {
        let r = select_lte(T, &[ALWAYS_REPORT, NEVER_REPORT], Logic::Any, Mode::Min);
        assert_eq!(r, ALWAYS_REPORT, "ALWAYS qualifies with value 0 in every lane");
    }

    #[test]
    fn no_qualifying_report_is_never() {
        let late = pack([T + 1; LANES]);
        let r = select_lte(T, &[late], Logic::Any, Mode::Min);
        assert_eq!(r, NEVER_REPORT);
    }

    #[test]
    fn max_keeps_newest_at_or_below_pivot() {
        let a = pack([10, 10, 10, 10, 10, 10, 10, 10]);
        let b = pack([20, 20, T + 1, 20, 20, 20, 20, 20]);
        let r = select_lte(T, &[a, b], Logic::Any, Mode::Max);
        // lane 2 of b is past the pivot, so only a's 10 qualifies there
        assert_eq!(unpacked(r), [20, 20, 10, 20, 20, 20, 20, 20]);
    }

    #[test]
    fn min_keeps_oldest() {
        let a = pack([30; LANES]);
        let b = pack([5; LANES]);
        let r = select_lte(T, &[a, b], Logic::Every, Mode::Min);
        assert_eq!(unpacked(r), [5; LANES]);
    }

    #[test]
    fn first_keeps_list_order_winner() {
        let a = pack([30; LANES]);
        let b = pack([5; LANES]);
        let r = select_lte(T, &[a, b], Logic::Any, Mode::First);
        assert_eq!(unpacked(r), [30; LANES], "a is first in list order");

        let skip_a = pack([T + 1; LANES]);
        let r = select_lte(T, &[skip_a, b], Logic::Any, Mode::First);
        assert_eq!(unpacked(r), [5; LANES], "a disqualified, b is first to qualify");
    }

    #[test]
    fn lanes_are_independent() {
        let a = pack([1, T + 1, 1, T + 1, 1, T + 1, 1, T + 1]);
        let r = select_lte(T, &[a], Logic::Every, Mode::Min);
        assert_eq!(
            unpacked(r),
            [1, NEVER_LANE, 1, NEVER_LANE, 1, NEVER_LANE, 1, NEVER_LANE]
        );
    }

    fn unpacked(r: U256) -> [u32; LANES] {
        crate::report::unpack(r)
    }
}
