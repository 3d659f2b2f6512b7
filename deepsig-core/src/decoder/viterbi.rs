use std::ops::RangeInclusive;

use crate::model::artifact::TransitionParameters;

/// Index of the Signal state in per-position emission pairs
pub const SIGNAL: usize = 0;
/// Index of the Mature state in per-position emission pairs
pub const MATURE: usize = 1;

/// Best Signal→Mature segmentation of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViterbiPath {
    /// Number of leading positions in the Signal state
    pub boundary: usize,
    /// Total path score
    pub score: f64,
}

/// Viterbi decoding over the two-state Signal→Mature topology.
///
/// `emissions[t]` holds the Signal and Mature scores of position `t`. The
/// path starts in Signal, switches exactly once and ends in Mature; the
/// switch may only happen at a boundary inside `bounds`. When staying in
/// Mature scores the same as entering it, the earlier entry is kept, so
/// ties resolve toward the shorter signal segment.
///
/// Returns `None` when no legal path exists.
pub fn best_path(
    emissions: &[[f64; 2]],
    transitions: &TransitionParameters,
    bounds: RangeInclusive<usize>,
) -> Option<ViterbiPath> {
    let n = emissions.len();
    let (lo, hi) = (*bounds.start(), *bounds.end());
    if n < 2 || lo == 0 || lo > hi || hi >= n {
        return None;
    }

    // entered[t]: the best Mature path ending at t switched at t
    let mut entered = vec![false; n];
    let mut signal = emissions[0][SIGNAL];
    let mut mature = f64::NEG_INFINITY;

    for t in 1..n {
        let stay = mature + transitions.mature_to_mature;
        let enter = if bounds.contains(&t) {
            signal + transitions.signal_to_mature
        } else {
            f64::NEG_INFINITY
        };

        mature = if stay >= enter {
            stay
        } else {
            entered[t] = true;
            enter
        } + emissions[t][MATURE];

        signal = if t < hi {
            signal + transitions.signal_to_signal + emissions[t][SIGNAL]
        } else {
            f64::NEG_INFINITY
        };
    }

    if !mature.is_finite() {
        return None;
    }
    let boundary = traceback(&entered)?;
    Some(ViterbiPath {
        boundary,
        score: mature,
    })
}

/// Walks back from the last position to the Signal→Mature switch
fn traceback(entered: &[bool]) -> Option<usize> {
    let mut t = entered.len() - 1;
    while t > 0 {
        if entered[t] {
            return Some(t);
        }
        t -= 1;
    }
    None
}
