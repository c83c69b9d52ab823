//! Linguistic sets and triangular membership functions.
//!
//! Five sets cover the normalized domain `[-1, 1]`:
//!
//! ```text
//!  NB        NS        Z         PS        PB
//!  1 \      /\        /\        /\      / 1
//!     \    /  \      /  \      /  \    /
//!      \  /    \    /    \    /    \  /
//!       \/      \  /      \  /      \/
//!  0 ---/\-------\/--------\/-------/\--- 0
//!    -1   -0.5      0        0.5      1
//! ```
//!
//! Each triangle has half-width 0.5 and peaks on its neighbours' feet, so at
//! most two sets are active for any input and, strictly between two peaks,
//! their degrees sum to one. The outer sets are clipped flat beyond the
//! domain ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Number of linguistic sets on each axis.
pub const SET_COUNT: usize = 5;

/// Half-width of every triangle.
const HALF_WIDTH: f64 = 0.5;

/// Membership degrees indexed by [`LinguisticSet::index`].
pub type Memberships = [f64; SET_COUNT];

/// Linguistic label on the normalized `[-1, 1]` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinguisticSet {
    /// Negative big.
    NB,
    /// Negative small.
    NS,
    /// Zero.
    Z,
    /// Positive small.
    PS,
    /// Positive big.
    PB,
}

impl LinguisticSet {
    /// All sets in domain order.
    pub const ALL: [LinguisticSet; SET_COUNT] = [Self::NB, Self::NS, Self::Z, Self::PS, Self::PB];

    /// Position in [`LinguisticSet::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Peak location of the set's triangle.
    pub const fn peak(self) -> f64 {
        match self {
            Self::NB => -1.0,
            Self::NS => -0.5,
            Self::Z => 0.0,
            Self::PS => 0.5,
            Self::PB => 1.0,
        }
    }

    /// Mirror image under negation (NB↔PB, NS↔PS, Z↔Z).
    pub const fn opposite(self) -> Self {
        match self {
            Self::NB => Self::PB,
            Self::NS => Self::PS,
            Self::Z => Self::Z,
            Self::PS => Self::NS,
            Self::PB => Self::NB,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NB => "NB",
            Self::NS => "NS",
            Self::Z => "Z",
            Self::PS => "PS",
            Self::PB => "PB",
        }
    }
}

impl fmt::Display for LinguisticSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LinguisticSet {
    type Err = ControlError;

    fn from_str(s: &str) -> ControlResult<Self> {
        Self::ALL
            .into_iter()
            .find(|set| set.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ControlError::UnknownSet {
                label: s.to_string(),
            })
    }
}

impl TryFrom<usize> for LinguisticSet {
    type Error = ControlError;

    fn try_from(index: usize) -> ControlResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ControlError::InvalidArg {
                what: "linguistic set index must be below 5",
            })
    }
}

/// Degree to which `x` belongs to `set`, in `[0, 1]`.
///
/// A NaN input belongs to no set.
pub fn membership(set: LinguisticSet, x: f64) -> f64 {
    match set {
        LinguisticSet::NB if x <= -1.0 => 1.0,
        LinguisticSet::PB if x >= 1.0 => 1.0,
        _ => (1.0 - (x - set.peak()).abs() / HALF_WIDTH).max(0.0),
    }
}

/// Membership degrees of `x` in every set.
pub fn fuzzify(x: f64) -> Memberships {
    LinguisticSet::ALL.map(|set| membership(set, x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peaks_have_full_membership() {
        for set in LinguisticSet::ALL {
            assert_eq!(membership(set, set.peak()), 1.0);
        }
    }

    #[test]
    fn only_one_set_active_at_a_peak() {
        let mu = fuzzify(0.5);
        assert_eq!(mu, [0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn midpoint_splits_evenly() {
        let mu = fuzzify(-0.75);
        assert_eq!(mu[LinguisticSet::NB.index()], 0.5);
        assert_eq!(mu[LinguisticSet::NS.index()], 0.5);
        assert_eq!(mu[LinguisticSet::Z.index()], 0.0);
    }

    #[test]
    fn outer_sets_clip_beyond_domain() {
        assert_eq!(membership(LinguisticSet::NB, -3.0), 1.0);
        assert_eq!(membership(LinguisticSet::PB, 7.0), 1.0);
        assert_eq!(membership(LinguisticSet::PB, -3.0), 0.0);
    }

    #[test]
    fn nan_belongs_nowhere() {
        assert_eq!(fuzzify(f64::NAN), [0.0; SET_COUNT]);
    }

    #[test]
    fn opposite_is_an_involution() {
        for set in LinguisticSet::ALL {
            assert_eq!(set.opposite().opposite(), set);
            assert_eq!(set.opposite().peak(), -set.peak());
        }
    }

    #[test]
    fn labels_parse_back() {
        for set in LinguisticSet::ALL {
            assert_eq!(set.to_string().parse::<LinguisticSet>().unwrap(), set);
        }
        assert_eq!("ps".parse::<LinguisticSet>().unwrap(), LinguisticSet::PS);
        assert!("PM".parse::<LinguisticSet>().is_err());
    }

    #[test]
    fn index_round_trips() {
        for set in LinguisticSet::ALL {
            assert_eq!(LinguisticSet::try_from(set.index()).unwrap(), set);
        }
        assert!(LinguisticSet::try_from(5).is_err());
    }
}
