//! Singleton rule base for the fuzzy controller.
//!
//! Rows are keyed by the label of the normalized error `e`, columns by the
//! label of its change `de`. Each cell is a singleton output on `[-1, 1]`.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::membership::{LinguisticSet, SET_COUNT};

/// Default rule table.
///
/// Pushes harder when the error and its trend agree and eases off when they
/// disagree. Antisymmetric: `rule(a, b) == -rule(a.opposite(), b.opposite())`.
pub const DEFAULT_RULES: RuleTable = RuleTable {
    rows: [
        //  NB    NS    Z     PS    PB     <- de
        [-1.0, -1.0, -0.5, -0.5, 0.0], // e = NB
        [-1.0, -0.5, -0.5, 0.0, 0.5],  // e = NS
        [-0.5, -0.5, 0.0, 0.5, 0.5],   // e = Z
        [-0.5, 0.0, 0.5, 0.5, 1.0],    // e = PS
        [0.0, 0.5, 0.5, 1.0, 1.0],     // e = PB
    ],
};

/// Two-dimensional rule table indexed by linguistic set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    rows: [[f64; SET_COUNT]; SET_COUNT],
}

impl RuleTable {
    /// Build a table from raw rows, rejecting outputs outside `[-1, 1]`.
    pub fn new(rows: [[f64; SET_COUNT]; SET_COUNT]) -> ControlResult<Self> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if !(-1.0..=1.0).contains(&value) {
                    return Err(ControlError::RuleOutOfRange { row, col, value });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Singleton output for `(e, de)`.
    #[inline]
    pub fn output(&self, e: LinguisticSet, de: LinguisticSet) -> f64 {
        self.rows[e.index()][de.index()]
    }

    pub fn rows(&self) -> &[[f64; SET_COUNT]; SET_COUNT] {
        &self.rows
    }

    /// Whether the table mirrors itself under joint negation of both axes.
    pub fn is_antisymmetric(&self) -> bool {
        LinguisticSet::ALL.iter().all(|&e| {
            LinguisticSet::ALL
                .iter()
                .all(|&de| self.output(e, de) == -self.output(e.opposite(), de.opposite()))
        })
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        DEFAULT_RULES
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mirrored_pairs_negate(i in 0usize..SET_COUNT, j in 0usize..SET_COUNT) {
            let e = LinguisticSet::try_from(i).unwrap();
            let de = LinguisticSet::try_from(j).unwrap();
            prop_assert_eq!(
                DEFAULT_RULES.output(e, de),
                -DEFAULT_RULES.output(e.opposite(), de.opposite())
            );
        }
    }
}
