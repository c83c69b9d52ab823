//! Mamdani-style fuzzy controller.
//!
//! Inputs are the tracking error normalized by the setpoint magnitude and the
//! step-to-step change of that normalized error, both clamped to `[-1, 1]`.
//! Every `(e, de)` label pair fires with strength `min(mu_e, mu_de)`; the
//! crisp output is the strength-weighted average of the rule singletons,
//! scaled by the torque limit.

use serde::{Deserialize, Serialize};

use crate::membership::{LinguisticSet, Memberships, fuzzify};
use crate::rules::{DEFAULT_RULES, RuleTable};

/// Guards the error normalization against a zero setpoint.
pub const NORMALIZATION_EPS: f64 = 1e-5;

/// A rule that fired with nonzero strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    pub e: LinguisticSet,
    pub de: LinguisticSet,
    pub strength: f64,
    pub output: f64,
}

/// Weighted-average defuzzification of `(strength, singleton)` pairs.
///
/// Zero total strength yields 0.
pub fn defuzzify(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (num, den) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(num, den), (w, out)| (num + w * out, den + w));
    if den == 0.0 { 0.0 } else { num / den }
}

fn firing_pairs<'a>(
    mu_e: &'a Memberships,
    mu_de: &'a Memberships,
    rules: &'a RuleTable,
) -> impl Iterator<Item = (LinguisticSet, LinguisticSet, f64, f64)> + 'a {
    LinguisticSet::ALL.into_iter().flat_map(move |e| {
        LinguisticSet::ALL.into_iter().map(move |de| {
            let strength = mu_e[e.index()].min(mu_de[de.index()]);
            (e, de, strength, rules.output(e, de))
        })
    })
}

/// Crisp inference on normalized inputs, output on `[-1, 1]`.
pub fn infer(e: f64, de: f64, rules: &RuleTable) -> f64 {
    let mu_e = fuzzify(e);
    let mu_de = fuzzify(de);
    defuzzify(firing_pairs(&mu_e, &mu_de, rules).map(|(_, _, w, out)| (w, out)))
}

/// Rules with nonzero firing strength for `(e, de)`; at most four.
pub fn fired_rules(e: f64, de: f64, rules: &RuleTable) -> Vec<RuleActivation> {
    let mu_e = fuzzify(e);
    let mu_de = fuzzify(de);
    firing_pairs(&mu_e, &mu_de, rules)
        .filter(|(_, _, strength, _)| *strength > 0.0)
        .map(|(e, de, strength, output)| RuleActivation {
            e,
            de,
            strength,
            output,
        })
        .collect()
}

/// Fuzzy controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyController {
    /// Torque that a full-scale (±1) inference output maps to.
    pub max_torque: f64,
    pub rules: RuleTable,
}

impl FuzzyController {
    /// Create a controller using the default rule table.
    pub fn new(max_torque: f64) -> Self {
        Self {
            max_torque,
            rules: DEFAULT_RULES,
        }
    }

    /// Replace the rule table.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Normalized error and error change for this sample.
    pub fn normalize(state: &FuzzyState, pv: f64, sp: f64) -> (f64, f64) {
        let e = ((sp - pv) / (sp.abs() + NORMALIZATION_EPS)).clamp(-1.0, 1.0);
        let de = (e - state.prev_error).clamp(-1.0, 1.0);
        (e, de)
    }

    /// Compute the torque command.
    ///
    /// # Returns
    ///
    /// Updated state and output in `[-max_torque, max_torque]`.
    pub fn update(&self, state: &FuzzyState, pv: f64, sp: f64) -> (FuzzyState, f64) {
        let (e, de) = Self::normalize(state, pv, sp);
        let output = infer(e, de, &self.rules) * self.max_torque;
        (FuzzyState { prev_error: e }, output)
    }
}

/// Fuzzy controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FuzzyState {
    /// Normalized error seen on the previous update.
    pub prev_error: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use LinguisticSet::*;

    #[test]
    fn centered_input_gives_zero() {
        assert_eq!(infer(0.0, 0.0, &DEFAULT_RULES), 0.0);
    }

    #[test]
    fn full_scale_corners() {
        assert_eq!(infer(1.0, 1.0, &DEFAULT_RULES), 1.0);
        assert_eq!(infer(-1.0, -1.0, &DEFAULT_RULES), -1.0);
    }

    #[test]
    fn interpolates_between_singletons() {
        // e half-way between Z and PS, de = Z: rules (Z,Z)=0 and (PS,Z)=0.5
        let out = infer(0.25, 0.0, &DEFAULT_RULES);
        assert!((out - 0.25).abs() < 1e-12);
    }

    #[test]
    fn at_most_four_rules_fire() {
        let fired = fired_rules(0.3, -0.7, &DEFAULT_RULES);
        assert_eq!(fired.len(), 4);
        let labels: Vec<_> = fired.iter().map(|r| (r.e, r.de)).collect();
        assert_eq!(labels, vec![(Z, NB), (Z, NS), (PS, NB), (PS, NS)]);

        assert_eq!(fired_rules(0.5, 0.0, &DEFAULT_RULES).len(), 1);
    }

    #[test]
    fn defuzzify_empty_is_zero() {
        assert_eq!(defuzzify(std::iter::empty()), 0.0);
        assert_eq!(defuzzify([(0.0, 1.0), (0.0, -1.0)]), 0.0);
        assert_eq!(defuzzify([(0.5, 1.0), (0.5, 0.0)]), 0.5);
    }

    #[test]
    fn nan_input_defuzzifies_to_zero() {
        assert_eq!(infer(f64::NAN, 0.0, &DEFAULT_RULES), 0.0);
    }

    #[test]
    fn zero_setpoint_is_guarded() {
        let ctrl = FuzzyController::new(0.5);
        let (state, output) = ctrl.update(&FuzzyState::default(), 0.0, 0.0);
        assert_eq!(state.prev_error, 0.0);
        assert_eq!(output, 0.0);

        let (e, _) = FuzzyController::normalize(&FuzzyState::default(), 1.0, 0.0);
        assert_eq!(e, -1.0);
    }

    #[test]
    fn first_step_pushes_full_torque() {
        let ctrl = FuzzyController::new(0.5);
        let (state, output) = ctrl.update(&FuzzyState::default(), 0.0, 1.0);
        assert!(state.prev_error > 0.999 && state.prev_error <= 1.0);
        assert!((output - 0.5).abs() < 1e-3);
    }

    #[test]
    fn custom_rules_are_used() {
        let rows = [[0.25; 5]; 5];
        let ctrl = FuzzyController::new(2.0).with_rules(RuleTable::new(rows).unwrap());
        let (_, output) = ctrl.update(&FuzzyState::default(), 0.2, 1.0);
        assert!((output - 0.5).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn output_within_unit_range(e in -1.0_f64..=1.0, de in -1.0_f64..=1.0) {
            let out = infer(e, de, &DEFAULT_RULES);
            prop_assert!((-1.0..=1.0).contains(&out));
            prop_assert!(fired_rules(e, de, &DEFAULT_RULES).len() <= 4);
        }

        #[test]
        fn inference_is_odd(e in -1.0_f64..=1.0, de in -1.0_f64..=1.0) {
            let a = infer(e, de, &DEFAULT_RULES);
            let b = infer(-e, -de, &DEFAULT_RULES);
            prop_assert!((a + b).abs() < 1e-12);
        }
    }
}
