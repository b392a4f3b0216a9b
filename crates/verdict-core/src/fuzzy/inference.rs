use serde::{Deserialize, Serialize};

use crate::fuzzy::input::{
    api_suspicion_levels, code_reuse_levels, controlflow_levels, entropy_levels, package_levels,
    string_visibility_levels, ControlFlowLevels, LevelDegrees, PackageLevels,
};
use crate::report::SampleMetrics;

// Rule weights, 0-100. The score is the plain mean of the ten weighted
// activations, not a membership-weighted centroid.
const W_OBFUSCATION: f64 = 100.0;
const W_API_ABUSE: f64 = 95.0;
const W_CODE_REUSE: f64 = 90.0;
const W_HIDDEN_STRINGS: f64 = 85.0;
const W_COMPLEX_FLOW: f64 = 80.0;
const W_ENTROPY_API: f64 = 92.0;
const W_REUSE_HIDDEN: f64 = 88.0;
const W_FLOW_API: f64 = 85.0;
const W_PACKAGES_ENTROPY: f64 = 80.0;
const W_BENIGN: f64 = 25.0;

/// Membership maps plus rule diagnostics, kept on the report for
/// inspection. Not part of the serialized analysis document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipDetails {
    pub entropy: LevelDegrees,
    pub packages: PackageLevels,
    pub controlflow: ControlFlowLevels,
    pub string_visibility: LevelDegrees,
    pub code_reuse: LevelDegrees,
    pub api_suspicion: LevelDegrees,
    pub active_rules: usize,
    pub total_activation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatEvaluation {
    pub score: f64,
    pub details: MembershipDetails,
}

/// Evaluate the ten fixed rules over one metric vector and defuzzify to a
/// crisp 0-100 threat score.
pub fn evaluate_threat(m: &SampleMetrics) -> ThreatEvaluation {
    let e = entropy_levels(m.entropy);
    let p = package_levels(f64::from(m.packages));
    let c = controlflow_levels(m.controlflow);
    let v = string_visibility_levels(m.string_visibility);
    let r = code_reuse_levels(m.code_reuse);
    let a = api_suspicion_levels(m.api_suspicion);

    let rules = [
        // Single-condition rules.
        e.high * W_OBFUSCATION,
        a.high * W_API_ABUSE,
        r.high * W_CODE_REUSE,
        (1.0 - v.low) * W_HIDDEN_STRINGS,
        c.complex * W_COMPLEX_FLOW,
        // Pairwise combinations.
        (e.high + a.high) / 2.0 * W_ENTROPY_API,
        (r.high + (1.0 - v.low)) / 2.0 * W_REUSE_HIDDEN,
        (c.complex + a.high) / 2.0 * W_FLOW_API,
        (p.many + e.high) / 2.0 * W_PACKAGES_ENTROPY,
        // Benign counter-rule: all quiet indicators at once.
        e.low.min(1.0 - a.low).min(v.high) * W_BENIGN,
    ];

    let total: f64 = rules.iter().sum();
    let score = (total / rules.len() as f64).clamp(0.0, 100.0);

    ThreatEvaluation {
        score,
        details: MembershipDetails {
            entropy: e,
            packages: p,
            controlflow: c,
            string_visibility: v,
            code_reuse: r,
            api_suspicion: a,
            active_rules: rules.iter().filter(|x| **x > 0.0).count(),
            total_activation: total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(
        entropy: f64,
        packages: u32,
        controlflow: f64,
        string_visibility: f64,
        code_reuse: f64,
        api_suspicion: f64,
    ) -> SampleMetrics {
        SampleMetrics {
            entropy,
            packages,
            controlflow,
            string_visibility,
            code_reuse,
            api_suspicion,
        }
    }

    #[test]
    fn benign_sample_scores_low() {
        let eval = evaluate_threat(&metrics(2.5, 5, 1.8, 0.89, 0.05, 10.0));
        // Only the hidden-strings inversion, its pairwise echo and the
        // benign counter-rule activate: (85 + 44 + 25/3) / 10.
        assert!((eval.score - 13.7333).abs() < 1e-3);
        assert_eq!(eval.details.active_rules, 3);
        assert!((eval.details.total_activation - 137.3333).abs() < 1e-2);
    }

    #[test]
    fn hostile_sample_scores_higher() {
        let low = evaluate_threat(&metrics(2.5, 5, 1.8, 0.89, 0.05, 10.0));
        let high = evaluate_threat(&metrics(7.6, 22, 8.5, 0.12, 0.85, 92.0));
        assert!(high.score > low.score);
        assert!((high.score - 40.831).abs() < 0.05);
    }

    #[test]
    fn score_stays_in_range() {
        let extremes = [
            metrics(0.0, 0, 0.0, 0.0, 0.0, 0.0),
            metrics(8.0, 1000, 10.0, 1.0, 1.0, 100.0),
            metrics(7.0, 25, 8.0, 0.1, 0.8, 85.0),
            metrics(4.0, 9, 4.0, 0.5, 0.4, 50.0),
        ];
        for m in &extremes {
            let eval = evaluate_threat(m);
            assert!((0.0..=100.0).contains(&eval.score), "score {}", eval.score);
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let m = metrics(6.2, 18, 6.8, 0.28, 0.62, 75.0);
        let a = evaluate_threat(&m);
        let b = evaluate_threat(&m);
        assert_eq!(a.score, b.score);
        assert_eq!(a.details, b.details);
    }

    #[test]
    fn all_peaked_rules_fire_at_once() {
        // Every High/Many/Complex set at its peak. The hidden-strings
        // inversion (visibility Low is also at peak) and the benign
        // counter-rule stay at zero; the other eight rules activate.
        let eval = evaluate_threat(&metrics(7.0, 25, 8.0, 0.1, 0.8, 85.0));
        assert_eq!(eval.details.active_rules, 8);
        assert!((eval.score - 66.6).abs() < 1e-9);
    }
}
