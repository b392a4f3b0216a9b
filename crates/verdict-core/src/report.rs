use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::behavior::ApiCategory;
use crate::classify::ThreatLevel;
use crate::fuzzy::inference::MembershipDetails;
use crate::profile::AttackerKind;

/// The six static-analysis metrics describing one sample. Validated before
/// scoring; never mutated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleMetrics {
    pub entropy: f64,
    pub packages: u32,
    pub controlflow: f64,
    pub string_visibility: f64,
    pub code_reuse: f64,
    pub api_suspicion: f64,
}

/// One complete analysis, immutable once built. Every derived field is a
/// pure function of the metrics; only the timestamp varies between calls.
///
/// Serializes to a flat document (metrics are flattened in); the membership
/// diagnostics ride along in memory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub sample_name: String,
    pub threat_score: f64,
    pub threat_level: ThreatLevel,
    pub confidence: String,
    #[serde(flatten)]
    pub metrics: SampleMetrics,
    pub attacker_profile: AttackerKind,
    pub behavioral_indicators: Vec<String>,
    pub detected_apis: BTreeMap<ApiCategory, Vec<String>>,
    pub registry_indicators: Vec<String>,
    pub network_indicators: Vec<String>,
    #[serde(skip)]
    pub membership: MembershipDetails,
    pub analysis_timestamp: String,
}

#[cfg(test)]
mod tests {
    use crate::analyzer::analyze;
    use crate::report::SampleMetrics;

    use super::ThreatReport;

    #[test]
    fn json_round_trip_preserves_fields() {
        let metrics = SampleMetrics {
            entropy: 6.2,
            packages: 18,
            controlflow: 6.8,
            string_visibility: 0.28,
            code_reuse: 0.62,
            api_suspicion: 75.0,
        };
        let report = analyze("trojan_stealer", &metrics);

        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: ThreatReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.sample_name, report.sample_name);
        assert_eq!(parsed.threat_score, report.threat_score);
        assert_eq!(parsed.threat_level, report.threat_level);
        assert_eq!(parsed.confidence, report.confidence);
        assert_eq!(parsed.metrics, report.metrics);
        assert_eq!(parsed.attacker_profile, report.attacker_profile);
        assert_eq!(parsed.behavioral_indicators, report.behavioral_indicators);
        assert_eq!(parsed.detected_apis, report.detected_apis);
        assert_eq!(parsed.registry_indicators, report.registry_indicators);
        assert_eq!(parsed.network_indicators, report.network_indicators);
        assert_eq!(parsed.analysis_timestamp, report.analysis_timestamp);
    }

    #[test]
    fn document_is_flat_and_complete() {
        let metrics = SampleMetrics {
            entropy: 2.5,
            packages: 5,
            controlflow: 1.8,
            string_visibility: 0.89,
            code_reuse: 0.05,
            api_suspicion: 10.0,
        };
        let report = analyze("benign_software", &metrics);
        let value = serde_json::to_value(&report).unwrap();
        let doc = value.as_object().unwrap();

        for key in [
            "sample_name",
            "threat_score",
            "threat_level",
            "confidence",
            "entropy",
            "packages",
            "controlflow",
            "string_visibility",
            "code_reuse",
            "api_suspicion",
            "attacker_profile",
            "behavioral_indicators",
            "detected_apis",
            "registry_indicators",
            "network_indicators",
            "analysis_timestamp",
        ] {
            assert!(doc.contains_key(key), "missing field {key}");
        }
        // Diagnostics stay out of the external document.
        assert!(!doc.contains_key("membership"));
    }
}
