use serde::{Deserialize, Serialize};
use std::fmt;

// Band floors, inclusive. Checked in descending order.
pub const CRITICAL_FLOOR: f64 = 85.0;
pub const HIGH_FLOOR: f64 = 70.0;
pub const MEDIUM_FLOOR: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl ThreatLevel {
    pub fn description(self) -> &'static str {
        match self {
            ThreatLevel::Critical => "Advanced Persistent Threat (APT) / Ransomware",
            ThreatLevel::High => "Advanced Malware / Trojan",
            ThreatLevel::Medium => "Commodity Malware",
            ThreatLevel::Low => "Benign / Simple / Suspicious Activity",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThreatLevel::Critical => "CRITICAL",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(score: f64) -> ThreatLevel {
    if score >= CRITICAL_FLOOR {
        ThreatLevel::Critical
    } else if score >= HIGH_FLOOR {
        ThreatLevel::High
    } else if score >= MEDIUM_FLOOR {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

/// Qualitative confidence in the classification. Scores near either end of
/// the scale are the most decisive; the two branches are checked in this
/// exact order, so 50 lands on "Medium" while 65 takes the High branch.
pub fn confidence_level(score: f64) -> &'static str {
    if score >= 80.0 || score <= 20.0 {
        "Very High"
    } else if score >= 60.0 || score <= 40.0 {
        "High"
    } else {
        "Medium"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_floors_are_inclusive() {
        assert_eq!(classify(84.999), ThreatLevel::High);
        assert_eq!(classify(85.0), ThreatLevel::Critical);
        assert_eq!(classify(69.999), ThreatLevel::Medium);
        assert_eq!(classify(70.0), ThreatLevel::High);
        assert_eq!(classify(39.999), ThreatLevel::Low);
        assert_eq!(classify(40.0), ThreatLevel::Medium);
        assert_eq!(classify(0.0), ThreatLevel::Low);
        assert_eq!(classify(100.0), ThreatLevel::Critical);
    }

    #[test]
    fn confidence_branch_order() {
        assert_eq!(confidence_level(85.0), "Very High");
        assert_eq!(confidence_level(10.0), "Very High");
        assert_eq!(confidence_level(20.0), "Very High");
        assert_eq!(confidence_level(65.0), "High");
        assert_eq!(confidence_level(30.0), "High");
        assert_eq!(confidence_level(40.0), "High");
        assert_eq!(confidence_level(50.0), "Medium");
        assert_eq!(confidence_level(55.0), "Medium");
    }

    #[test]
    fn level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ThreatLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );
        let parsed: ThreatLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, ThreatLevel::Medium);
    }
}
