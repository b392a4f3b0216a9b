use anyhow::Result;
use serde::{Deserialize, Serialize};

use verdict_core::classify::ThreatLevel;
use verdict_core::profile::{self, AttackerKind};
use verdict_core::report::{SampleMetrics, ThreatReport};

use crate::local::{self, LocalHeuristics};
use crate::openai::{OpenAiConfig, OpenAiSource};

/// What the narrative boundary is allowed to see: the six metrics plus the
/// crisp score and level. The derived indicator lists stay on the core side.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeRequest {
    pub threat_score: f64,
    pub threat_level: ThreatLevel,
    pub metrics: SampleMetrics,
}

impl NarrativeRequest {
    pub fn from_report(report: &ThreatReport) -> Self {
        Self {
            threat_score: report.threat_score,
            threat_level: report.threat_level,
            metrics: report.metrics,
        }
    }
}

/// The three free-text sections of an attacker-profile narrative, generated
/// as separately named fields rather than sliced out of one blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSections {
    pub objectives: String,
    pub methodology: String,
    pub defensive_measures: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerNarrative {
    pub profile_type: AttackerKind,
    pub threat_score: f64,
    pub sophistication: String,
    pub objectives: String,
    pub methodology: String,
    pub defensive_measures: String,
}

/// A source of narrative text. Two implementations exist: the remote
/// chat-completion call and the deterministic local heuristics.
pub trait NarrativeSource {
    fn narrate(&self, req: &NarrativeRequest) -> Result<NarrativeSections>;
}

/// Pick the narrative source from credential presence: an API key (flag or
/// `OPENAI_API_KEY`) selects the remote model, otherwise local heuristics.
pub fn source_from_credentials(api_key: Option<String>) -> Box<dyn NarrativeSource> {
    match OpenAiConfig::from_credentials(api_key) {
        Some(config) => {
            log::info!("attacker narrative source: remote model {}", config.model);
            Box::new(OpenAiSource::new(config))
        }
        None => {
            log::info!("attacker narrative source: local heuristics (no API key)");
            Box::new(LocalHeuristics)
        }
    }
}

/// Build the attacker narrative. The source gets a single attempt; any
/// failure degrades to the local heuristics with the same result shape and
/// never touches the threat score.
pub fn generate_narrative(req: &NarrativeRequest, source: &dyn NarrativeSource) -> AttackerNarrative {
    let kind = profile::profile_attacker(
        req.metrics.entropy,
        req.threat_score,
        req.metrics.code_reuse,
        req.metrics.api_suspicion,
    );

    let sections = source.narrate(req).unwrap_or_else(|err| {
        log::warn!("narrative generation failed ({err:#}); using local fallback");
        local::sections(kind, req)
    });

    AttackerNarrative {
        profile_type: kind,
        threat_score: req.threat_score,
        sophistication: profile::sophistication_level(req.threat_score).to_string(),
        objectives: sections.objectives,
        methodology: sections.methodology,
        defensive_measures: sections.defensive_measures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FailingSource;

    impl NarrativeSource for FailingSource {
        fn narrate(&self, _req: &NarrativeRequest) -> Result<NarrativeSections> {
            Err(anyhow!("connection refused"))
        }
    }

    fn request() -> NarrativeRequest {
        NarrativeRequest {
            threat_score: 44.9,
            threat_level: ThreatLevel::Medium,
            metrics: SampleMetrics {
                entropy: 6.2,
                packages: 18,
                controlflow: 6.8,
                string_visibility: 0.28,
                code_reuse: 0.62,
                api_suspicion: 75.0,
            },
        }
    }

    #[test]
    fn failed_source_degrades_to_local_text() {
        let req = request();
        let degraded = generate_narrative(&req, &FailingSource);
        let local = generate_narrative(&req, &LocalHeuristics);
        assert_eq!(degraded, local);
    }

    #[test]
    fn narrative_carries_score_and_profile() {
        let req = request();
        let narrative = generate_narrative(&req, &LocalHeuristics);
        assert_eq!(narrative.threat_score, 44.9);
        assert_eq!(narrative.profile_type, AttackerKind::AmateurAttacker);
        assert_eq!(narrative.sophistication, "Basic - Script Kiddies / Variants");
        assert!(!narrative.objectives.is_empty());
        assert!(!narrative.methodology.is_empty());
        assert!(!narrative.defensive_measures.is_empty());
    }

    #[test]
    fn narrative_round_trips_as_json() {
        let narrative = generate_narrative(&request(), &LocalHeuristics);
        let json = serde_json::to_string(&narrative).unwrap();
        let parsed: AttackerNarrative = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, narrative);
    }
}
