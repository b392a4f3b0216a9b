use anyhow::Result;

use verdict_core::profile::{self, AttackerKind};

use crate::narrative::{NarrativeRequest, NarrativeSections, NarrativeSource};

/// Deterministic narrative fallback. No network, no credentials; the text
/// is fixed per skill tier so degraded runs stay reproducible.
pub struct LocalHeuristics;

impl NarrativeSource for LocalHeuristics {
    fn narrate(&self, req: &NarrativeRequest) -> Result<NarrativeSections> {
        let kind = profile::profile_attacker(
            req.metrics.entropy,
            req.threat_score,
            req.metrics.code_reuse,
            req.metrics.api_suspicion,
        );
        Ok(sections(kind, req))
    }
}

pub fn sections(kind: AttackerKind, req: &NarrativeRequest) -> NarrativeSections {
    NarrativeSections {
        objectives: objectives(kind).to_string(),
        methodology: methodology(kind, req.metrics.entropy),
        defensive_measures: defensive_measures(kind).to_string(),
    }
}

fn objectives(kind: AttackerKind) -> &'static str {
    match kind {
        AttackerKind::AptActor => {
            "Nation-state level objectives: cyber espionage, critical infrastructure \
             disruption, long-term persistence."
        }
        AttackerKind::ProfessionalAttacker => {
            "Financial gain through data theft, ransomware and credential harvesting. \
             Multi-stage attacks."
        }
        AttackerKind::AmateurAttacker => {
            "Learning-based attacks, simple financial theft, attention-seeking. \
             Limited operational security."
        }
        AttackerKind::ScriptKiddie => {
            "Casual attacks using pre-made tools, learning programming, minor vandalism."
        }
    }
}

fn methodology(kind: AttackerKind, entropy: f64) -> String {
    match kind {
        AttackerKind::AptActor => format!(
            "Multi-stage attacks with custom malware, zero-day exploits and supply \
             chain compromise. Entropy level {entropy:.2} indicates advanced obfuscation."
        ),
        AttackerKind::ProfessionalAttacker => format!(
            "Spear-phishing, credential theft and lateral movement. Moderate \
             obfuscation (entropy {entropy:.2})."
        ),
        AttackerKind::AmateurAttacker => {
            "Mass malware distribution, dictionary attacks, exploit kits.".to_string()
        }
        AttackerKind::ScriptKiddie => {
            "Reuse of existing tools without modification, basic social engineering.".to_string()
        }
    }
}

fn defensive_measures(kind: AttackerKind) -> &'static str {
    match kind {
        AttackerKind::AptActor => {
            "Advanced EDR, threat hunting, incident response team, threat intelligence \
             sharing. Assume-breach mentality."
        }
        AttackerKind::ProfessionalAttacker => {
            "Multi-factor authentication, network segmentation, behavior-based \
             detection, employee training."
        }
        AttackerKind::AmateurAttacker => {
            "Standard antivirus, regular patching, basic firewall rules, user awareness."
        }
        AttackerKind::ScriptKiddie => "Basic antivirus, regular updates, simple security hygiene.",
    }
}
