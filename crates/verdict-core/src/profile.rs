use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackerKind {
    AptActor,
    ProfessionalAttacker,
    AmateurAttacker,
    ScriptKiddie,
}

impl AttackerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttackerKind::AptActor => "apt_actor",
            AttackerKind::ProfessionalAttacker => "professional_attacker",
            AttackerKind::AmateurAttacker => "amateur_attacker",
            AttackerKind::ScriptKiddie => "script_kiddie",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttackerKind::AptActor => "APT Actor",
            AttackerKind::ProfessionalAttacker => "Professional Attacker",
            AttackerKind::AmateurAttacker => "Amateur Attacker",
            AttackerKind::ScriptKiddie => "Script Kiddie",
        }
    }
}

impl fmt::Display for AttackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static skill-tier descriptor for display. Never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileDescriptor {
    pub entropy_range: (f64, f64),
    pub characteristics: &'static [&'static str],
    pub techniques: &'static [&'static str],
}

pub fn descriptor(kind: AttackerKind) -> &'static ProfileDescriptor {
    match kind {
        AttackerKind::ScriptKiddie => &ProfileDescriptor {
            entropy_range: (0.0, 3.5),
            characteristics: &[
                "Uses publicly available tools",
                "Minimal obfuscation",
                "Simple malware variants",
                "Low code complexity",
            ],
            techniques: &["WinExec", "basic_shell_commands", "simple_injection"],
        },
        AttackerKind::AmateurAttacker => &ProfileDescriptor {
            entropy_range: (3.5, 5.5),
            characteristics: &[
                "Basic obfuscation techniques",
                "Moderate code complexity",
                "Uses some custom tools",
                "Basic anti-analysis",
            ],
            techniques: &["UPX_packing", "simple_encryption", "basic_api_hooking"],
        },
        AttackerKind::ProfessionalAttacker => &ProfileDescriptor {
            entropy_range: (5.5, 7.0),
            characteristics: &[
                "Advanced obfuscation",
                "Complex control flow",
                "Custom payloads",
                "Strong anti-analysis",
            ],
            techniques: &[
                "polymorphism",
                "metamorphism",
                "code_virtualization",
                "anti_debugging",
            ],
        },
        AttackerKind::AptActor => &ProfileDescriptor {
            entropy_range: (7.0, 8.0),
            characteristics: &[
                "Maximum obfuscation",
                "Highly sophisticated techniques",
                "Zero-day exploits",
                "Multi-stage infection",
                "Advanced evasion",
            ],
            techniques: &[
                "advanced_packing",
                "multi_layer_encryption",
                "anti_forensics",
                "privilege_escalation",
            ],
        },
    }
}

/// Ordered decision list, first match wins.
pub fn profile_attacker(
    entropy: f64,
    threat_score: f64,
    code_reuse: f64,
    api_suspicion: f64,
) -> AttackerKind {
    if threat_score > 80.0 && entropy > 6.5 && api_suspicion > 70.0 {
        return AttackerKind::AptActor;
    }

    if threat_score > 65.0 && entropy > 5.0 && (api_suspicion > 60.0 || code_reuse > 0.5) {
        return AttackerKind::ProfessionalAttacker;
    }

    if threat_score > 40.0 && entropy > 3.0 {
        return AttackerKind::AmateurAttacker;
    }

    AttackerKind::ScriptKiddie
}

pub fn sophistication_level(threat_score: f64) -> &'static str {
    if threat_score > 85.0 {
        "Critical - APT/Ransomware Level"
    } else if threat_score > 70.0 {
        "Advanced - Professional Cybercriminals"
    } else if threat_score > 50.0 {
        "Intermediate - Organized Groups"
    } else if threat_score > 30.0 {
        "Basic - Script Kiddies / Variants"
    } else {
        "Minimal - Benign or Simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_list_first_match_wins() {
        assert_eq!(profile_attacker(7.0, 85.0, 0.9, 75.0), AttackerKind::AptActor);
        assert_eq!(
            profile_attacker(6.0, 70.0, 0.6, 50.0),
            AttackerKind::ProfessionalAttacker
        );
        assert_eq!(
            profile_attacker(4.0, 50.0, 0.1, 20.0),
            AttackerKind::AmateurAttacker
        );
        assert_eq!(profile_attacker(2.0, 13.7, 0.05, 10.0), AttackerKind::ScriptKiddie);
    }

    #[test]
    fn apt_gate_falls_through_on_weak_api_signal() {
        // Score and entropy qualify for APT but api_suspicion does not;
        // the professional branch then fails its OR clause too.
        assert_eq!(
            profile_attacker(7.0, 85.0, 0.2, 60.0),
            AttackerKind::AmateurAttacker
        );
    }

    #[test]
    fn high_score_low_entropy_is_not_professional() {
        assert_eq!(
            profile_attacker(4.5, 90.0, 0.9, 95.0),
            AttackerKind::AmateurAttacker
        );
    }

    #[test]
    fn descriptors_cover_the_entropy_scale() {
        let kinds = [
            AttackerKind::ScriptKiddie,
            AttackerKind::AmateurAttacker,
            AttackerKind::ProfessionalAttacker,
            AttackerKind::AptActor,
        ];
        let mut upper = 0.0;
        for kind in kinds {
            let d = descriptor(kind);
            assert_eq!(d.entropy_range.0, upper);
            assert!(!d.characteristics.is_empty());
            assert!(!d.techniques.is_empty());
            upper = d.entropy_range.1;
        }
        assert_eq!(upper, 8.0);
    }

    #[test]
    fn sophistication_thresholds() {
        assert_eq!(sophistication_level(90.0), "Critical - APT/Ransomware Level");
        assert_eq!(
            sophistication_level(75.0),
            "Advanced - Professional Cybercriminals"
        );
        assert_eq!(sophistication_level(60.0), "Intermediate - Organized Groups");
        assert_eq!(sophistication_level(35.0), "Basic - Script Kiddies / Variants");
        assert_eq!(sophistication_level(10.0), "Minimal - Benign or Simple");
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttackerKind::AptActor).unwrap(),
            "\"apt_actor\""
        );
        let parsed: AttackerKind = serde_json::from_str("\"script_kiddie\"").unwrap();
        assert_eq!(parsed, AttackerKind::ScriptKiddie);
    }
}
