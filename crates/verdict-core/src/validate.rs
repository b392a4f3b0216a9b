use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::report::SampleMetrics;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("entropy must be between 0 and 8, got {0}")]
    Entropy(f64),
    #[error("packages must be between 0 and 1000, got {0}")]
    Packages(u32),
    #[error("control flow must be between 0 and 10, got {0}")]
    ControlFlow(f64),
    #[error("string visibility must be between 0 and 1, got {0}")]
    StringVisibility(f64),
    #[error("code reuse must be between 0 and 1, got {0}")]
    CodeReuse(f64),
    #[error("API suspicion must be between 0 and 100, got {0}")]
    ApiSuspicion(f64),
    #[error("sample name is invalid: {0:?}")]
    SampleName(String),
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("sample name pattern"))
}

/// Check every field and report the full violation list; a sample with any
/// violation is never scored. NaN fails the range checks like any other
/// out-of-range value.
pub fn validate_sample(name: &str, m: &SampleMetrics) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    if !(0.0..=8.0).contains(&m.entropy) {
        violations.push(Violation::Entropy(m.entropy));
    }
    if m.packages > 1000 {
        violations.push(Violation::Packages(m.packages));
    }
    if !(0.0..=10.0).contains(&m.controlflow) {
        violations.push(Violation::ControlFlow(m.controlflow));
    }
    if !(0.0..=1.0).contains(&m.string_visibility) {
        violations.push(Violation::StringVisibility(m.string_visibility));
    }
    if !(0.0..=1.0).contains(&m.code_reuse) {
        violations.push(Violation::CodeReuse(m.code_reuse));
    }
    if !(0.0..=100.0).contains(&m.api_suspicion) {
        violations.push(Violation::ApiSuspicion(m.api_suspicion));
    }
    if !name_pattern().is_match(name) {
        violations.push(Violation::SampleName(name.to_string()));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
