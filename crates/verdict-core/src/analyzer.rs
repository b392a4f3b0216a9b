use crate::behavior;
use crate::classify;
use crate::fuzzy::inference;
use crate::profile;
use crate::report::{SampleMetrics, ThreatReport};

/// Run the full pipeline over one validated metric vector: fuzzy inference,
/// classification, behavioral derivations, attacker profiling.
///
/// Stateless and free of shared mutable state; safe to call concurrently
/// across samples.
pub fn analyze(sample_name: &str, metrics: &SampleMetrics) -> ThreatReport {
    let eval = inference::evaluate_threat(metrics);
    let threat_level = classify::classify(eval.score);
    let confidence = classify::confidence_level(eval.score).to_string();

    let behavioral_indicators = behavior::detect_behavioral_indicators(
        eval.score,
        metrics.entropy,
        metrics.code_reuse,
        metrics.api_suspicion,
    );
    let detected_apis = behavior::detect_api_usage(metrics.api_suspicion, eval.score);
    let registry_indicators = behavior::predict_registry_indicators(eval.score);
    let network_indicators = behavior::predict_network_indicators(eval.score);

    let attacker_profile = profile::profile_attacker(
        metrics.entropy,
        eval.score,
        metrics.code_reuse,
        metrics.api_suspicion,
    );

    ThreatReport {
        sample_name: sample_name.to_string(),
        threat_score: eval.score,
        threat_level,
        confidence,
        metrics: *metrics,
        attacker_profile,
        behavioral_indicators,
        detected_apis,
        registry_indicators,
        network_indicators,
        membership: eval.details,
        analysis_timestamp: now_utc(),
    }
}

pub(crate) fn now_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
