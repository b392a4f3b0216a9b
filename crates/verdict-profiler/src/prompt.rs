use crate::narrative::NarrativeRequest;

pub const SYSTEM_PROMPT: &str = "You are a cybersecurity expert specializing in malware analysis \
and threat intelligence. Reply with a single JSON object containing exactly the keys \
\"objectives\", \"methodology\" and \"defensive_measures\". Each value is a 2-3 paragraph \
analysis in plain text.";

/// One-line interpretation of the entropy reading, prepended so the model
/// anchors on the obfuscation level.
pub fn entropy_context(entropy: f64) -> &'static str {
    if entropy <= 3.5 {
        "Low entropy indicates minimal obfuscation - typical of legitimate software"
    } else if entropy <= 5.5 {
        "Medium entropy suggests compression or weak obfuscation"
    } else if entropy <= 7.0 {
        "High entropy indicates advanced obfuscation/packing techniques"
    } else {
        "Very high entropy suggests maximum obfuscation or multi-layer encryption"
    }
}

pub fn attacker_profile_prompt(req: &NarrativeRequest) -> String {
    let m = &req.metrics;
    format!(
        "{context}\n\n\
         MALWARE ANALYSIS METRICS:\n\
         - Threat Score: {score:.2}/100\n\
         - Threat Level: {level}\n\
         - Entropy: {entropy:.2}/8 (code obfuscation level)\n\
         - Imported Packages: {packages}\n\
         - Control Flow Complexity: {controlflow:.2}/10\n\
         - String Visibility: {visibility:.2} (0=hidden, 1=visible)\n\
         - Code Reuse Ratio: {reuse:.2} (0=unique, 1=known malware)\n\
         - API Suspicion: {api:.2}/100 (system API misuse)\n\n\
         Derive the attacker profile behind this sample:\n\
         - objectives: likely goals and motivations (financial theft, espionage, \
         data theft, destruction, botnet control)\n\
         - methodology: how this attacker approaches a target, likely attack \
         vectors, persistence and C2 habits\n\
         - defensive_measures: the detection, prevention and incident-response \
         measures most effective against this profile",
        context = entropy_context(m.entropy),
        score = req.threat_score,
        level = req.threat_level,
        entropy = m.entropy,
        packages = m.packages,
        controlflow = m.controlflow,
        visibility = m.string_visibility,
        reuse = m.code_reuse,
        api = m.api_suspicion,
    )
}
