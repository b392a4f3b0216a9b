use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiCategory {
    ProcessInjection,
    PrivilegeEscalation,
    RegistryModification,
    Persistence,
    Network,
    FileOperations,
}

impl ApiCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiCategory::ProcessInjection => "process_injection",
            ApiCategory::PrivilegeEscalation => "privilege_escalation",
            ApiCategory::RegistryModification => "registry_modification",
            ApiCategory::Persistence => "persistence",
            ApiCategory::Network => "network",
            ApiCategory::FileOperations => "file_operations",
        }
    }
}

/// Characteristic Win32 APIs per category; reports carry the first two as
/// examples.
pub fn category_apis(cat: ApiCategory) -> &'static [&'static str] {
    match cat {
        ApiCategory::ProcessInjection => &[
            "CreateRemoteThread",
            "WriteProcessMemory",
            "VirtualAllocEx",
            "SetWindowsHookEx",
        ],
        ApiCategory::PrivilegeEscalation => &[
            "CreateProcessAsUserA",
            "CreateProcessAsUserW",
            "ImpersonateLoggedOnUser",
            "DuplicateToken",
        ],
        ApiCategory::RegistryModification => &[
            "RegSetValueEx",
            "RegCreateKeyEx",
            "RegDeleteKeyEx",
            "RegSetKeyValue",
        ],
        ApiCategory::Persistence => &["SetValue", "ShellExecute", "CreateService", "ScheduleJob"],
        ApiCategory::Network => &[
            "InternetOpenA",
            "InternetOpenW",
            "InternetConnectA",
            "InternetConnectW",
            "WinHttpOpen",
        ],
        ApiCategory::FileOperations => &[
            "CreateFileA",
            "CreateFileW",
            "WriteFile",
            "DeleteFileA",
            "DeleteFileW",
        ],
    }
}

fn examples(cat: ApiCategory) -> Vec<String> {
    category_apis(cat)
        .iter()
        .take(2)
        .map(|s| (*s).to_string())
        .collect()
}

/// Predict likely API usage. Gates accumulate: a sample can unlock several
/// categories at once.
pub fn detect_api_usage(api_suspicion: f64, threat_score: f64) -> BTreeMap<ApiCategory, Vec<String>> {
    let mut detected = BTreeMap::new();

    if api_suspicion > 70.0 {
        detected.insert(ApiCategory::ProcessInjection, examples(ApiCategory::ProcessInjection));
        detected.insert(
            ApiCategory::PrivilegeEscalation,
            examples(ApiCategory::PrivilegeEscalation),
        );
    }

    if threat_score > 60.0 {
        detected.insert(
            ApiCategory::RegistryModification,
            examples(ApiCategory::RegistryModification),
        );
        detected.insert(ApiCategory::Persistence, examples(ApiCategory::Persistence));
    }

    if threat_score > 70.0 {
        detected.insert(ApiCategory::Network, examples(ApiCategory::Network));
    }

    if threat_score > 40.0 {
        detected.insert(ApiCategory::FileOperations, examples(ApiCategory::FileOperations));
    }

    detected
}

/// Human-readable behavioral indicators. Four independent ladders; within
/// a ladder only the highest matching tier fires.
pub fn detect_behavioral_indicators(
    threat_score: f64,
    entropy: f64,
    code_reuse: f64,
    api_suspicion: f64,
) -> Vec<String> {
    let mut indicators: Vec<&str> = Vec::new();

    if entropy > 7.0 {
        indicators.push("Advanced obfuscation/packing detected");
        indicators.push("Possible polymorphic/metamorphic malware");
    } else if entropy > 5.5 {
        indicators.push("Code obfuscation techniques present");
        indicators.push("Likely anti-analysis mechanisms");
    }

    if code_reuse > 0.7 {
        indicators.push("High code reuse - matches known malware patterns");
        indicators.push("Likely derivative of existing malware family");
    } else if code_reuse > 0.4 {
        indicators.push("Moderate code reuse detected");
        indicators.push("Possible known malware variant");
    }

    if api_suspicion > 80.0 {
        indicators.push("Critical API suspicion - code injection techniques");
        indicators.push("Likely process hollowing or DLL injection");
    } else if api_suspicion > 60.0 {
        indicators.push("High API suspicion - privilege escalation attempt");
        indicators.push("Suspicious system-level operations detected");
    }

    if threat_score > 85.0 {
        indicators.push("APT-level sophistication detected");
        indicators.push("Multi-stage infection chain likely");
    } else if threat_score > 70.0 {
        indicators.push("Advanced malware characteristics");
        indicators.push("Professional attack infrastructure");
    }

    indicators.into_iter().map(String::from).collect()
}

/// Registry paths the sample would plausibly touch. Below 40 nothing is
/// predicted; above that every qualifying band appends its paths, high
/// band first. The bands are independent gates, not an exclusive ladder.
pub fn predict_registry_indicators(threat_score: f64) -> Vec<String> {
    if threat_score < 40.0 {
        return Vec::new();
    }

    let mut indicators: Vec<&str> = Vec::new();

    if threat_score > 70.0 {
        indicators.push(r"HKLM\Software\Microsoft\Windows\CurrentVersion\Run");
        indicators.push(r"HKCU\Software\Microsoft\Windows\CurrentVersion\RunOnce");
        indicators.push(r"HKLM\Software\Classes\Shell\Open\Command");
    }

    if threat_score > 60.0 {
        indicators.push(r"HKCU\Software\Microsoft\Internet Explorer");
        indicators.push(r"HKLM\System\CurrentControlSet\Services");
    }

    if threat_score > 50.0 {
        indicators.push(r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer");
    }

    indicators.into_iter().map(String::from).collect()
}

/// Network indicators, same independent-gate policy with a floor at 50.
pub fn predict_network_indicators(threat_score: f64) -> Vec<String> {
    if threat_score < 50.0 {
        return Vec::new();
    }

    let mut indicators: Vec<&str> = Vec::new();

    if threat_score > 80.0 {
        indicators.push("C2 communication over HTTPS/TLS");
        indicators.push("Data exfiltration via DNS tunneling");
        indicators.push("Fast-flux network infrastructure");
    }

    if threat_score > 70.0 {
        indicators.push("Periodic beaconing to C2 server");
        indicators.push("HTTP POST to suspicious domains");
    }

    if threat_score > 60.0 {
        indicators.push("DNS requests to suspicious domains");
        indicators.push("Potential botnet activity");
    }

    indicators.into_iter().map(String::from).collect()
}
