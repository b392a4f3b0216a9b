use serde::{Deserialize, Serialize};

use crate::fuzzy::membership::triangular;

/// Low/Medium/High membership degrees for one metric.
///
/// The underlying sets overlap, so a value can belong to two adjacent
/// levels at once; degrees are not required to sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDegrees {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Few/Moderate/Many membership degrees for the import-package count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageLevels {
    pub few: f64,
    pub moderate: f64,
    pub many: f64,
}

/// Simple/Moderate/Complex membership degrees for control-flow complexity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlFlowLevels {
    pub simple: f64,
    pub moderate: f64,
    pub complex: f64,
}

/// Shannon entropy, 0-8. High entropy reads as packing or obfuscation.
pub fn entropy_levels(e: f64) -> LevelDegrees {
    LevelDegrees {
        low: triangular(e, 0.0, 1.5, 3.5),
        medium: triangular(e, 2.5, 4.5, 6.5),
        high: triangular(e, 5.5, 7.0, 8.0),
    }
}

/// Import-package count. Counts past the "Many" shoulder (> 40) simply
/// fall out of every set; that saturation is accepted behavior.
pub fn package_levels(p: f64) -> PackageLevels {
    PackageLevels {
        few: triangular(p, 0.0, 2.0, 5.0),
        moderate: triangular(p, 3.0, 9.0, 15.0),
        many: triangular(p, 12.0, 25.0, 40.0),
    }
}

/// Control-flow complexity, 0-10.
pub fn controlflow_levels(c: f64) -> ControlFlowLevels {
    ControlFlowLevels {
        simple: triangular(c, 0.0, 1.0, 2.5),
        moderate: triangular(c, 1.5, 4.0, 6.5),
        complex: triangular(c, 5.5, 8.0, 10.0),
    }
}

/// Visible-string ratio, 0-1. Low visibility reads as string obfuscation.
pub fn string_visibility_levels(v: f64) -> LevelDegrees {
    LevelDegrees {
        low: triangular(v, 0.0, 0.1, 0.3),
        medium: triangular(v, 0.2, 0.5, 0.8),
        high: triangular(v, 0.6, 0.85, 1.0),
    }
}

/// Code-reuse ratio against known malware corpora, 0-1.
pub fn code_reuse_levels(r: f64) -> LevelDegrees {
    LevelDegrees {
        low: triangular(r, 0.0, 0.1, 0.25),
        medium: triangular(r, 0.15, 0.4, 0.65),
        high: triangular(r, 0.5, 0.8, 1.0),
    }
}

/// API-suspicion score, 0-100.
pub fn api_suspicion_levels(a: f64) -> LevelDegrees {
    LevelDegrees {
        low: triangular(a, 0.0, 15.0, 35.0),
        medium: triangular(a, 25.0, 50.0, 75.0),
        high: triangular(a, 60.0, 85.0, 100.0),
    }
}
