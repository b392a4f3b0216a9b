use anyhow::{Context, Result};
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::batch::BatchReport;
use crate::report::ThreatReport;

pub fn export_json(report: &BatchReport, out: &Path) -> Result<()> {
    let s = serde_json::to_string_pretty(report)?;
    fs::write(out, s).with_context(|| format!("Writing {}", out.display()))?;
    Ok(())
}

/// Persist one analysis as `<out_dir>/<sample>_analysis.json`, creating the
/// directory on demand. The optional attacker-profile narrative is embedded
/// alongside the analysis, null when absent.
pub fn save_analysis(
    report: &ThreatReport,
    narrative: Option<&serde_json::Value>,
    out_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Creating output dir {}", out_dir.display()))?;

    let doc = json!({
        "analysis": report,
        "attacker_profile": narrative,
    });

    let out = out_dir.join(format!("{}_analysis.json", report.sample_name));
    fs::write(&out, serde_json::to_string_pretty(&doc)?)
        .with_context(|| format!("Writing {}", out.display()))?;

    Ok(out)
}

pub fn export_csv(report: &BatchReport, out: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;

    wtr.write_record([
        "name",
        "score",
        "level",
        "confidence",
        "profile",
        "entropy",
        "packages",
        "controlflow",
        "string_visibility",
        "code_reuse",
        "api_suspicion",
        "indicators",
    ])?;

    for r in &report.results {
        wtr.write_record([
            r.sample_name.clone(),
            format!("{:.2}", r.threat_score),
            r.threat_level.to_string(),
            r.confidence.clone(),
            r.attacker_profile.to_string(),
            r.metrics.entropy.to_string(),
            r.metrics.packages.to_string(),
            r.metrics.controlflow.to_string(),
            r.metrics.string_visibility.to_string(),
            r.metrics.code_reuse.to_string(),
            r.metrics.api_suspicion.to_string(),
            r.behavioral_indicators.join("|"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::report::SampleMetrics;

    fn sample_report() -> ThreatReport {
        analyze(
            "trojan_stealer",
            &SampleMetrics {
                entropy: 6.2,
                packages: 18,
                controlflow: 6.8,
                string_visibility: 0.28,
                code_reuse: 0.62,
                api_suspicion: 75.0,
            },
        )
    }

    #[test]
    fn save_analysis_creates_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");

        let path = save_analysis(&sample_report(), None, &out_dir).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "trojan_stealer_analysis.json"
        );

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["analysis"]["sample_name"], "trojan_stealer");
        assert!(doc["attacker_profile"].is_null());
    }

    #[test]
    fn save_analysis_embeds_narrative() {
        let dir = tempfile::tempdir().unwrap();
        let narrative = json!({"profile_type": "professional_attacker"});

        let path = save_analysis(&sample_report(), Some(&narrative), dir.path()).unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["attacker_profile"]["profile_type"], "professional_attacker");
    }

    #[test]
    fn csv_export_is_one_flat_row_per_result() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");

        let batch = BatchReport {
            started_utc: "start".into(),
            finished_utc: "end".into(),
            analyzed_samples: 1,
            rejected_samples: 0,
            results: vec![sample_report()],
            rejections: Vec::new(),
        };
        export_csv(&batch, &out).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("name,score,level"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("trojan_stealer,"));
        assert!(row.contains("MEDIUM"));
        assert!(row.contains("amateur_attacker"));
    }
}
