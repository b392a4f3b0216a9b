use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

use verdict_core::{
    analyzer::analyze,
    batch::{analyze_csv, BatchOptions},
    classify::ThreatLevel,
    export, profile,
    report::{SampleMetrics, ThreatReport},
    validate::validate_sample,
};
use verdict_profiler::narrative::{generate_narrative, source_from_credentials, NarrativeRequest};

#[derive(Parser)]
#[command(
    name = "verdict",
    version,
    about = "VERDICT - Fuzzy-logic threat scoring and attacker profiling for binary metrics"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one sample from its static-analysis metrics
    Analyze {
        /// Sample identifier (alphanumerics, dot, underscore, hyphen)
        #[arg(long, default_value = "sample")]
        sample: String,

        /// Shannon entropy, 0-8
        #[arg(long)]
        entropy: f64,

        /// Imported package count, 0-1000
        #[arg(long)]
        packages: u32,

        /// Control-flow complexity, 0-10
        #[arg(long)]
        controlflow: f64,

        /// Visible-string ratio, 0-1
        #[arg(long)]
        string_visibility: f64,

        /// Code-reuse ratio, 0-1
        #[arg(long, default_value_t = 0.0)]
        code_reuse: f64,

        /// API suspicion score, 0-100
        #[arg(long, default_value_t = 0.0)]
        api_suspicion: f64,

        #[arg(long, value_enum, default_value = "console")]
        output: OutputArg,

        /// Also generate an attacker-profile narrative
        #[arg(long)]
        profile: bool,

        /// API key for remote narrative generation (falls back to OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },

    /// Score the built-in reference samples
    Demo {
        #[arg(long, value_enum, default_value = "console")]
        output: OutputArg,

        #[arg(long)]
        profile: bool,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },

    /// Score a CSV dataset in parallel
    Batch {
        /// Dataset path (name,entropy,packages,controlflow,string_visibility,code_reuse,api_suspicion)
        #[arg(long)]
        csv: PathBuf,

        #[arg(long, default_value_t = 8)]
        threads: usize,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<usize>,

        /// Write a flat results CSV here
        #[arg(long)]
        out_csv: Option<PathBuf>,

        /// Write the full JSON batch report here
        #[arg(long)]
        out_json: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputArg {
    Console,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Analyze {
            sample,
            entropy,
            packages,
            controlflow,
            string_visibility,
            code_reuse,
            api_suspicion,
            output,
            profile,
            api_key,
            out_dir,
        } => {
            let metrics = SampleMetrics {
                entropy,
                packages,
                controlflow,
                string_visibility,
                code_reuse,
                api_suspicion,
            };
            run_sample(&sample, &metrics, output, profile, api_key.as_deref(), &out_dir)?;
        }

        Commands::Demo {
            output,
            profile,
            api_key,
            out_dir,
        } => {
            for (name, metrics) in demo_samples() {
                run_sample(name, &metrics, output, profile, api_key.as_deref(), &out_dir)?;
                println!("{}", "-".repeat(72));
            }
        }

        Commands::Batch {
            csv,
            threads,
            limit,
            out_csv,
            out_json,
        } => {
            run_batch(csv, threads, limit, out_csv, out_json)?;
        }
    }

    Ok(())
}

fn run_sample(
    name: &str,
    metrics: &SampleMetrics,
    output: OutputArg,
    want_profile: bool,
    api_key: Option<&str>,
    out_dir: &std::path::Path,
) -> Result<()> {
    if let Err(violations) = validate_sample(name, metrics) {
        eprintln!("Validation errors for {name}:");
        for v in &violations {
            eprintln!("  - {v}");
        }
        anyhow::bail!("{} validation error(s), sample not scored", violations.len());
    }

    let report = analyze(name, metrics);

    let narrative = if want_profile {
        let source = source_from_credentials(api_key.map(String::from));
        Some(generate_narrative(
            &NarrativeRequest::from_report(&report),
            source.as_ref(),
        ))
    } else {
        None
    };

    match output {
        OutputArg::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(n) = &narrative {
                println!("{}", serde_json::to_string_pretty(n)?);
            }
        }
        OutputArg::Console => {
            print_report(&report);
            if let Some(n) = &narrative {
                print_narrative(n);
            }
        }
    }

    let narrative_value = narrative.map(|n| serde_json::to_value(&n)).transpose()?;
    let path = export::save_analysis(&report, narrative_value.as_ref(), out_dir)?;
    println!("Saved: {}", path.display());

    Ok(())
}

fn demo_samples() -> Vec<(&'static str, SampleMetrics)> {
    vec![
        (
            "ransomware_variant",
            SampleMetrics {
                entropy: 7.6,
                packages: 22,
                controlflow: 8.5,
                string_visibility: 0.12,
                code_reuse: 0.85,
                api_suspicion: 92.0,
            },
        ),
        (
            "trojan_stealer",
            SampleMetrics {
                entropy: 6.2,
                packages: 18,
                controlflow: 6.8,
                string_visibility: 0.28,
                code_reuse: 0.62,
                api_suspicion: 75.0,
            },
        ),
        (
            "benign_software",
            SampleMetrics {
                entropy: 2.5,
                packages: 5,
                controlflow: 1.8,
                string_visibility: 0.89,
                code_reuse: 0.05,
                api_suspicion: 10.0,
            },
        ),
    ]
}

fn print_report(report: &ThreatReport) {
    let m = &report.metrics;

    println!("VERDICT analysis: {}", report.sample_name);
    println!("Analyzed: {}", report.analysis_timestamp);
    println!();
    println!("Metrics:");
    println!("  entropy:             {:.2} / 8", m.entropy);
    println!("  packages:            {}", m.packages);
    println!("  control flow:        {:.2} / 10", m.controlflow);
    println!("  string visibility:   {:.2}", m.string_visibility);
    println!("  code reuse:          {:.2}", m.code_reuse);
    println!("  API suspicion:       {:.2} / 100", m.api_suspicion);
    println!();
    println!(
        "Assessment: [{}] score {:.2}  confidence {}",
        report.threat_level, report.threat_score, report.confidence
    );
    println!("  {}", report.threat_level.description());

    let desc = profile::descriptor(report.attacker_profile);
    println!();
    println!(
        "Attacker profile: {} (typical entropy {:.1}-{:.1})",
        report.attacker_profile.label(),
        desc.entropy_range.0,
        desc.entropy_range.1
    );
    println!(
        "  sophistication: {}",
        profile::sophistication_level(report.threat_score)
    );
    for c in desc.characteristics {
        println!("  - {c}");
    }
    println!("  techniques: {}", desc.techniques.join(", "));

    if !report.behavioral_indicators.is_empty() {
        println!();
        println!("Behavioral indicators:");
        for i in &report.behavioral_indicators {
            println!("  - {i}");
        }
    }

    if !report.detected_apis.is_empty() {
        println!();
        println!("Likely API usage:");
        for (category, apis) in &report.detected_apis {
            println!("  {}: {}", category.as_str(), apis.join(", "));
        }
    }

    if !report.registry_indicators.is_empty() {
        println!();
        println!("Registry indicators:");
        for r in &report.registry_indicators {
            println!("  - {r}");
        }
    }

    if !report.network_indicators.is_empty() {
        println!();
        println!("Network indicators:");
        for n in &report.network_indicators {
            println!("  - {n}");
        }
    }

    println!();
    print_recommended_actions(report.threat_score);
}

fn print_recommended_actions(score: f64) {
    println!("Recommended actions:");
    if score >= 85.0 {
        println!("  CRITICAL: immediate incident response required");
        println!("  1. Isolate affected systems immediately");
        println!("  2. Engage incident response team");
        println!("  3. Begin forensic investigation");
        println!("  4. Contact threat intelligence services");
    } else if score >= 70.0 {
        println!("  HIGH: urgent containment needed");
        println!("  1. Isolate affected systems");
        println!("  2. Block network traffic to known IOCs");
        println!("  3. Begin forensic analysis");
        println!("  4. Monitor for lateral movement");
    } else if score >= 40.0 {
        println!("  MEDIUM: enhanced monitoring recommended");
        println!("  1. Monitor system behavior");
        println!("  2. Review system logs");
        println!("  3. Check for signs of compromise");
        println!("  4. Prepare isolation procedures");
    } else {
        println!("  LOW: standard security practices sufficient");
        println!("  1. Maintain regular monitoring");
        println!("  2. Keep systems patched");
        println!("  3. Follow standard procedures");
    }
}

fn print_narrative(narrative: &verdict_profiler::narrative::AttackerNarrative) {
    println!();
    println!("Attacker narrative ({})", narrative.profile_type.label());
    println!("  sophistication: {}", narrative.sophistication);
    println!();
    println!("Objectives:");
    println!("  {}", narrative.objectives);
    println!();
    println!("Methodology:");
    println!("  {}", narrative.methodology);
    println!();
    println!("Defensive measures:");
    println!("  {}", narrative.defensive_measures);
}

fn run_batch(
    csv: PathBuf,
    threads: usize,
    limit: Option<usize>,
    out_csv: Option<PathBuf>,
    out_json: Option<PathBuf>,
) -> Result<()> {
    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} samples ({eta})",
    )?);

    let pb = bar.clone();
    let progress: Arc<dyn Fn(u64, u64) + Send + Sync> = Arc::new(move |done, total| {
        pb.set_length(total);
        pb.set_position(done);
    });

    let report = analyze_csv(BatchOptions {
        input: csv,
        threads,
        limit,
        progress: Some(progress),
    })?;
    bar.finish_and_clear();

    println!("VERDICT batch report");
    println!("Started:  {}", report.started_utc);
    println!("Finished: {}", report.finished_utc);
    println!("Analyzed samples: {}", report.analyzed_samples);
    println!("Rejected samples: {}", report.rejected_samples);

    for level in [
        ThreatLevel::Critical,
        ThreatLevel::High,
        ThreatLevel::Medium,
        ThreatLevel::Low,
    ] {
        let count = report
            .results
            .iter()
            .filter(|r| r.threat_level == level)
            .count();
        println!("  {level}: {count}");
    }

    if !report.rejections.is_empty() {
        println!();
        println!("Rejected rows:");
        for rejection in &report.rejections {
            println!("  {}:", rejection.name);
            for v in &rejection.violations {
                println!("    - {v}");
            }
        }
    }

    if let Some(path) = out_csv {
        export::export_csv(&report, &path)?;
        println!("Results CSV: {}", path.display());
    }

    if let Some(path) = out_json {
        export::export_json(&report, &path)?;
        println!("JSON report: {}", path.display());
    }

    Ok(())
}
