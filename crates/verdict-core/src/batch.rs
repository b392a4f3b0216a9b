use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::analyzer::{analyze, now_utc};
use crate::report::{SampleMetrics, ThreatReport};
use crate::validate::validate_sample;

/// One row of a sample dataset CSV:
/// `name,entropy,packages,controlflow,string_visibility,code_reuse,api_suspicion[,description]`
#[derive(Debug, Clone, Deserialize)]
pub struct SampleRecord {
    pub name: String,
    pub entropy: f64,
    pub packages: u32,
    pub controlflow: f64,
    pub string_visibility: f64,
    pub code_reuse: f64,
    pub api_suspicion: f64,
    #[serde(default)]
    pub description: String,
}

impl SampleRecord {
    pub fn metrics(&self) -> SampleMetrics {
        SampleMetrics {
            entropy: self.entropy,
            packages: self.packages,
            controlflow: self.controlflow,
            string_visibility: self.string_visibility,
            code_reuse: self.code_reuse,
            api_suspicion: self.api_suspicion,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleRejection {
    pub name: String,
    pub violations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub started_utc: String,
    pub finished_utc: String,
    pub analyzed_samples: u64,
    pub rejected_samples: u64,
    pub results: Vec<ThreatReport>,
    pub rejections: Vec<SampleRejection>,
}

pub struct BatchOptions {
    pub input: PathBuf,
    pub threads: usize,
    pub limit: Option<usize>,
    pub progress: Option<Arc<dyn Fn(u64, u64) + Send + Sync>>,
}

/// Stream a dataset CSV row by row, validate each sample, and score the
/// valid ones on a rayon pool. Invalid rows are collected with their full
/// violation lists instead of aborting the batch.
pub fn analyze_csv(opts: BatchOptions) -> Result<BatchReport> {
    let started = now_utc();

    let mut reader = csv::Reader::from_path(&opts.input)
        .with_context(|| format!("Opening dataset {}", opts.input.display()))?;

    let mut records: Vec<SampleRecord> = Vec::new();
    for row in reader.deserialize() {
        if opts.limit.is_some_and(|limit| records.len() >= limit) {
            break;
        }
        let record: SampleRecord = row.context("Malformed dataset row")?;
        records.push(record);
    }

    let total = records.len() as u64;
    let done = Arc::new(AtomicU64::new(0));
    let rejected = Arc::new(AtomicU64::new(0));

    if let Some(cb) = &opts.progress {
        cb(0, total);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .build()?;

    let outcomes: Vec<Result<ThreatReport, SampleRejection>> = pool.install(|| {
        records
            .par_iter()
            .map(|rec| {
                let metrics = rec.metrics();
                let outcome = match validate_sample(&rec.name, &metrics) {
                    Ok(()) => Ok(analyze(&rec.name, &metrics)),
                    Err(violations) => {
                        rejected.fetch_add(1, Ordering::Relaxed);
                        Err(SampleRejection {
                            name: rec.name.clone(),
                            violations: violations.iter().map(|v| v.to_string()).collect(),
                        })
                    }
                };

                let d = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = &opts.progress {
                    cb(d, total);
                }

                outcome
            })
            .collect()
    });

    let mut results = Vec::new();
    let mut rejections = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(report) => results.push(report),
            Err(rejection) => rejections.push(rejection),
        }
    }

    let finished = now_utc();

    Ok(BatchReport {
        started_utc: started,
        finished_utc: finished,
        analyzed_samples: results.len() as u64,
        rejected_samples: rejected.load(Ordering::Relaxed),
        results,
        rejections,
    })
}
