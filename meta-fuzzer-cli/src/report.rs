//! Report generation
//!
//! Renders the registry inspection and fuzzing results as text or JSON.

use crate::check::Violation;
use anyhow::Result;
use chrono::{DateTime, Utc};
use meta_fuzzer::{FuncReport, ObjectMeta};
use serde::Serialize;
use std::fmt::Write;

/// Maximum number of individual violations kept in a report
const MAX_LISTED_VIOLATIONS: usize = 20;

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub scheme: String,
    /// Registry index of the upstream ObjectMeta fuzzer function
    pub default_object_meta_index: Option<usize>,
    /// Whether `funcs` came from the safe combination
    pub safe: bool,
    pub funcs: Vec<FuncReport>,
    pub run: RunSummary,
}

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub iterations: usize,
    pub failed_records: usize,
    pub violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<ObjectMeta>,
}

impl RunSummary {
    /// Account for one generated record and its violations
    pub fn record(&mut self, meta: &ObjectMeta, violations: Vec<Violation>) {
        self.iterations += 1;
        if self.sample.is_none() {
            self.sample = Some(meta.clone());
        }
        if violations.is_empty() {
            return;
        }
        self.failed_records += 1;
        for violation in violations {
            if self.violations.len() < MAX_LISTED_VIOLATIONS {
                self.violations
                    .push(format!("record {}: {}", self.iterations - 1, violation));
            }
        }
    }

    pub fn passed(&self) -> bool {
        self.failed_records == 0
    }
}

/// Render the report as pretty-printed JSON
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the report as human-readable text
pub fn render_text(report: &Report) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "═══════════════════════════════════════════════")?;
    writeln!(out, "  Metadata Fuzzer Functions")?;
    writeln!(out, "═══════════════════════════════════════════════\n")?;

    writeln!(out, "Scheme: {}", report.scheme)?;
    match report.default_object_meta_index {
        Some(idx) => writeln!(out, "Default ObjectMeta fuzzer at index {}", idx)?,
        None => writeln!(out, "No default ObjectMeta fuzzer registered")?,
    }

    let title = if report.safe { "Safe" } else { "Merged" };
    writeln!(out, "\n{} functions ({}):", title, report.funcs.len())?;
    writeln!(out, "───────────────────────────────────────────────")?;
    for func in &report.funcs {
        write!(out, "{}", func)?;
    }

    let run = &report.run;
    writeln!(out, "\nFuzzing run:")?;
    writeln!(out, "  Records generated: {}", run.iterations)?;
    writeln!(out, "  Records with violations: {}", run.failed_records)?;
    for violation in &run.violations {
        writeln!(out, "    ✗ {}", violation)?;
    }
    if run.passed() {
        writeln!(out, "  ✓ All records round-trip")?;
    }
    if let Some(sample) = &run.sample {
        writeln!(out, "\nSample record:")?;
        writeln!(out, "{}", serde_json::to_string_pretty(sample)?)?;
    }
    Ok(out)
}
