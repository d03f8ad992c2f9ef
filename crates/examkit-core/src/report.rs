//! Attempt report types with JSON persistence and progress comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::TestDefinition;
use crate::scoring::TestResult;

/// A persisted record of one completed attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the test taken (without the full definition).
    pub test: TestSummary,
    /// The computed result.
    pub result: TestResult,
}

/// Summary of a test definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub id: String,
    pub title: String,
    pub part_count: usize,
}

impl AttemptReport {
    pub fn new(definition: &TestDefinition, result: TestResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test: TestSummary {
                id: definition.id.clone(),
                title: definition.title.clone(),
                part_count: definition.parts.len(),
            },
            result,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this attempt against an earlier baseline attempt of the same
    /// test, per part. `threshold` is in score points: deltas within it
    /// count as unchanged.
    pub fn compare(&self, baseline: &AttemptReport, threshold: u8) -> ProgressReport {
        let baseline_parts: std::collections::HashMap<&str, u8> = baseline
            .result
            .per_part
            .iter()
            .map(|p| (p.part_id.as_str(), p.score))
            .collect();

        let mut gains = Vec::new();
        let mut drops = Vec::new();
        let mut unchanged = 0usize;
        let mut new_parts = 0usize;

        for part in &self.result.per_part {
            match baseline_parts.get(part.part_id.as_str()) {
                Some(&baseline_score) => {
                    let delta = i32::from(part.score) - i32::from(baseline_score);
                    if delta > i32::from(threshold) {
                        gains.push(PartDelta {
                            part_id: part.part_id.clone(),
                            baseline_score,
                            current_score: part.score,
                            delta,
                        });
                    } else if delta < -i32::from(threshold) {
                        drops.push(PartDelta {
                            part_id: part.part_id.clone(),
                            baseline_score,
                            current_score: part.score,
                            delta,
                        });
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_parts += 1,
            }
        }

        let current_ids: std::collections::HashSet<&str> = self
            .result
            .per_part
            .iter()
            .map(|p| p.part_id.as_str())
            .collect();
        let removed_parts = baseline
            .result
            .per_part
            .iter()
            .filter(|p| !current_ids.contains(p.part_id.as_str()))
            .count();

        ProgressReport {
            gains,
            drops,
            unchanged,
            new_parts,
            removed_parts,
            overall_delta: i32::from(self.result.score) - i32::from(baseline.result.score),
        }
    }
}

/// Result of comparing two attempts of the same test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Parts where the score went up.
    pub gains: Vec<PartDelta>,
    /// Parts where the score went down.
    pub drops: Vec<PartDelta>,
    /// Parts with no significant change.
    pub unchanged: usize,
    /// Parts in current but not baseline.
    pub new_parts: usize,
    /// Parts in baseline but not current.
    pub removed_parts: usize,
    /// Overall score delta in points.
    pub overall_delta: i32,
}

/// A per-part score change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDelta {
    pub part_id: String,
    pub baseline_score: u8,
    pub current_score: u8,
    pub delta: i32,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} improved, {} dropped, {} unchanged (overall {:+} points)\n\n",
            self.gains.len(),
            self.drops.len(),
            self.unchanged,
            self.overall_delta
        ));

        if !self.gains.is_empty() {
            md.push_str("### Improved\n\n");
            md.push_str("| Part | Baseline | Current | Delta |\n");
            md.push_str("|------|----------|---------|-------|\n");
            for g in &self.gains {
                md.push_str(&format!(
                    "| {} | {}% | {}% | {:+} |\n",
                    g.part_id, g.baseline_score, g.current_score, g.delta
                ));
            }
            md.push('\n');
        }

        if !self.drops.is_empty() {
            md.push_str("### Dropped\n\n");
            md.push_str("| Part | Baseline | Current | Delta |\n");
            md.push_str("|------|----------|---------|-------|\n");
            for d in &self.drops {
                md.push_str(&format!(
                    "| {} | {}% | {}% | {:+} |\n",
                    d.part_id, d.baseline_score, d.current_score, d.delta
                ));
            }
        }

        md
    }

    /// Returns true if any part dropped.
    pub fn has_drops(&self) -> bool {
        !self.drops.is_empty()
    }
}
