//! Scoring of a collected answer snapshot against reference answers.
//!
//! Comparison rules are part-kind specific. Example questions never count,
//! in either direction. A malformed entry (an answer shape the part's kind
//! cannot interpret) makes that single question incorrect rather than
//! aborting the whole pass.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::AnswerValue;
use crate::model::{Part, PartKind, ReferenceAnswer, TestDefinition};

/// The computed result of one test attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Unique attempt identifier.
    pub attempt_id: Uuid,
    /// The test this attempt was taken against.
    pub test_id: String,
    /// Normalized percentage score, always within 0..=100.
    pub score: u8,
    pub correct_count: u32,
    pub total_count: u32,
    /// Independent per-part ratios for display.
    pub per_part: Vec<PartBreakdown>,
    pub time_spent_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

/// Per-part score breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartBreakdown {
    pub part_id: String,
    pub kind: PartKind,
    pub correct: u32,
    pub total: u32,
    pub score: u8,
}

/// Score a full answer snapshot against a test definition.
pub fn score_attempt(
    definition: &TestDefinition,
    snapshot: &HashMap<String, AnswerValue>,
    time_spent_seconds: u64,
) -> TestResult {
    let mut per_part = Vec::with_capacity(definition.parts.len());
    let mut correct_count = 0u32;
    let mut total_count = 0u32;

    for part in &definition.parts {
        let (correct, total) = score_part(part, snapshot);
        correct_count += correct;
        total_count += total;
        per_part.push(PartBreakdown {
            part_id: part.id.clone(),
            kind: part.kind,
            correct,
            total,
            score: percentage(correct, total),
        });
    }

    TestResult {
        attempt_id: Uuid::new_v4(),
        test_id: definition.id.clone(),
        score: percentage(correct_count, total_count),
        correct_count,
        total_count,
        per_part,
        time_spent_seconds,
        completed_at: Utc::now(),
    }
}

fn score_part(part: &Part, snapshot: &HashMap<String, AnswerValue>) -> (u32, u32) {
    match part.kind {
        PartKind::MultipleChoice | PartKind::GapFill => score_choices(part, snapshot),
        PartKind::Ordering => score_ordering(part, snapshot),
        PartKind::HeadingMatch => score_headings(part, snapshot),
    }
}

/// Choice-style parts: correct iff the stored key equals the reference key.
fn score_choices(part: &Part, snapshot: &HashMap<String, AnswerValue>) -> (u32, u32) {
    let mut correct = 0;
    let mut total = 0;
    for question in part.scored_questions() {
        total += 1;
        let Some(ReferenceAnswer::Key(reference)) = &question.answer else {
            continue;
        };
        if let Some(AnswerValue::Choice(selected)) = snapshot.get(&question.id) {
            if selected == reference {
                correct += 1;
            }
        }
    }
    (correct, total)
}

/// Ordering parts: position-by-position comparison against the canonical
/// sequence, example slots excluded from both sides of the ratio.
fn score_ordering(part: &Part, snapshot: &HashMap<String, AnswerValue>) -> (u32, u32) {
    let reference = part.reference_order();
    let example: HashSet<&str> = part.example_questions().map(|q| q.id.as_str()).collect();
    let total = reference
        .iter()
        .filter(|id| !example.contains(id.as_str()))
        .count() as u32;

    let Some(AnswerValue::Order(submitted)) = snapshot.get(&part.id) else {
        return (0, total);
    };

    let mut correct = 0;
    for (slot, reference_id) in reference.iter().enumerate() {
        if example.contains(reference_id.as_str()) {
            continue;
        }
        if submitted.get(slot) == Some(reference_id) {
            correct += 1;
        }
    }
    (correct, total)
}

/// Heading-match parts: each paragraph correct iff its stored heading id
/// equals the reference heading id.
fn score_headings(part: &Part, snapshot: &HashMap<String, AnswerValue>) -> (u32, u32) {
    let submitted = match snapshot.get(&part.id) {
        Some(AnswerValue::Match(mapping)) => Some(mapping),
        _ => None,
    };

    let mut correct = 0;
    let mut total = 0;
    for question in part.scored_questions() {
        total += 1;
        let Some(ReferenceAnswer::Heading(reference)) = &question.answer else {
            continue;
        };
        if let Some(mapping) = submitted {
            if mapping.get(&question.id) == Some(reference) {
                correct += 1;
            }
        }
    }
    (correct, total)
}

/// round(100 × correct / total); 0 when the denominator is 0.
fn percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u8
}
