//! Core data model types for examkit.
//!
//! These are the fundamental content types the entire system works over:
//! a test definition, its parts, and their questions. Definitions are
//! loaded once per session and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Immutable test content: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Unique identifier for this test.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Description shown on the test landing view.
    #[serde(default)]
    pub description: String,
    /// The scored sections of the test, in display order.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl TestDefinition {
    /// Look up a part by id.
    pub fn part(&self, part_id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == part_id)
    }

    /// Total number of scored (non-example) questions across all parts.
    pub fn scored_question_count(&self) -> usize {
        self.parts
            .iter()
            .map(|p| p.scored_questions().count())
            .sum()
    }
}

/// One scored section of a test, with a single question-display type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Unique identifier within the test.
    pub id: String,
    /// Which question display this part uses.
    pub kind: PartKind,
    /// Raw passage text. Gap-fill parts embed `[Qn]` tokens in it.
    #[serde(default)]
    pub passage: String,
    /// The part's questions, in authored order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Part {
    /// Look up a question by id.
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Questions that count toward the score.
    pub fn scored_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| !q.is_example)
    }

    /// Demonstration items, excluded from scoring and reordering.
    pub fn example_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_example)
    }

    /// The canonical reference sequence for an ordering part.
    ///
    /// An explicitly authored `Sequence` reference wins; otherwise the
    /// authored order of the part's question ids is canonical.
    pub fn reference_order(&self) -> Vec<String> {
        for question in &self.questions {
            if let Some(ReferenceAnswer::Sequence(order)) = &question.answer {
                return order.clone();
            }
        }
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}

/// A single question within a part.
///
/// `id` is stable and unique within the owning part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Prompt text; for ordering parts this is the sentence itself.
    #[serde(default)]
    pub prompt: String,
    /// Selectable options for choice-style questions.
    #[serde(default)]
    pub options: Vec<Choice>,
    /// Reference correctness data, consumed only by the scoring engine.
    #[serde(default)]
    pub answer: Option<ReferenceAnswer>,
    /// Marks a demonstration item in ordering/heading-match parts.
    #[serde(default)]
    pub is_example: bool,
}

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Stable option key (e.g. "a").
    pub key: String,
    /// Display text.
    pub text: String,
}

/// Reference answer data, tagged by shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ReferenceAnswer {
    /// The correct choice key for a choice-style question.
    Key(String),
    /// The canonical item ordering for an ordering part.
    Sequence(Vec<String>),
    /// The matched heading id for a heading-match paragraph.
    Heading(String),
}

/// Question-display types supported by the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartKind {
    GapFill,
    Ordering,
    MultipleChoice,
    HeadingMatch,
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartKind::GapFill => write!(f, "gap-fill"),
            PartKind::Ordering => write!(f, "ordering"),
            PartKind::MultipleChoice => write!(f, "multiple-choice"),
            PartKind::HeadingMatch => write!(f, "heading-match"),
        }
    }
}

impl FromStr for PartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gap-fill" | "gapfill" => Ok(PartKind::GapFill),
            "ordering" => Ok(PartKind::Ordering),
            "multiple-choice" | "mc" => Ok(PartKind::MultipleChoice),
            "heading-match" | "headings" => Ok(PartKind::HeadingMatch),
            other => Err(format!("unknown part kind: {other}")),
        }
    }
}
