//! Per-session answer state.
//!
//! The answer store holds one entry per question id for the lifetime of a
//! test session. Ordering and heading-match displays collect a single
//! aggregate value, which they store under their part id.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Part, PartKind};

/// A collected answer, tagged by shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AnswerValue {
    /// A single selected choice key.
    Choice(String),
    /// An ordered list of item ids, in display order.
    Order(Vec<String>),
    /// Paragraph id to selected heading id.
    Match(HashMap<String, String>),
}

impl AnswerValue {
    /// Whether this value has the shape the given part kind collects.
    pub fn matches(&self, kind: PartKind) -> bool {
        matches!(
            (self, kind),
            (AnswerValue::Choice(_), PartKind::GapFill | PartKind::MultipleChoice)
                | (AnswerValue::Order(_), PartKind::Ordering)
                | (AnswerValue::Match(_), PartKind::HeadingMatch)
        )
    }
}

/// Holds per-question answer state for one test session.
///
/// A `set` overwrites the entry for its id atomically; repeated writes to
/// the same id resolve to last-write-wins. Option-set membership is not
/// validated here; that is the question display's responsibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerStore {
    entries: HashMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for a question id, if one has been recorded.
    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.entries.get(id)
    }

    /// Overwrite the entry for an id. Idempotent for equal values.
    pub fn set(&mut self, id: impl Into<String>, value: AnswerValue) {
        self.entries.insert(id.into(), value);
    }

    /// Full mapping for submission.
    pub fn snapshot(&self) -> HashMap<String, AnswerValue> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A read/write view restricted to one part's entries.
    pub fn part_view<'a>(&'a mut self, part: &Part) -> PartAnswers<'a> {
        PartAnswers::new(self, part)
    }
}

/// Read/write capability scoped to a single part.
///
/// Question displays receive this instead of the full store, so they cannot
/// read or mutate another part's entries.
pub struct PartAnswers<'a> {
    store: &'a mut AnswerStore,
    kind: PartKind,
    allowed: HashSet<String>,
}

impl<'a> PartAnswers<'a> {
    fn new(store: &'a mut AnswerStore, part: &Part) -> Self {
        let mut allowed: HashSet<String> =
            part.questions.iter().map(|q| q.id.clone()).collect();
        // Aggregate displays store one entry under the part id.
        if matches!(part.kind, PartKind::Ordering | PartKind::HeadingMatch) {
            allowed.insert(part.id.clone());
        }
        Self {
            store,
            kind: part.kind,
            allowed,
        }
    }

    /// The entry for an id within this part; `None` for foreign ids.
    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        if !self.allowed.contains(id) {
            return None;
        }
        self.store.get(id)
    }

    /// Write an entry. Returns `false` without mutating for an id outside
    /// this part's scope.
    pub fn set(&mut self, id: &str, value: AnswerValue) -> bool {
        if !self.allowed.contains(id) {
            tracing::warn!(id, "rejected write outside part scope");
            return false;
        }
        if !value.matches(self.kind) {
            tracing::debug!(id, kind = %self.kind, "answer shape does not match part kind");
        }
        self.store.set(id, value);
        true
    }
}
