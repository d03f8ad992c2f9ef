//! Passage template splitting for gap-fill parts.
//!
//! A gap-fill passage embeds placeholder tokens of the form `[Q<digits>]`.
//! Splitting yields an alternating sequence of literal-text and gap
//! segments. Tokens are consumed strictly left to right: the nth token in
//! the text binds the nth question in list order, regardless of the digits
//! inside the token. Matching is exact-string with no escaping.

use crate::answers::{AnswerStore, AnswerValue};
use crate::model::Question;

/// One rendered segment of a gap-fill passage.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// Literal passage text.
    Text(&'a str),
    /// A fill-in-the-blank slot bound to one question.
    Gap { question: &'a Question },
}

/// Lazy, finite, restartable segment sequence over a passage.
///
/// The iterator is `Clone`; cloning before iteration restarts the sequence
/// from the beginning.
#[derive(Debug, Clone)]
pub struct PassageSegments<'a> {
    rest: &'a str,
    questions: &'a [Question],
    next_question: usize,
    queued_gap: Option<&'a Question>,
}

/// Split a passage into literal and gap segments bound to `questions`.
pub fn split_passage<'a>(passage: &'a str, questions: &'a [Question]) -> PassageSegments<'a> {
    PassageSegments {
        rest: passage,
        questions,
        next_question: 0,
        queued_gap: None,
    }
}

impl<'a> Iterator for PassageSegments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(question) = self.queued_gap.take() {
            return Some(Segment::Gap { question });
        }

        if self.next_question >= self.questions.len() {
            // Questions exhausted: whatever text remains (leftover tokens
            // included) is one literal tail.
            if self.rest.is_empty() {
                return None;
            }
            let tail = self.rest;
            self.rest = "";
            return Some(Segment::Text(tail));
        }

        match find_gap_token(self.rest) {
            Some((start, end)) => {
                let question = &self.questions[self.next_question];
                self.next_question += 1;
                let text = &self.rest[..start];
                self.rest = &self.rest[end..];
                if text.is_empty() {
                    // Adjacent tokens produce no empty literal between them.
                    Some(Segment::Gap { question })
                } else {
                    self.queued_gap = Some(question);
                    Some(Segment::Text(text))
                }
            }
            None => {
                // Fewer tokens than questions: trailing questions are
                // silently dropped from the rendered sequence.
                self.next_question = self.questions.len();
                if self.rest.is_empty() {
                    return None;
                }
                let tail = self.rest;
                self.rest = "";
                Some(Segment::Text(tail))
            }
        }
    }
}

/// Locate the next `[Q<digits>]` token, returning its byte range.
fn find_gap_token(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(found) = text[from..].find("[Q") {
        let start = from + found;
        let mut i = start + 2;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > start + 2 && i < bytes.len() && bytes[i] == b']' {
            return Some((start, i + 1));
        }
        from = start + 1;
    }
    None
}

/// The currently selected choice key for a gap, read from the answer store.
pub fn gap_selection<'a>(store: &'a AnswerStore, question: &Question) -> Option<&'a str> {
    match store.get(&question.id) {
        Some(AnswerValue::Choice(key)) => Some(key.as_str()),
        _ => None,
    }
}
