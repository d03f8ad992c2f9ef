//! Test session lifecycle: load, collect answers, submit, complete.
//!
//! One controller drives one attempt. All state mutations happen on the
//! caller's thread of control, one event at a time; the only suspension
//! points are the content load and the best-effort result save. Async
//! outcomes are applied through `apply_load`/`finish_submit`, which are
//! keyed by session id so results addressed to a discarded or retaken
//! session are dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::{AnswerStore, AnswerValue};
use crate::error::{SessionError, StoreError};
use crate::model::{PartKind, TestDefinition};
use crate::ordering::{MoveOutcome, OrderingEngine};
use crate::scoring::{score_attempt, TestResult};
use crate::traits::ContentStore;

/// Lifecycle states of a test attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Loading,
    Active,
    Submitting,
    Complete,
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Submitting => write!(f, "submitting"),
            SessionStatus::Complete => write!(f, "complete"),
            SessionStatus::Error => write!(f, "error"),
        }
    }
}

/// Ephemeral per-attempt state, owned exclusively by the controller.
#[derive(Debug)]
struct TestSession {
    id: Uuid,
    test_id: String,
    status: SessionStatus,
    definition: Option<TestDefinition>,
    answers: AnswerStore,
    ordering: HashMap<String, OrderingEngine>,
    started: Option<Instant>,
    frozen_elapsed: Option<Duration>,
    result: Option<TestResult>,
    save_failure: Option<String>,
}

impl TestSession {
    fn new(test_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            test_id: test_id.to_string(),
            status: SessionStatus::Loading,
            definition: None,
            answers: AnswerStore::new(),
            ordering: HashMap::new(),
            started: None,
            frozen_elapsed: None,
            result: None,
            save_failure: None,
        }
    }
}

/// Drives the lifecycle of one test attempt.
pub struct TestSessionController {
    store: Arc<dyn ContentStore>,
    rng: StdRng,
    session: TestSession,
}

impl TestSessionController {
    pub fn new(store: Arc<dyn ContentStore>, test_id: &str) -> Self {
        Self {
            store,
            rng: StdRng::from_entropy(),
            session: TestSession::new(test_id),
        }
    }

    /// Use a fixed shuffle seed. Intended for tests and replays.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn definition(&self) -> Option<&TestDefinition> {
        self.session.definition.as_ref()
    }

    /// The computed result, available from `submitting` onward.
    pub fn result(&self) -> Option<&TestResult> {
        self.session.result.as_ref()
    }

    /// The non-blocking persistence failure notice, if the save failed.
    pub fn save_failure(&self) -> Option<&str> {
        self.session.save_failure.as_deref()
    }

    pub fn ordering_engine(&self, part_id: &str) -> Option<&OrderingEngine> {
        self.session.ordering.get(part_id)
    }

    /// Current answer snapshot (for autosave surfaces).
    pub fn answers(&self) -> HashMap<String, AnswerValue> {
        self.session.answers.snapshot()
    }

    /// Seed answers captured from an earlier render of this attempt.
    /// Ordering engines reconstruct their display order from these entries
    /// once the definition arrives, instead of reshuffling.
    pub fn preload_answers(
        &mut self,
        snapshot: HashMap<String, AnswerValue>,
    ) -> Result<(), SessionError> {
        if self.session.status != SessionStatus::Loading {
            return Err(SessionError::InvalidTransition {
                status: self.session.status,
                action: "preload answers",
            });
        }
        for (id, value) in snapshot {
            self.session.answers.set(id, value);
        }
        Ok(())
    }

    /// Await the content service and apply the outcome.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        let session_id = self.session.id;
        let result = self.store.load_test(&self.session.test_id).await;
        self.apply_load(session_id, result)
    }

    /// Apply a load outcome. Results addressed to a superseded session id
    /// are dropped without effect.
    pub fn apply_load(
        &mut self,
        session_id: Uuid,
        result: Result<TestDefinition, StoreError>,
    ) -> Result<(), SessionError> {
        if session_id != self.session.id {
            tracing::debug!(%session_id, "dropping stale load result");
            return Ok(());
        }
        if self.session.status != SessionStatus::Loading {
            return Err(SessionError::InvalidTransition {
                status: self.session.status,
                action: "apply load",
            });
        }
        match result {
            Ok(definition) => {
                for part in definition.parts.iter().filter(|p| p.kind == PartKind::Ordering) {
                    let saved = match self.session.answers.get(&part.id) {
                        Some(AnswerValue::Order(order)) => Some(order.clone()),
                        _ => None,
                    };
                    let engine = OrderingEngine::from_part(part, saved.as_deref(), &mut self.rng);
                    // Persist the initial display order so a re-render
                    // reconstructs instead of reshuffling.
                    self.session
                        .answers
                        .set(part.id.clone(), AnswerValue::Order(engine.current_order()));
                    self.session.ordering.insert(part.id.clone(), engine);
                }
                self.session.definition = Some(definition);
                self.session.started = Some(Instant::now());
                self.session.status = SessionStatus::Active;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, test_id = %self.session.test_id, "test content load failed");
                self.session.status = SessionStatus::Error;
                Err(SessionError::ContentLoad(e))
            }
        }
    }

    /// Record an answer from a part's display. Parts may be answered in
    /// any order; there is no gating between them.
    pub fn record_answer(
        &mut self,
        part_id: &str,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), SessionError> {
        if self.session.status != SessionStatus::Active {
            return Err(SessionError::InvalidTransition {
                status: self.session.status,
                action: "record answer",
            });
        }
        let part = match self.session.definition.as_ref().and_then(|d| d.part(part_id)) {
            Some(part) => part,
            None => return Err(SessionError::UnknownPart(part_id.to_string())),
        };
        let mut view = self.session.answers.part_view(part);
        if !view.set(question_id, value) {
            return Err(SessionError::OutOfScope {
                part_id: part_id.to_string(),
                question_id: question_id.to_string(),
            });
        }
        Ok(())
    }

    /// Apply a move command to an ordering part. A successful move persists
    /// the emitted order as the part's saved order.
    pub fn move_item(
        &mut self,
        part_id: &str,
        source: usize,
        dest: usize,
    ) -> Result<MoveOutcome, SessionError> {
        if self.session.status != SessionStatus::Active {
            return Err(SessionError::InvalidTransition {
                status: self.session.status,
                action: "move item",
            });
        }
        let engine = self
            .session
            .ordering
            .get_mut(part_id)
            .ok_or_else(|| SessionError::UnknownPart(part_id.to_string()))?;
        let outcome = engine.move_item(source, dest);
        if let MoveOutcome::Moved(order) = &outcome {
            self.session
                .answers
                .set(part_id.to_string(), AnswerValue::Order(order.clone()));
        }
        Ok(outcome)
    }

    /// Reset an ordering part to its authored order. Returns `false` once
    /// the part is read-only.
    pub fn reset_part(&mut self, part_id: &str) -> Result<bool, SessionError> {
        if self.session.status != SessionStatus::Active {
            return Err(SessionError::InvalidTransition {
                status: self.session.status,
                action: "reset part",
            });
        }
        let engine = self
            .session
            .ordering
            .get_mut(part_id)
            .ok_or_else(|| SessionError::UnknownPart(part_id.to_string()))?;
        match engine.reset() {
            Some(order) => {
                self.session
                    .answers
                    .set(part_id.to_string(), AnswerValue::Order(order));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rebuild a part's engine from the persisted order, as a re-mounted
    /// display does. The current sequence and the example slot survive.
    pub fn rebuild_ordering(&mut self, part_id: &str) -> Result<(), SessionError> {
        if self.session.status != SessionStatus::Active {
            return Err(SessionError::InvalidTransition {
                status: self.session.status,
                action: "rebuild ordering",
            });
        }
        let part = match self.session.definition.as_ref().and_then(|d| d.part(part_id)) {
            Some(part) => part.clone(),
            None => return Err(SessionError::UnknownPart(part_id.to_string())),
        };
        let saved = match self.session.answers.get(part_id) {
            Some(AnswerValue::Order(order)) => Some(order.clone()),
            _ => None,
        };
        let engine = OrderingEngine::from_part(&part, saved.as_deref(), &mut self.rng);
        self.session.ordering.insert(part_id.to_string(), engine);
        Ok(())
    }

    /// Elapsed active time; frozen once submission begins.
    pub fn elapsed(&self) -> Duration {
        if let Some(frozen) = self.session.frozen_elapsed {
            return frozen;
        }
        self.session
            .started
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    /// Compute the result and enter `submitting`. Returns `None` (and
    /// changes nothing) unless the session is active, so a duplicate
    /// submit while one is in flight is ignored.
    pub fn begin_submit(&mut self) -> Option<TestResult> {
        if self.session.status != SessionStatus::Active {
            tracing::debug!(status = %self.session.status, "ignoring submit request");
            return None;
        }
        let elapsed = self.elapsed();
        let snapshot = self.session.answers.snapshot();
        let result = match self.session.definition.as_ref() {
            Some(definition) => score_attempt(definition, &snapshot, elapsed.as_secs()),
            None => return None,
        };
        self.session.frozen_elapsed = Some(elapsed);
        for engine in self.session.ordering.values_mut() {
            engine.lock();
        }
        self.session.status = SessionStatus::Submitting;
        self.session.result = Some(result.clone());
        Some(result)
    }

    /// Apply the persistence acknowledgement. Failure is reported, not
    /// fatal: the session completes with the locally computed result either
    /// way. Acks addressed to a superseded session id are dropped.
    pub fn finish_submit(&mut self, session_id: Uuid, ack: Result<(), StoreError>) {
        if session_id != self.session.id {
            tracing::debug!(%session_id, "dropping stale save ack");
            return;
        }
        if self.session.status != SessionStatus::Submitting {
            return;
        }
        if let Err(e) = ack {
            tracing::warn!(error = %e, "result save failed; keeping local result");
            self.session.save_failure = Some(e.to_string());
        }
        self.session.status = SessionStatus::Complete;
    }

    /// Submit the attempt: score synchronously, persist best-effort.
    ///
    /// Returns the computed result, or `None` when the submit was ignored
    /// because the session is not active.
    pub async fn submit(&mut self) -> Option<TestResult> {
        let result = self.begin_submit()?;
        let session_id = self.session.id;
        let ack = self.store.save_result(&result).await;
        self.finish_submit(session_id, ack);
        Some(result)
    }

    /// Discard the current attempt and start a fresh one for the same
    /// test. Ordering parts get a fresh shuffle when the new load
    /// completes. Returns the new session id.
    pub fn retake(&mut self) -> Uuid {
        let test_id = self.session.test_id.clone();
        self.session = TestSession::new(&test_id);
        self.session.id
    }
}
