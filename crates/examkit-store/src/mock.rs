//! Mock store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use examkit_core::error::StoreError;
use examkit_core::model::TestDefinition;
use examkit_core::scoring::TestResult;
use examkit_core::traits::ContentStore;

/// An in-memory content store for testing session flows without a real
/// backend. Supports failure injection and records every saved result.
#[derive(Default)]
pub struct MockStore {
    tests: HashMap<String, TestDefinition>,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    load_calls: AtomicU32,
    save_calls: AtomicU32,
    saved: Mutex<Vec<TestResult>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test definition under its own id.
    pub fn with_test(mut self, definition: TestDefinition) -> Self {
        self.tests.insert(definition.id.clone(), definition);
        self
    }

    /// Make every `load_test` fail with a network error.
    pub fn with_load_failure(self) -> Self {
        self.fail_load.store(true, Ordering::Relaxed);
        self
    }

    /// Make every `save_result` fail with a network error.
    pub fn with_save_failure(self) -> Self {
        self.fail_save.store(true, Ordering::Relaxed);
        self
    }

    pub fn load_calls(&self) -> u32 {
        self.load_calls.load(Ordering::Relaxed)
    }

    pub fn save_calls(&self) -> u32 {
        self.save_calls.load(Ordering::Relaxed)
    }

    /// The most recently saved result, if any.
    pub fn last_saved(&self) -> Option<TestResult> {
        self.saved.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load_test(&self, test_id: &str) -> Result<TestDefinition, StoreError> {
        self.load_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_load.load(Ordering::Relaxed) {
            return Err(StoreError::Network("injected load failure".into()));
        }
        self.tests
            .get(test_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(test_id.to_string()))
    }

    async fn save_result(&self, result: &TestResult) -> Result<(), StoreError> {
        self.save_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_save.load(Ordering::Relaxed) {
            return Err(StoreError::Network("injected save failure".into()));
        }
        self.saved.lock().unwrap().push(result.clone());
        Ok(())
    }
}
