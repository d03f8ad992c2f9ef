//! Collaborator interface for the external content/result service.
//!
//! The session controller only ever talks to this trait; concrete
//! HTTP/file/mock implementations live in the `examkit-store` crate.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::TestDefinition;
use crate::scoring::TestResult;

/// Remote test-content and result-storage service.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Human-readable store name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch an immutable test definition by id.
    async fn load_test(&self, test_id: &str) -> Result<TestDefinition, StoreError>;

    /// Persist a computed result. Best-effort: callers treat failure as a
    /// reportable notice, not a blocking error.
    async fn save_result(&self, result: &TestResult) -> Result<(), StoreError>;
}
