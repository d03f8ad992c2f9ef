//! Local filesystem store.
//!
//! Test definitions live as TOML files under `{root}/tests/`, one file per
//! test named `{id}.toml`. Results are archived as pretty JSON under
//! `{root}/results/`, one file per attempt.

use std::path::PathBuf;

use async_trait::async_trait;

use examkit_core::error::StoreError;
use examkit_core::model::TestDefinition;
use examkit_core::parser;
use examkit_core::scoring::TestResult;
use examkit_core::traits::ContentStore;

/// Store backed by a local directory tree.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn test_path(&self, test_id: &str) -> PathBuf {
        self.root.join("tests").join(format!("{test_id}.toml"))
    }

    fn result_path(&self, result: &TestResult) -> PathBuf {
        self.root
            .join("results")
            .join(format!("{}.json", result.attempt_id))
    }
}

#[async_trait]
impl ContentStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load_test(&self, test_id: &str) -> Result<TestDefinition, StoreError> {
        let path = self.test_path(test_id);
        if !path.exists() {
            return Err(StoreError::NotFound(test_id.to_string()));
        }
        parser::parse_test(&path).map_err(|e| StoreError::Network(format!("{e:#}")))
    }

    async fn save_result(&self, result: &TestResult) -> Result<(), StoreError> {
        let path = self.result_path(result);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Network(format!("cannot create results dir: {e}")))?;
        }
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| StoreError::Network(format!("cannot serialize result: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| StoreError::Network(format!("cannot write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "result archived");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TEST: &str = r#"
[test]
id = "reading-1"
title = "Reading Practice 1"

[[parts]]
id = "p1"
kind = "multiple-choice"

[[parts.questions]]
id = "q1"
prompt = "Pick one"
options = [ { key = "a", text = "A" } ]
answer = { type = "key", value = "a" }
"#;

    fn make_result() -> TestResult {
        TestResult {
            attempt_id: uuid::Uuid::new_v4(),
            test_id: "reading-1".into(),
            score: 100,
            correct_count: 1,
            total_count: 1,
            per_part: vec![],
            time_spent_seconds: 30,
            completed_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn load_test_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let tests_dir = dir.path().join("tests");
        std::fs::create_dir_all(&tests_dir).unwrap();
        std::fs::write(tests_dir.join("reading-1.toml"), SAMPLE_TEST).unwrap();

        let store = FileStore::new(dir.path().to_path_buf());
        let definition = store.load_test("reading-1").await.unwrap();
        assert_eq!(definition.title, "Reading Practice 1");
    }

    #[tokio::test]
    async fn missing_test_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        let err = store.load_test("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn save_result_archives_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        let result = make_result();

        store.save_result(&result).await.unwrap();

        let path = dir
            .path()
            .join("results")
            .join(format!("{}.json", result.attempt_id));
        let content = std::fs::read_to_string(path).unwrap();
        let loaded: TestResult = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.score, 100);
    }
}
