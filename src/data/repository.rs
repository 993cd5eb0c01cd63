//! Question repository contract and local implementations.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::data::loader::{load_records_from_json, records_for_test};
use crate::error::RepositoryError;
use crate::models::QuestionRecord;

/// Fetch-by-test-identifier access to a question store.
///
/// Implementations return rows in the store's order. An empty set is
/// reported as `RepositoryError::NotFound`.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn fetch(&self, test_id: &str) -> Result<Vec<QuestionRecord>, RepositoryError>;
}

/// Repository held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tests: HashMap<String, Vec<QuestionRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group records by their test identifier, keeping order within a test.
    pub fn from_records(records: Vec<QuestionRecord>) -> Self {
        let mut repo = Self::new();
        for record in records {
            repo.tests
                .entry(record.exam.trim().to_string())
                .or_default()
                .push(record);
        }
        repo
    }

    pub fn with_test(mut self, test_id: impl Into<String>, records: Vec<QuestionRecord>) -> Self {
        self.tests.insert(test_id.into(), records);
        self
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn fetch(&self, test_id: &str) -> Result<Vec<QuestionRecord>, RepositoryError> {
        match self.tests.get(test_id.trim()) {
            Some(records) if !records.is_empty() => Ok(records.clone()),
            _ => Err(RepositoryError::NotFound {
                test_id: test_id.to_string(),
            }),
        }
    }
}

/// Repository backed by a JSON bank file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionRepository for JsonFileRepository {
    async fn fetch(&self, test_id: &str) -> Result<Vec<QuestionRecord>, RepositoryError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || load_records_from_json(path))
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))??;

        let matching = records_for_test(records, test_id);
        debug!(test_id, rows = matching.len(), "read question bank");

        if matching.is_empty() {
            return Err(RepositoryError::NotFound {
                test_id: test_id.to_string(),
            });
        }
        Ok(matching)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::QuestionRecord;

    /// `count` rows for `test_id`; row `i` has ordinal `i + 1` and correct option "A".
    pub fn records(test_id: &str, count: usize) -> Vec<QuestionRecord> {
        (0..count)
            .map(|i| QuestionRecord {
                exam: test_id.to_string(),
                ordinal: i as u32 + 1,
                passage_or_sentence: None,
                question_text: format!("Question {}", i + 1),
                option_a: "first".to_string(),
                option_b: "second".to_string(),
                option_c: "third".to_string(),
                option_d: "fourth".to_string(),
                correct: "A".to_string(),
                explanation: Some(format!("Explanation {}", i + 1)),
            })
            .collect()
    }
}
