//! Test assembly: how many questions to use and how long the taker gets.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::QuizConfig;
use crate::data::QuestionRepository;
use crate::error::{AssemblyError, RepositoryError};
use crate::models::Question;

/// A test ready to be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTest {
    pub test_id: String,
    /// First `effective_count` questions of the test, in repository order.
    pub questions: Vec<Question>,
    pub time_budget_secs: u64,
    /// Questions the repository had for this test.
    pub available: usize,
}

/// Number of questions to use given `available` and the taker's request.
///
/// Only a positive request no larger than `available` is honoured.
pub fn effective_count(available: usize, requested: Option<i64>) -> usize {
    match requested.and_then(|r| usize::try_from(r).ok()) {
        Some(r) if r > 0 && r <= available => r,
        _ => available,
    }
}

/// Seconds granted for `count` questions: the per-question share of the
/// reference budget times `count`, rounded down.
pub fn time_budget_secs(config: &QuizConfig, count: usize) -> u64 {
    let reference = u128::from(config.reference_question_count.max(1));
    let total = u128::from(config.total_budget_secs) * count as u128 / reference;
    u64::try_from(total).unwrap_or(u64::MAX)
}

/// Read a requested count the way a form field is read: optional leading
/// whitespace and sign, then leading digits. Anything else is no request.
pub fn parse_requested_count(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overflowing input is certainly larger than any test.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Builds `AssembledTest`s from a repository.
#[derive(Clone)]
pub struct Assembler {
    repository: Arc<dyn QuestionRepository>,
    config: QuizConfig,
}

impl Assembler {
    pub fn new(repository: Arc<dyn QuestionRepository>, config: QuizConfig) -> Self {
        Self { repository, config }
    }

    /// Fetch, slice and time a test. A single attempt; failures are returned as is.
    pub async fn assemble(
        &self,
        test_id: &str,
        requested: Option<i64>,
    ) -> Result<AssembledTest, AssemblyError> {
        let records = match self.repository.fetch(test_id).await {
            Ok(records) if records.is_empty() => Err(RepositoryError::NotFound {
                test_id: test_id.to_string(),
            }),
            other => other,
        }
        .map_err(|e| {
            warn!(test_id, "assembly failed: {}", e);
            AssemblyError::from(e)
        })?;

        let available = records.len();
        let count = effective_count(available, requested);

        let questions = records
            .into_iter()
            .take(count)
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                warn!(test_id, "assembly failed: {}", e);
                AssemblyError::Repository(e.to_string())
            })?;

        let time_budget_secs = time_budget_secs(&self.config, count);
        info!(
            test_id,
            available, count, time_budget_secs, "assembled test"
        );

        Ok(AssembledTest {
            test_id: test_id.to_string(),
            questions,
            time_budget_secs,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::data::{InMemoryRepository, fixtures};
    use crate::models::QuestionRecord;

    struct FailingRepository;

    #[async_trait]
    impl QuestionRepository for FailingRepository {
        async fn fetch(&self, _test_id: &str) -> Result<Vec<QuestionRecord>, RepositoryError> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }
    }

    struct EmptyRepository;

    #[async_trait]
    impl QuestionRepository for EmptyRepository {
        async fn fetch(&self, _test_id: &str) -> Result<Vec<QuestionRecord>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    fn assembler(repo: impl QuestionRepository + 'static) -> Assembler {
        Assembler::new(Arc::new(repo), QuizConfig::default())
    }

    #[test]
    fn test_effective_count_honours_valid_requests() {
        assert_eq!(effective_count(10, Some(5)), 5);
        assert_eq!(effective_count(10, Some(10)), 10);
        assert_eq!(effective_count(10, Some(1)), 1);
    }

    #[test]
    fn test_effective_count_falls_back_to_available() {
        assert_eq!(effective_count(10, None), 10);
        assert_eq!(effective_count(10, Some(0)), 10);
        assert_eq!(effective_count(10, Some(-3)), 10);
        assert_eq!(effective_count(10, Some(11)), 10);
        assert_eq!(effective_count(10, Some(i64::MAX)), 10);
    }

    #[test]
    fn test_effective_count_stays_within_bounds() {
        for available in 1..=60 {
            for requested in [None, Some(-1), Some(0), Some(1), Some(30), Some(61)] {
                let count = effective_count(available, requested);
                assert!((1..=available).contains(&count));
            }
        }
    }

    #[test]
    fn test_budget_for_five_questions() {
        assert_eq!(time_budget_secs(&QuizConfig::default(), 5), 355);
    }

    #[test]
    fn test_budget_for_full_test_is_full_budget() {
        assert_eq!(time_budget_secs(&QuizConfig::default(), 54), 3840);
        assert_eq!(time_budget_secs(&QuizConfig::default(), 0), 0);
    }

    #[test]
    fn test_budget_is_monotonic() {
        let config = QuizConfig::default();
        let budgets: Vec<u64> = (0..=120).map(|c| time_budget_secs(&config, c)).collect();
        assert!(budgets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_parse_requested_count() {
        assert_eq!(parse_requested_count("5"), Some(5));
        assert_eq!(parse_requested_count("  12 "), Some(12));
        assert_eq!(parse_requested_count("7abc"), Some(7));
        assert_eq!(parse_requested_count("-2"), Some(-2));
        assert_eq!(parse_requested_count("+3"), Some(3));
        assert_eq!(parse_requested_count(""), None);
        assert_eq!(parse_requested_count("abc"), None);
        assert_eq!(parse_requested_count("-"), None);
        assert_eq!(parse_requested_count("99999999999999999999"), Some(i64::MAX));
    }

    #[tokio::test]
    async fn test_assemble_takes_first_questions_in_order() {
        let repo = InMemoryRepository::from_records(fixtures::records("1", 10));
        let test = assembler(repo).assemble("1", Some(5)).await.unwrap();

        assert_eq!(test.available, 10);
        assert_eq!(test.time_budget_secs, 355);
        let ordinals: Vec<u32> = test.questions.iter().map(|q| q.ordinal).collect();
        assert_eq!(ordinals, [1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_assemble_unknown_test_is_not_found() {
        let repo = InMemoryRepository::from_records(fixtures::records("1", 3));
        let err = assembler(repo).assemble("2", None).await.unwrap_err();
        assert_eq!(
            err,
            AssemblyError::TestNotFound {
                test_id: "2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_assemble_empty_result_is_not_found() {
        let err = assembler(EmptyRepository).assemble("1", None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_assemble_other_failures_are_repository_errors() {
        let err = assembler(FailingRepository).assemble("1", None).await.unwrap_err();
        assert!(matches!(err, AssemblyError::Repository(ref msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_assemble_rejects_bad_correct_key_in_slice() {
        let mut rows = fixtures::records("1", 3);
        rows[2].correct = "Z".to_string();
        let repo = InMemoryRepository::from_records(rows);

        // The bad row is outside the requested slice.
        assert!(assembler(repo.clone()).assemble("1", Some(2)).await.is_ok());
        let err = assembler(repo).assemble("1", None).await.unwrap_err();
        assert!(matches!(err, AssemblyError::Repository(_)));
    }
}
