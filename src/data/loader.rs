use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::models::QuestionRecord;

/// Read every row of a JSON question bank, in file order.
pub fn load_records_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<QuestionRecord>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Rows of a bank that belong to `test_id`, in file order.
pub fn records_for_test(records: Vec<QuestionRecord>, test_id: &str) -> Vec<QuestionRecord> {
    records
        .into_iter()
        .filter(|record| record.belongs_to(test_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_load_and_filter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"exam": "1", "exam_question_index": 1, "question_text": "one",
                  "A": "a", "B": "b", "C": "c", "D": "d", "correct": "A"}},
                {{"exam": "2", "exam_question_index": 1, "question_text": "other",
                  "A": "a", "B": "b", "C": "c", "D": "d", "correct": "B"}},
                {{"exam": "1", "exam_question_index": 2, "question_text": "two",
                  "A": "a", "B": "b", "C": "c", "D": "d", "correct": "C"}}
            ]"#
        )
        .unwrap();

        let records = load_records_from_json(file.path()).unwrap();
        assert_eq!(records.len(), 3);

        let test_one = records_for_test(records, "1");
        let prompts: Vec<_> = test_one.iter().map(|r| r.question_text.as_str()).collect();
        assert_eq!(prompts, ["one", "two"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records_from_json(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_records_from_json(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
