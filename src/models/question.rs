use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;

/// Shown in place of a prompt that is empty after trimming.
pub const MISSING_PROMPT: &str = "Question text missing.";

/// One of the four answer choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    pub fn index(self) -> usize {
        match self {
            OptionKey::A => 0,
            OptionKey::B => 1,
            OptionKey::C => 2,
            OptionKey::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_char(self) -> char {
        match self {
            OptionKey::A => 'A',
            OptionKey::B => 'B',
            OptionKey::C => 'C',
            OptionKey::D => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionKey::A),
            'B' => Some(OptionKey::B),
            'C' => Some(OptionKey::C),
            'D' => Some(OptionKey::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or(()),
            _ => Err(()),
        }
    }
}

/// A question row as stored in a question bank.
///
/// Field names follow the bank's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub exam: String,
    #[serde(rename = "exam_question_index", deserialize_with = "ordinal_or_zero", default)]
    pub ordinal: u32,
    #[serde(default)]
    pub passage_or_sentence: Option<String>,
    #[serde(default)]
    pub question_text: String,
    #[serde(rename = "A", default)]
    pub option_a: String,
    #[serde(rename = "B", default)]
    pub option_b: String,
    #[serde(rename = "C", default)]
    pub option_c: String,
    #[serde(rename = "D", default)]
    pub option_d: String,
    pub correct: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// Whether this row belongs to the given test.
    pub fn belongs_to(&self, test_id: &str) -> bool {
        self.exam.trim() == test_id.trim()
    }
}

/// A normalized question, ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Position in the source test.
    pub ordinal: u32,
    pub passage: Option<String>,
    pub prompt: String,
    pub options: [String; 4],
    pub correct: OptionKey,
    pub explanation: Option<String>,
}

impl Question {
    pub fn option(&self, key: OptionKey) -> &str {
        &self.options[key.index()]
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = RecordError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let correct = record
            .correct
            .parse::<OptionKey>()
            .map_err(|_| RecordError::InvalidCorrectOption {
                ordinal: record.ordinal,
                value: record.correct.clone(),
            })?;

        let prompt = match record.question_text.trim() {
            "" => MISSING_PROMPT.to_string(),
            text => text.to_string(),
        };

        Ok(Self {
            ordinal: record.ordinal,
            passage: non_blank(record.passage_or_sentence),
            prompt,
            options: [
                record.option_a,
                record.option_b,
                record.option_c,
                record.option_d,
            ],
            correct,
            explanation: non_blank(record.explanation),
        })
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
    })
}

// Bank exports carry the ordinal as text; unreadable values become 0.
fn ordinal_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.trim().parse().unwrap_or(0),
        StringOrNumber::Unsigned(n) => u32::try_from(n).unwrap_or(0),
        StringOrNumber::Signed(n) => u32::try_from(n).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question_text: &str, correct: &str) -> QuestionRecord {
        QuestionRecord {
            exam: "1".to_string(),
            ordinal: 3,
            passage_or_sentence: Some("  ".to_string()),
            question_text: question_text.to_string(),
            option_a: "alpha".to_string(),
            option_b: "beta".to_string(),
            option_c: "gamma".to_string(),
            option_d: "delta".to_string(),
            correct: correct.to_string(),
            explanation: None,
        }
    }

    #[test]
    fn test_option_key_parsing() {
        assert_eq!("A".parse(), Ok(OptionKey::A));
        assert_eq!(" d ".parse(), Ok(OptionKey::D));
        assert!("E".parse::<OptionKey>().is_err());
        assert!("AB".parse::<OptionKey>().is_err());
        assert!("".parse::<OptionKey>().is_err());
    }

    #[test]
    fn test_normalization_trims_prompt_and_drops_blank_passage() {
        let question = Question::try_from(record("  What is x?  ", "C")).unwrap();
        assert_eq!(question.prompt, "What is x?");
        assert_eq!(question.passage, None);
        assert_eq!(question.correct, OptionKey::C);
        assert_eq!(question.option(OptionKey::C), "gamma");
    }

    #[test]
    fn test_empty_prompt_uses_placeholder() {
        let question = Question::try_from(record("   ", "A")).unwrap();
        assert_eq!(question.prompt, MISSING_PROMPT);
    }

    #[test]
    fn test_invalid_correct_option_is_rejected() {
        let err = Question::try_from(record("Q", "E")).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidCorrectOption {
                ordinal: 3,
                value: "E".to_string()
            }
        );
    }

    #[test]
    fn test_record_accepts_numeric_and_text_columns() {
        let json = r#"[
            {"exam": 2, "exam_question_index": "14", "question_text": "Q",
             "A": "a", "B": "b", "C": "c", "D": "d", "correct": "B"},
            {"exam": " 2", "exam_question_index": 15, "question_text": "Q",
             "A": "a", "B": "b", "C": "c", "D": "d", "correct": "A",
             "explanation": "because"}
        ]"#;
        let records: Vec<QuestionRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].exam, "2");
        assert_eq!(records[0].ordinal, 14);
        assert_eq!(records[1].ordinal, 15);
        assert!(records.iter().all(|r| r.belongs_to("2")));
        assert!(!records[0].belongs_to("20"));
    }
}
