use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::AssemblyError;
use crate::models::{OptionKey, Question};
use crate::session::Review;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No test chosen yet.
    Setup,
    /// Assembly in flight.
    Loading,
    /// Assembly failed; `Retry` returns to `Setup`.
    Error,
    /// Questions assembled and the countdown running.
    Active,
    /// Scored. Only `Restart` leaves this phase.
    Results,
}

/// Selected options keyed by session index (not by source ordinal).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<usize, OptionKey>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<OptionKey> {
        self.answers.get(&index).copied()
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    /// Record or overwrite the answer for `index`.
    pub fn record(&mut self, index: usize, option: OptionKey) {
        self.answers.insert(index, option);
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

/// One taker's attempt at an assembled test.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identity used to drop ticks and assembly results from earlier sessions.
    pub id: Uuid,
    pub phase: Phase,
    pub test_id: String,
    pub requested_count: Option<i64>,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub answers: AnswerSheet,
    pub time_remaining_secs: u64,
    /// Set while in the `Error` phase.
    pub error: Option<AssemblyError>,
    /// Set on entry to the `Results` phase.
    pub review: Option<Review>,
}

impl Session {
    /// An empty session in the `Setup` phase.
    pub fn new(full_budget_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Setup,
            test_id: String::new(),
            requested_count: None,
            questions: Vec::new(),
            current_index: 0,
            answers: AnswerSheet::new(),
            time_remaining_secs: full_budget_secs,
            error: None,
            review: None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_answer(&self) -> Option<OptionKey> {
        self.answers.get(self.current_index)
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.time_remaining_secs)
    }
}

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_sheet_overwrites() {
        let mut sheet = AnswerSheet::new();
        sheet.record(2, OptionKey::A);
        sheet.record(2, OptionKey::C);
        assert_eq!(sheet.get(2), Some(OptionKey::C));
        assert_eq!(sheet.answered_count(), 1);
        assert!(!sheet.is_answered(0));
    }

    #[test]
    fn test_new_session_is_empty_setup() {
        let session = Session::new(3840);
        assert_eq!(session.phase, Phase::Setup);
        assert!(session.questions.is_empty());
        assert_eq!(session.time_remaining_secs, 3840);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(355), "05:55");
        assert_eq!(format_clock(3840), "64:00");
    }
}
