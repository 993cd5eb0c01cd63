//! Scoring and the post-test review.

use serde::Serialize;

use crate::models::{AnswerSheet, OptionKey, Question};

/// Shown in place of an answer the taker never gave.
pub const NO_ANSWER: &str = "No answer selected";

/// What the taker chose for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Selection {
    Answered(OptionKey),
    NoAnswer,
}

impl Selection {
    pub fn key(self) -> Option<OptionKey> {
        match self {
            Selection::Answered(key) => Some(key),
            Selection::NoAnswer => None,
        }
    }
}

/// How an option is to be displayed in the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionMark {
    /// The correct option, whether or not it was chosen.
    Correct,
    /// The taker's choice, which was wrong.
    WrongSelection,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewOption {
    pub key: OptionKey,
    pub text: String,
    pub mark: OptionMark,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    /// Position in the session.
    pub index: usize,
    pub ordinal: u32,
    pub passage: Option<String>,
    pub prompt: String,
    pub options: Vec<ReviewOption>,
    pub selection: Selection,
    pub correct: OptionKey,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl ReviewItem {
    /// "B (text)" for an answered question, the no-answer marker otherwise.
    pub fn selection_label(&self) -> String {
        match self.selection {
            Selection::Answered(key) => format!("{} ({})", key, self.option_text(key)),
            Selection::NoAnswer => NO_ANSWER.to_string(),
        }
    }

    pub fn correct_label(&self) -> String {
        format!("{} ({})", self.correct, self.option_text(self.correct))
    }

    fn option_text(&self, key: OptionKey) -> &str {
        self.options
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.text.as_str())
            .unwrap_or("-")
    }
}

/// Scored review of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub total_correct: usize,
    /// Wrong and unanswered questions.
    pub total_wrong: usize,
    pub items: Vec<ReviewItem>,
}

impl Review {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn percentage(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            (self.total_correct as f64 / self.items.len() as f64) * 100.0
        }
    }

    pub fn unanswered(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.selection == Selection::NoAnswer)
            .count()
    }
}

/// Score `answers` against `questions`.
pub fn build_review(questions: &[Question], answers: &AnswerSheet) -> Review {
    let items: Vec<ReviewItem> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| review_item(index, question, answers.get(index)))
        .collect();

    let total_correct = items.iter().filter(|item| item.is_correct).count();

    Review {
        total_correct,
        total_wrong: items.len() - total_correct,
        items,
    }
}

fn review_item(index: usize, question: &Question, answer: Option<OptionKey>) -> ReviewItem {
    let is_correct = answer == Some(question.correct);

    let options = OptionKey::ALL
        .iter()
        .map(|&key| {
            let selected = answer == Some(key);
            let mark = if key == question.correct {
                OptionMark::Correct
            } else if selected {
                OptionMark::WrongSelection
            } else {
                OptionMark::Plain
            };
            ReviewOption {
                key,
                text: question.option(key).to_string(),
                mark,
                selected,
            }
        })
        .collect();

    ReviewItem {
        index,
        ordinal: question.ordinal,
        passage: question.passage.clone(),
        prompt: question.prompt.clone(),
        options,
        selection: answer.map_or(Selection::NoAnswer, Selection::Answered),
        correct: question.correct,
        is_correct,
        explanation: question.explanation.clone(),
    }
}
