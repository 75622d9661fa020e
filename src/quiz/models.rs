use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::session::{models::SessionError, store::SessionHandle};

pub const NO_ANSWER_TEXT: &str = "No answer selected";

pub const QUIZ_ORDER_KEY: &str = "quiz_indices";
pub const ANSWERED_KEY: &str = "answered_questions";
pub const CORRECT_KEY: &str = "correct_answers";

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("The quiz catalog has no questions")]
    EmptyCatalog,

    #[error("Position {position} is past the end of the quiz")]
    OutOfRangeEnd { position: usize },

    #[error("No active quiz in this session")]
    NoActiveQuiz,

    #[error("Session is not authenticated")]
    NotAuthenticated,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: IndexMap<String, String>,
    pub answer: String,
}

impl Question {
    pub fn option_text(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn correct_text(&self) -> &str {
        self.option_text(&self.answer).unwrap_or(&self.answer)
    }

    pub fn is_correct(&self, key: &str) -> bool {
        self.answer == key
    }
}

/// Snapshot of the quiz keys held in a visitor session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizProgress {
    pub quiz_order: Option<Vec<usize>>,
    pub answered_count: u32,
    pub correct_count: u32,
}

impl QuizProgress {
    pub fn started(quiz_order: Vec<usize>) -> Self {
        Self {
            quiz_order: Some(quiz_order),
            answered_count: 0,
            correct_count: 0,
        }
    }

    pub fn load(session: &SessionHandle) -> Result<Self, SessionError> {
        Ok(Self {
            quiz_order: session.get(QUIZ_ORDER_KEY)?,
            answered_count: session.get_or(ANSWERED_KEY, 0)?,
            correct_count: session.get_or(CORRECT_KEY, 0)?,
        })
    }

    pub fn store(&self, session: &SessionHandle) -> Result<(), SessionError> {
        if let Some(order) = &self.quiz_order {
            session.set(QUIZ_ORDER_KEY, order)?;
        }
        session.set(ANSWERED_KEY, &self.answered_count)?;
        session.set(CORRECT_KEY, &self.correct_count)
    }

    pub fn total(&self) -> usize {
        self.quiz_order.as_ref().map_or(0, Vec::len)
    }

    /// Catalog index shown at `position`.
    pub fn index_at(&self, position: usize) -> Result<usize, QuizError> {
        let order = self.quiz_order.as_ref().ok_or(QuizError::NoActiveQuiz)?;
        order
            .get(position)
            .copied()
            .ok_or(QuizError::OutOfRangeEnd { position })
    }

    pub fn record(&mut self, is_correct: bool) {
        self.answered_count += 1;
        if is_correct {
            self.correct_count += 1;
        }
    }

    pub fn summary(&self) -> QuizSummary {
        let percentage = if self.answered_count > 0 {
            let ratio = f64::from(self.correct_count) / f64::from(self.answered_count);
            (ratio * 100.0).round_ties_even() as u32
        } else {
            0
        };

        QuizSummary {
            answered: self.answered_count,
            correct: self.correct_count,
            percentage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub position: usize,
    pub question_number: usize,
    pub question_id: u32,
    pub prompt: String,
    pub options: IndexMap<String, String>,
    pub correct_count: u32,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub is_correct: bool,
    pub submitted_key: String,
    pub submitted_text: String,
    pub correct_text: String,
    pub next_position: usize,
    pub is_last: bool,
    pub correct_count: u32,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Scored(SubmissionResult),
    /// Nothing was selected; show the same position again.
    Unanswered { position: usize },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub answered: u32,
    pub correct: u32,
    pub percentage: u32,
}
