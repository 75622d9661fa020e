use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use crate::{
    auth::gate::is_authenticated,
    quiz::{
        catalog::Catalog,
        models::{
            NO_ANSWER_TEXT, Question, QuestionView, QuizError, QuizProgress, QuizSummary,
            SubmissionResult, SubmitOutcome,
        },
    },
    session::store::SessionHandle,
};

/// Drives one visitor through the catalog. Holds no per-visitor state:
/// progress is read from and written back to the session on every call.
pub struct QuizFlow<'a> {
    catalog: &'a Catalog,
}

impl<'a> QuizFlow<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Shuffles every catalog index into a new order and zeroes the counters.
    /// Returns the first position to display.
    pub fn start_quiz<R>(&self, session: &SessionHandle, rng: &mut R) -> Result<usize, QuizError>
    where
        R: Rng + ?Sized,
    {
        ensure_authenticated(session)?;

        if self.catalog.is_empty() {
            return Err(QuizError::EmptyCatalog);
        }

        let mut order: Vec<usize> = (0..self.catalog.len()).collect();
        order.shuffle(rng);
        debug!("Visitor {} started quiz with order {:?}", session.visitor(), order);

        QuizProgress::started(order).store(session)?;
        Ok(0)
    }

    pub fn get_question(
        &self,
        session: &SessionHandle,
        position: usize,
    ) -> Result<QuestionView, QuizError> {
        ensure_authenticated(session)?;

        let progress = QuizProgress::load(session)?;
        let question = self.question_at(&progress, position)?;

        Ok(QuestionView {
            position,
            question_number: position + 1,
            question_id: question.id,
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            correct_count: progress.correct_count,
            total: progress.total(),
        })
    }

    /// Scores `submitted` against the question at `position`.
    ///
    /// Every scored call counts, including repeats for the same position.
    pub fn submit_answer(
        &self,
        session: &SessionHandle,
        position: usize,
        submitted: Option<&str>,
    ) -> Result<SubmitOutcome, QuizError> {
        ensure_authenticated(session)?;

        let mut progress = QuizProgress::load(session)?;
        let question = self.question_at(&progress, position)?;

        let Some(submitted) = submitted.filter(|key| !key.is_empty()) else {
            return Ok(SubmitOutcome::Unanswered { position });
        };

        let is_correct = question.is_correct(submitted);
        progress.record(is_correct);
        progress.store(session)?;

        let next_position = position + 1;
        let total = progress.total();

        Ok(SubmitOutcome::Scored(SubmissionResult {
            is_correct,
            submitted_key: submitted.to_string(),
            submitted_text: question
                .option_text(submitted)
                .unwrap_or(NO_ANSWER_TEXT)
                .to_string(),
            correct_text: question.correct_text().to_string(),
            next_position,
            is_last: next_position >= total,
            correct_count: progress.correct_count,
            total,
        }))
    }

    /// Never fails for an unstarted quiz, which reports zero of zero.
    pub fn finish(&self, session: &SessionHandle) -> Result<QuizSummary, QuizError> {
        ensure_authenticated(session)?;

        let progress = QuizProgress::load(session)?;
        Ok(progress.summary())
    }

    fn question_at(&self, progress: &QuizProgress, position: usize) -> Result<&'a Question, QuizError> {
        let index = progress.index_at(position)?;
        self.catalog.get(index).ok_or(QuizError::NoActiveQuiz)
    }
}

fn ensure_authenticated(session: &SessionHandle) -> Result<(), QuizError> {
    if is_authenticated(session) {
        return Ok(());
    }

    Err(QuizError::NotAuthenticated)
}
