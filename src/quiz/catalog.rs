use std::{collections::HashSet, fs, path::Path};

use tracing::info;

use crate::quiz::models::Question;

static BUNDLED_CATALOG: &str = include_str!("../../data/quiz.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Question id {0} appears more than once")]
    DuplicateId(u32),

    #[error("Question {id} has answer '{answer}' which is not one of its options")]
    UnknownAnswer { id: u32, answer: String },
}

/// Questions in declaration order, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(CatalogError::DuplicateId(question.id));
            }

            if !question.options.contains_key(&question.answer) {
                return Err(CatalogError::UnknownAnswer {
                    id: question.id,
                    answer: question.answer.clone(),
                });
            }
        }

        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                info!("Loading quiz catalog from {}", path);
                Self::from_json(&fs::read_to_string(Path::new(path))?)?
            }
            None => Self::bundled()?,
        };

        info!("Quiz catalog loaded with {} questions", catalog.len());
        Ok(catalog)
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
