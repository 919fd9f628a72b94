//! Record store contract for quizzes.

use std::io;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Quiz, QuizDraft, QuizId, ValidationErrors};

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The record was rejected; carries every failing field.
    #[error("invalid quiz: {0}")]
    Validation(ValidationErrors),

    /// A save targeted a record that no longer exists.
    #[error("no quiz with id={0}")]
    Missing(QuizId),

    /// Stored data holds two quizzes with the same id.
    #[error("duplicate quiz id={0} in stored data")]
    DuplicateId(QuizId),

    #[error("no quiz ids left to assign")]
    IdsExhausted,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}

/// Persistence operations over the `Quiz` entity.
///
/// Implementations serialize their own mutations; callers never lock.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Every quiz, ordered by ascending id.
    async fn find_all(&self) -> Result<Vec<Quiz>, StoreError>;

    async fn find_by_id(&self, id: QuizId) -> Result<Option<Quiz>, StoreError>;

    /// Validate and insert a new quiz, assigning its id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if the question or answer is blank.
    async fn create(&self, draft: QuizDraft) -> Result<Quiz, StoreError>;

    /// Remove a quiz. Returns whether anything was removed; a missing id is
    /// not an error.
    async fn destroy(&self, id: QuizId) -> Result<bool, StoreError>;

    /// Validate and persist the new question/answer of an existing quiz.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` on blank fields and
    /// `StoreError::Missing` if the id is no longer stored.
    async fn save(&self, quiz: &Quiz) -> Result<Quiz, StoreError>;
}
