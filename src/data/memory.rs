use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Quiz, QuizDraft, QuizId};

use super::store::{QuizStore, StoreError};

/// The rows and the id sequence shared by every backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QuizTable {
    next_id: QuizId,
    quizzes: Vec<Quiz>,
}

impl Default for QuizTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            quizzes: Vec::new(),
        }
    }
}

impl QuizTable {
    pub(crate) fn all(&self) -> Vec<Quiz> {
        self.quizzes.clone()
    }

    pub(crate) fn get(&self, id: QuizId) -> Option<Quiz> {
        self.position(id).map(|i| self.quizzes[i].clone())
    }

    pub(crate) fn insert(&mut self, draft: QuizDraft) -> Result<Quiz, StoreError> {
        draft.validate()?;
        let next_id = self.next_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        let quiz = Quiz {
            id: self.next_id,
            question: draft.question,
            answer: draft.answer,
        };
        self.next_id = next_id;
        self.quizzes.push(quiz.clone());
        Ok(quiz)
    }

    pub(crate) fn remove(&mut self, id: QuizId) -> bool {
        match self.position(id) {
            Some(i) => {
                self.quizzes.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn update(&mut self, quiz: &Quiz) -> Result<Quiz, StoreError> {
        quiz.draft().validate()?;
        let i = self.position(quiz.id).ok_or(StoreError::Missing(quiz.id))?;
        self.quizzes[i] = quiz.clone();
        Ok(quiz.clone())
    }

    /// Restore ordering and the id sequence after loading from disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if two rows share an id, and
    /// `StoreError::IdsExhausted` if no id is left above the largest one.
    pub(crate) fn normalize(mut self) -> Result<Self, StoreError> {
        let mut by_id = BTreeMap::new();
        for quiz in self.quizzes.drain(..) {
            let id = quiz.id;
            if by_id.insert(id, quiz).is_some() {
                return Err(StoreError::DuplicateId(id));
            }
        }
        let max_id = by_id.keys().next_back().copied().unwrap_or(0);
        let after_max = max_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        self.next_id = self.next_id.max(after_max);
        self.quizzes = by_id.into_values().collect();
        Ok(self)
    }

    fn position(&self, id: QuizId) -> Option<usize> {
        self.quizzes.binary_search_by_key(&id, |q| q.id).ok()
    }
}

/// Volatile store for tests and for runs without a data file.
#[derive(Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<QuizTable>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut QuizTable) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        f(&mut *guard)
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Quiz>, StoreError> {
        self.with_table(|table| Ok(table.all()))
    }

    async fn find_by_id(&self, id: QuizId) -> Result<Option<Quiz>, StoreError> {
        self.with_table(|table| Ok(table.get(id)))
    }

    async fn create(&self, draft: QuizDraft) -> Result<Quiz, StoreError> {
        self.with_table(|table| table.insert(draft))
    }

    async fn destroy(&self, id: QuizId) -> Result<bool, StoreError> {
        self.with_table(|table| Ok(table.remove(id)))
    }

    async fn save(&self, quiz: &Quiz) -> Result<Quiz, StoreError> {
        self.with_table(|table| table.update(quiz))
    }
}
