//! Store persisted as a single JSON document.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::{Quiz, QuizDraft, QuizId};

use super::memory::QuizTable;
use super::store::{QuizStore, StoreError};

/// Keeps the table in memory and rewrites the file after every mutation.
///
/// The lock is held across the write, so mutations from concurrent sessions
/// reach the disk in the order they were applied.
pub struct JsonFileStore {
    path: PathBuf,
    table: Mutex<QuizTable>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read or parsed.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let table = match fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str::<QuizTable>(&json)?.normalize()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "data file not found, starting empty");
                QuizTable::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &QuizTable) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "quizzes written");
        Ok(())
    }
}

#[async_trait]
impl QuizStore for JsonFileStore {
    async fn find_all(&self) -> Result<Vec<Quiz>, StoreError> {
        Ok(self.table.lock().await.all())
    }

    async fn find_by_id(&self, id: QuizId) -> Result<Option<Quiz>, StoreError> {
        Ok(self.table.lock().await.get(id))
    }

    async fn create(&self, draft: QuizDraft) -> Result<Quiz, StoreError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let quiz = next.insert(draft)?;
        self.persist(&next).await?;
        *table = next;
        Ok(quiz)
    }

    async fn destroy(&self, id: QuizId) -> Result<bool, StoreError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        if !next.remove(id) {
            return Ok(false);
        }
        self.persist(&next).await?;
        *table = next;
        Ok(true)
    }

    async fn save(&self, quiz: &Quiz) -> Result<Quiz, StoreError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let saved = next.update(quiz)?;
        self.persist(&next).await?;
        *table = next;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("quizzes.json")).await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizzes.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            let first = store.create(QuizDraft::new("Capital of Italy", "Rome")).await.unwrap();
            let mut second = store.create(QuizDraft::new("Capital of Spain", "Madird")).await.unwrap();
            second.answer = "Madrid".to_string();
            store.save(&second).await.unwrap();
            store.destroy(first.id).await.unwrap();
        }

        let store = JsonFileStore::open(&path).await.unwrap();
        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 2);
        assert_eq!(all[0].answer, "Madrid");

        let third = store.create(QuizDraft::new("Capital of Portugal", "Lisbon")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_rejected_create_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizzes.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        assert!(store.create(QuizDraft::new("", "x")).await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizzes.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_ids_in_file_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizzes.json");
        let json = r#"{"next_id":3,"quizzes":[
            {"id":2,"question":"q","answer":"a"},
            {"id":2,"question":"other","answer":"b"}
        ]}"#;
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::DuplicateId(2))
        ));
    }
}
