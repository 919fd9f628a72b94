use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::QuizDraft;

use super::store::{QuizStore, StoreError};

/// Errors raised while loading quizzes into a store at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Quizzes created on an empty store.
pub fn default_quizzes() -> Vec<QuizDraft> {
    vec![
        QuizDraft::new("Capital of Italy", "Rome"),
        QuizDraft::new("Capital of France", "Paris"),
        QuizDraft::new("Capital of Spain", "Madrid"),
        QuizDraft::new("Capital of Portugal", "Lisbon"),
    ]
}

/// Read a JSON array of `{ "question": ..., "answer": ... }` objects.
pub fn load_drafts_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<QuizDraft>, LoadError> {
    let path = path.as_ref();

    let json = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&json).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Create the default quizzes if the store holds none. Returns how many were added.
pub async fn seed_if_empty(store: &dyn QuizStore) -> Result<usize, LoadError> {
    if !store.find_all().await?.is_empty() {
        return Ok(0);
    }
    let added = import(store, default_quizzes()).await?;
    info!(count = added, "seeded default quizzes");
    Ok(added)
}

/// Create every draft, stopping at the first one the store rejects.
pub async fn import(store: &dyn QuizStore, drafts: Vec<QuizDraft>) -> Result<usize, LoadError> {
    let mut added = 0;
    for draft in drafts {
        store.create(draft).await?;
        added += 1;
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryStore;

    #[tokio::test]
    async fn test_seed_only_fills_an_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(seed_if_empty(&store).await.unwrap(), 4);
        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(store.find_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_import_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.json");
        fs::write(
            &path,
            r#"[{"question": "2 + 2", "answer": "4"}, {"question": "Largest planet", "answer": "Jupiter"}]"#,
        )
        .unwrap();

        let drafts = load_drafts_from_json(&path).unwrap();
        let store = MemoryStore::new();
        assert_eq!(import(&store, drafts).await.unwrap(), 2);
        assert_eq!(store.find_by_id(2).await.unwrap().unwrap().answer, "Jupiter");
    }

    #[test]
    fn test_missing_import_file_names_the_path() {
        let err = load_drafts_from_json("/nonexistent/quizzes.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/quizzes.json"));
    }
}
