//! Runtime configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::data::{import, load_drafts_from_json, seed_if_empty, JsonFileStore, MemoryStore, QuizStore};
use crate::error::QuizError;
use crate::protocol::DEFAULT_PORT;

/// Where sessions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listen {
    /// Accept TCP connections on `host:port`.
    Tcp { host: String, port: u16 },
    /// A single session on stdin/stdout.
    Stdio,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: Listen,
    /// JSON file backing the store; in-memory when `None`.
    pub data: Option<PathBuf>,
    /// Quizzes added at startup.
    pub import: Option<PathBuf>,
    /// Create the default quizzes if the store is empty.
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: Listen::Tcp {
                host: "127.0.0.1".to_string(),
                port: DEFAULT_PORT,
            },
            data: None,
            import: None,
            seed: true,
        }
    }
}

impl Config {
    /// Open the configured store, then apply seeding and imports.
    pub async fn open_store(&self) -> Result<Arc<dyn QuizStore>, QuizError> {
        let store: Arc<dyn QuizStore> = match &self.data {
            Some(path) => {
                let store = JsonFileStore::open(path).await?;
                info!(path = %store.path().display(), "using JSON data file");
                Arc::new(store)
            }
            None => {
                info!("using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        if self.seed {
            seed_if_empty(store.as_ref()).await?;
        }
        if let Some(path) = &self.import {
            let added = import(store.as_ref(), load_drafts_from_json(path)?).await?;
            info!(count = added, path = %path.display(), "imported quizzes");
        }

        Ok(store)
    }
}
