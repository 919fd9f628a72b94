//! # quiz-manager
//!
//! An interactive quiz manager served over a line-based TCP connection.
//! Clients list, add, edit, delete and answer quizzes, or play a game that
//! asks every quiz once in random order until the first wrong answer.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_manager::{Config, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // In-memory store seeded with the default quizzes, on 127.0.0.1:3030
//!     quiz_manager::run(Config::default()).await
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod protocol;
pub mod server;

pub use config::{Config, Listen};
pub use data::{JsonFileStore, MemoryStore, QuizStore, StoreError};
pub use error::{CommandError, QuizError};
pub use models::{Quiz, QuizDraft, QuizId};

/// Open the configured store and serve sessions until shutdown.
pub async fn run(config: Config) -> Result<(), QuizError> {
    let store = config.open_store().await?;

    match &config.listen {
        Listen::Tcp { host, port } => server::run(&format!("{host}:{port}"), store).await,
        Listen::Stdio => server::run_stdio(store).await,
    }
}
