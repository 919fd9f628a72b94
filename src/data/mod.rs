//! Quiz persistence.

mod json_file;
mod loader;
mod memory;
mod store;

pub use json_file::JsonFileStore;
pub use loader::{default_quizzes, import, load_drafts_from_json, seed_if_empty, LoadError};
pub use memory::MemoryStore;
pub use store::{QuizStore, StoreError};
