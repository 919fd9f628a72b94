//! Error types shared across the crate.

use std::io;

use thiserror::Error;

use crate::data::{LoadError, StoreError};
use crate::models::{QuizId, ValidationErrors};

/// Failure of a single command. Caught at the handler boundary and shown to
/// the client; only `ChannelClosed` and `Io` end the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    #[error("Missing parameter <id>.")]
    MissingParameter,

    #[error("The value of parameter <id> is not a number: '{0}'.")]
    NotANumber(String),

    #[error("There is no quiz with id={0}.")]
    NotFound(QuizId),

    #[error("The quiz is invalid:")]
    ValidationFailed(ValidationErrors),

    #[error("{0}")]
    Store(StoreError),

    /// The peer went away while a prompt was pending.
    #[error("connection closed")]
    ChannelClosed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CommandError {
    /// Whether the session can go on after reporting this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CommandError::ChannelClosed | CommandError::Io(_))
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => CommandError::ValidationFailed(errors),
            StoreError::Missing(id) => CommandError::NotFound(id),
            other => CommandError::Store(other),
        }
    }
}

/// Error type for starting and running the quiz server.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load quizzes: {0}")]
    Load(#[from] LoadError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("session failed: {0}")]
    Session(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
