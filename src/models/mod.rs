mod quiz;

pub use quiz::{FieldError, Quiz, QuizDraft, QuizId, ValidationErrors};
