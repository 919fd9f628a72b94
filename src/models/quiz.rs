use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store when a quiz is created.
pub type QuizId = i64;

/// A stored question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub question: String,
    pub answer: String,
}

impl Quiz {
    /// Grade a response against the stored answer.
    ///
    /// Both sides are trimmed and lowercased before an exact comparison.
    pub fn is_correct(&self, response: &str) -> bool {
        normalize(response) == normalize(&self.answer)
    }

    /// The question/answer pair as a draft, for re-validation before saving.
    pub fn draft(&self) -> QuizDraft {
        QuizDraft {
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A quiz that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub question: String,
    pub answer: String,
}

impl QuizDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Check every field, collecting one error per failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.question.trim().is_empty() {
            errors.push(FieldError::new("question", "The question must not be empty."));
        }
        if self.answer.trim().is_empty() {
            errors.push(FieldError::new("answer", "The answer must not be empty."));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All the field errors found while validating a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.messages().collect();
        write!(f, "{}", messages.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital() -> Quiz {
        Quiz {
            id: 1,
            question: "Capital of France".to_string(),
            answer: "Paris".to_string(),
        }
    }

    #[test]
    fn test_grading_ignores_case_and_surrounding_whitespace() {
        let quiz = capital();
        assert!(quiz.is_correct(" paris "));
        assert!(quiz.is_correct("PARIS"));
        assert!(!quiz.is_correct("Pari"));
        assert!(!quiz.is_correct("Par is"));
    }

    #[test]
    fn test_validate_reports_every_empty_field() {
        assert!(QuizDraft::new("Q", "A").validate().is_ok());

        let errors = QuizDraft::new("   ", "").validate().unwrap_err();
        let fields: Vec<_> = errors.0.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["question", "answer"]);

        let errors = QuizDraft::new("Q", " \t").validate().unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].field, "answer");
    }
}
