//! Lines written to the client.
//!
//! Everything a session prints goes through these helpers so the wording
//! stays in one place.

use crate::models::Quiz;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3030;

/// Longest accepted input line, in bytes.
pub const MAX_LINE_LENGTH: usize = 4096;

/// Command prompt, written without a trailing newline.
pub const PROMPT: &str = "quiz > ";

pub const WELCOME: &str = "Quiz manager. Type 'help' to see the available commands.";

pub const FAREWELL: &str = "Bye!";

pub const ASK_QUESTION: &str = " Enter the question: ";
pub const ASK_ANSWER: &str = " Enter the answer: ";

pub const HELP: &[&str] = &[
    "Commands:",
    "  h|help       - Show this help.",
    "  list         - List the existing quizzes.",
    "  show <id>    - Show the question and answer of a quiz.",
    "  add          - Add a new quiz interactively.",
    "  delete <id>  - Delete a quiz.",
    "  edit <id>    - Edit a quiz.",
    "  test <id>    - Try to answer a quiz.",
    "  p|play       - Answer every quiz in random order.",
    "  credits      - Credits.",
    "  q|quit       - Leave.",
];

pub const CORRECT: &str = "Correct";
pub const INCORRECT: &str = "Incorrect";

pub fn error_line(message: &str) -> String {
    format!("ERROR: {message}")
}

pub fn unknown_command(token: &str) -> [String; 2] {
    [
        format!("Unknown command: '{token}'"),
        "Use 'help' to see all available commands.".to_string(),
    ]
}

pub fn list_entry(quiz: &Quiz) -> String {
    format!(" [{}]: {}", quiz.id, quiz.question)
}

pub fn show_entry(quiz: &Quiz) -> String {
    format!(" [{}]: {} => {}", quiz.id, quiz.question, quiz.answer)
}

pub fn added(quiz: &Quiz) -> String {
    format!(" [{}] added: {} => {}", quiz.id, quiz.question, quiz.answer)
}

pub fn changed(quiz: &Quiz) -> String {
    format!(" Quiz {} changed to: {} => {}", quiz.id, quiz.question, quiz.answer)
}

/// Prompt used when asking a quiz's question.
pub fn question_prompt(quiz: &Quiz) -> String {
    let question = quiz.question.trim_end();
    if question.ends_with('?') {
        format!("{question} ")
    } else {
        format!("{question}? ")
    }
}

pub fn running_score(score: usize) -> String {
    format!("CORRECT - {score} right so far.")
}

pub const WRONG: &str = "INCORRECT.";
pub const NOTHING_LEFT: &str = "Nothing left to ask.";

/// Final score lines: a summary followed by the score set apart.
pub fn final_score(score: usize) -> [String; 2] {
    [
        format!("End of the game. Score: {score}"),
        format!("*** {score} ***"),
    ]
}

/// Author lines, taken from the package manifest.
pub fn credits() -> Vec<String> {
    let mut lines = vec!["Authors:".to_string()];
    lines.extend(
        env!("CARGO_PKG_AUTHORS")
            .split(':')
            .filter(|a| !a.is_empty())
            .map(|a| format!("  {a}")),
    );
    lines
}
