//! Command parser and handlers.
//!
//! Each handler runs to completion (or failure) before the session asks for
//! the next command. Errors stop at `execute_command`, which prints them and
//! lets the session continue.

use rand::Rng;
use tracing::{debug, warn};

use crate::data::QuizStore;
use crate::error::CommandError;
use crate::models::{QuizDraft, QuizId};
use crate::protocol::{
    self, added, changed, error_line, list_entry, question_prompt, show_entry, unknown_command,
    ASK_ANSWER, ASK_QUESTION, CORRECT, FAREWELL, HELP, INCORRECT,
};

use super::channel::{ask, ask_prefilled, PromptChannel};
use super::game;
use super::session::Session;

/// What the session does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Show the prompt again.
    Continue,
    /// Close the session without another prompt.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show,
    Add,
    Delete,
    Edit,
    Test,
    Play,
    Credits,
    Quit,
}

impl Command {
    /// Recognize a command token, case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        let command = match token.to_lowercase().as_str() {
            "h" | "help" => Command::Help,
            "list" => Command::List,
            "show" => Command::Show,
            "add" => Command::Add,
            "delete" => Command::Delete,
            "edit" => Command::Edit,
            "test" => Command::Test,
            "p" | "play" => Command::Play,
            "credits" => Command::Credits,
            "q" | "quit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Parse the `<id>` argument.
///
/// Takes the leading integer of the token and ignores whatever follows it,
/// so `"12abc"` is 12 and `"abc"` is not a number.
pub fn parse_id(token: Option<&str>) -> Result<QuizId, CommandError> {
    let token = token.ok_or(CommandError::MissingParameter)?;
    let trimmed = token.trim_start();

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(CommandError::NotANumber(token.to_string()));
    }

    format!("{sign}{}", &rest[..digits])
        .parse()
        .map_err(|_| CommandError::NotANumber(token.to_string()))
}

/// Parse and run one input line.
///
/// Returns `Err` only when the channel is gone and the session must end.
pub async fn execute_command<C, R>(
    session: &mut Session<C, R>,
    input: &str,
) -> Result<CommandResult, CommandError>
where
    C: PromptChannel,
    R: Rng + Send,
{
    let mut words = input.split_whitespace();
    let Some(token) = words.next() else {
        return Ok(CommandResult::Continue);
    };
    let arg = words.next();

    let Some(command) = Command::parse(token) else {
        for line in unknown_command(token) {
            session.channel.emit_line(&line).await?;
        }
        return Ok(CommandResult::Continue);
    };
    debug!(session = %session.id, ?command, arg, "dispatching");

    let store = session.store.as_ref();
    let channel = &mut session.channel;
    let result = match command {
        Command::Help => cmd_help(channel).await,
        Command::List => cmd_list(channel, store).await,
        Command::Show => cmd_show(channel, store, arg).await,
        Command::Add => cmd_add(channel, store).await,
        Command::Delete => cmd_delete(store, arg).await,
        Command::Edit => cmd_edit(channel, store, arg).await,
        Command::Test => cmd_test(channel, store, arg).await,
        Command::Play => cmd_play(channel, store, &mut session.rng).await,
        Command::Credits => cmd_credits(channel).await,
        Command::Quit => cmd_quit(channel).await,
    };

    match result {
        Ok(next) => Ok(next),
        Err(err) if err.is_recoverable() => {
            if let CommandError::Store(ref e) = err {
                warn!(session = %session.id, error = %e, "store operation failed");
            }
            report(&mut session.channel, &err).await?;
            Ok(CommandResult::Continue)
        }
        Err(err) => Err(err),
    }
}

/// Print an error, with one extra line per rejected field.
async fn report<C>(channel: &mut C, err: &CommandError) -> Result<(), CommandError>
where
    C: PromptChannel + ?Sized,
{
    channel.emit_line(&error_line(&err.to_string())).await?;
    if let CommandError::ValidationFailed(errors) = err {
        for message in errors.messages() {
            channel.emit_line(&error_line(message)).await?;
        }
    }
    Ok(())
}

async fn cmd_help<C: PromptChannel + ?Sized>(channel: &mut C) -> Result<CommandResult, CommandError> {
    for line in HELP {
        channel.emit_line(line).await?;
    }
    Ok(CommandResult::Continue)
}

async fn cmd_list<C: PromptChannel + ?Sized>(
    channel: &mut C,
    store: &dyn QuizStore,
) -> Result<CommandResult, CommandError> {
    for quiz in store.find_all().await? {
        channel.emit_line(&list_entry(&quiz)).await?;
    }
    Ok(CommandResult::Continue)
}

async fn cmd_show<C: PromptChannel + ?Sized>(
    channel: &mut C,
    store: &dyn QuizStore,
    arg: Option<&str>,
) -> Result<CommandResult, CommandError> {
    let id = parse_id(arg)?;
    let quiz = store.find_by_id(id).await?.ok_or(CommandError::NotFound(id))?;
    channel.emit_line(&show_entry(&quiz)).await?;
    Ok(CommandResult::Continue)
}

async fn cmd_add<C: PromptChannel + ?Sized>(
    channel: &mut C,
    store: &dyn QuizStore,
) -> Result<CommandResult, CommandError> {
    let question = ask(channel, ASK_QUESTION).await?;
    let answer = ask(channel, ASK_ANSWER).await?;
    let quiz = store.create(QuizDraft::new(question, answer)).await?;
    channel.emit_line(&added(&quiz)).await?;
    Ok(CommandResult::Continue)
}

/// Deleting an id that does not exist is not an error.
async fn cmd_delete(store: &dyn QuizStore, arg: Option<&str>) -> Result<CommandResult, CommandError> {
    let id = parse_id(arg)?;
    store.destroy(id).await?;
    Ok(CommandResult::Continue)
}

async fn cmd_edit<C: PromptChannel + ?Sized>(
    channel: &mut C,
    store: &dyn QuizStore,
    arg: Option<&str>,
) -> Result<CommandResult, CommandError> {
    let id = parse_id(arg)?;
    let mut quiz = store.find_by_id(id).await?.ok_or(CommandError::NotFound(id))?;

    let question = ask_prefilled(channel, ASK_QUESTION, &quiz.question).await?;
    let answer = ask_prefilled(channel, ASK_ANSWER, &quiz.answer).await?;
    quiz.question = question;
    quiz.answer = answer;

    let quiz = store.save(&quiz).await?;
    channel.emit_line(&changed(&quiz)).await?;
    Ok(CommandResult::Continue)
}

async fn cmd_test<C: PromptChannel + ?Sized>(
    channel: &mut C,
    store: &dyn QuizStore,
    arg: Option<&str>,
) -> Result<CommandResult, CommandError> {
    let id = parse_id(arg)?;
    let quiz = store.find_by_id(id).await?.ok_or(CommandError::NotFound(id))?;

    let response = ask(channel, &question_prompt(&quiz)).await?;
    let verdict = if quiz.is_correct(&response) { CORRECT } else { INCORRECT };
    channel.emit_line(verdict).await?;
    Ok(CommandResult::Continue)
}

async fn cmd_play<C, R>(
    channel: &mut C,
    store: &dyn QuizStore,
    rng: &mut R,
) -> Result<CommandResult, CommandError>
where
    C: PromptChannel + ?Sized,
    R: Rng + Send,
{
    let quizzes = store.find_all().await?;
    let outcome = game::play(channel, quizzes, rng).await?;
    debug!(state = ?outcome.state, score = outcome.score, "game over");
    Ok(CommandResult::Continue)
}

async fn cmd_credits<C: PromptChannel + ?Sized>(channel: &mut C) -> Result<CommandResult, CommandError> {
    for line in protocol::credits() {
        channel.emit_line(&line).await?;
    }
    Ok(CommandResult::Continue)
}

async fn cmd_quit<C: PromptChannel + ?Sized>(channel: &mut C) -> Result<CommandResult, CommandError> {
    channel.emit_line(FAREWELL).await?;
    Ok(CommandResult::Quit)
}
