//! The `play` game: every quiz once, in random order, until a wrong answer.

use rand::Rng;

use crate::error::CommandError;
use crate::models::Quiz;
use crate::protocol::{final_score, question_prompt, running_score, NOTHING_LEFT, WRONG};

use super::channel::{ask, PromptChannel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Every quiz was answered correctly.
    Won,
    /// A wrong answer ended the game.
    Lost,
}

/// State of one `play` invocation.
#[derive(Debug)]
pub struct Game {
    pool: Vec<Quiz>,
    score: usize,
    state: GameState,
}

impl Game {
    pub fn new(pool: Vec<Quiz>) -> Self {
        Self {
            pool,
            score: 0,
            state: GameState::Playing,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Take a quiz uniformly at random from the ones not yet asked.
    ///
    /// Returns `None` once the game is over; an empty pool moves it to `Won`.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<Quiz> {
        if self.state != GameState::Playing {
            return None;
        }
        if self.pool.is_empty() {
            self.state = GameState::Won;
            return None;
        }
        let index = rng.random_range(0..self.pool.len());
        Some(self.pool.swap_remove(index))
    }

    /// Grade the response to a drawn quiz. A wrong answer ends the game.
    pub fn submit(&mut self, quiz: &Quiz, response: &str) -> bool {
        if quiz.is_correct(response) {
            self.score += 1;
            true
        } else {
            self.state = GameState::Lost;
            false
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub state: GameState,
    pub score: usize,
}

/// Play a full game over `channel` with the given quizzes.
pub async fn play<C, R>(
    channel: &mut C,
    quizzes: Vec<Quiz>,
    rng: &mut R,
) -> Result<GameOutcome, CommandError>
where
    C: PromptChannel + ?Sized,
    R: Rng + Send,
{
    let mut game = Game::new(quizzes);

    while let Some(quiz) = game.draw(&mut *rng) {
        let response = ask(channel, &question_prompt(&quiz)).await?;
        if game.submit(&quiz, &response) {
            channel.emit_line(&running_score(game.score())).await?;
        } else {
            channel.emit_line(WRONG).await?;
        }
    }

    if game.state() == GameState::Won {
        channel.emit_line(NOTHING_LEFT).await?;
    }
    for line in final_score(game.score()) {
        channel.emit_line(&line).await?;
    }

    Ok(GameOutcome {
        state: game.state(),
        score: game.score(),
    })
}
