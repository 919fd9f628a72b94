//! Quiz server module.
//!
//! Line-based command sessions over TCP (or stdio).

mod channel;
mod commands;
mod game;
mod server;
mod session;
#[cfg(test)]
mod testing;

pub use channel::{ask, ask_prefilled, LineChannel, PromptChannel, TcpChannel};
pub use commands::{execute_command, parse_id, Command, CommandResult};
pub use game::{play, Game, GameOutcome, GameState};
pub use server::{run, run_stdio, serve};
pub use session::Session;
