//! One client's sequential command loop.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::data::QuizStore;
use crate::error::CommandError;
use crate::protocol::{PROMPT, WELCOME};

use super::channel::PromptChannel;
use super::commands::{execute_command, CommandResult};

/// A connected client: its channel, the shared store and its own RNG.
pub struct Session<C, R> {
    pub(crate) id: Uuid,
    pub(crate) channel: C,
    pub(crate) store: Arc<dyn QuizStore>,
    pub(crate) rng: R,
}

impl<C, R> Session<C, R>
where
    C: PromptChannel,
    R: Rng + Send,
{
    pub fn new(channel: C, store: Arc<dyn QuizStore>, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            store,
            rng,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Read and run commands until `quit` or until the peer goes away.
    ///
    /// The next prompt is only shown after the previous command finished.
    /// The channel is closed however the loop ends.
    pub async fn run(&mut self) -> Result<(), CommandError> {
        let result = self.command_loop().await;
        if let Err(err) = self.channel.close().await {
            debug!(session = %self.id, error = %err, "closing channel failed");
        }
        result
    }

    async fn command_loop(&mut self) -> Result<(), CommandError> {
        self.channel.emit_line(WELCOME).await?;

        loop {
            let Some(line) = self.channel.request_line(PROMPT).await? else {
                debug!(session = %self.id, "peer closed the connection");
                return Ok(());
            };
            match execute_command(self, &line).await {
                Ok(CommandResult::Continue) => {}
                Ok(CommandResult::Quit) => return Ok(()),
                Err(CommandError::ChannelClosed) => {
                    debug!(session = %self.id, "peer closed the connection mid-command");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }
}
