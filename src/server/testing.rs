//! Scripted prompt channel for driving handlers in tests.

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;

use super::channel::PromptChannel;

type Responder = Box<dyn FnMut(&str) -> Option<String> + Send>;

pub(crate) struct ScriptedChannel {
    responder: Responder,
    prefill: bool,
    /// Every emitted line, in order.
    pub lines: Vec<String>,
    /// Every prompt shown, excluding the command prompt.
    pub prompts: Vec<String>,
    /// Values offered for pre-fill, in order.
    pub prefills: Vec<String>,
    pub closed: bool,
}

impl ScriptedChannel {
    /// Answer prompts from a fixed list, then report the peer as gone.
    pub fn with_inputs<'a>(inputs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut queue: VecDeque<String> = inputs.into_iter().map(str::to_string).collect();
        Self::with_responder(move |_| queue.pop_front())
    }

    /// Answer each prompt with `f(prompt)`; `None` closes the channel.
    pub fn with_responder(f: impl FnMut(&str) -> Option<String> + Send + 'static) -> Self {
        Self {
            responder: Box::new(f),
            prefill: false,
            lines: Vec::new(),
            prompts: Vec::new(),
            prefills: Vec::new(),
            closed: false,
        }
    }

    pub fn with_prefill(mut self) -> Self {
        self.prefill = true;
        self
    }

    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

#[async_trait]
impl PromptChannel for ScriptedChannel {
    async fn emit_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    async fn request_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if prompt != crate::protocol::PROMPT {
            self.prompts.push(prompt.to_string());
        }
        Ok((self.responder)(prompt))
    }

    fn supports_prefill(&self) -> bool {
        self.prefill
    }

    async fn request_line_prefilled(
        &mut self,
        prompt: &str,
        initial: &str,
    ) -> io::Result<Option<String>> {
        self.prefills.push(initial.to_string());
        self.request_line(prompt).await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
