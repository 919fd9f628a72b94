//! Line-oriented prompt channel over any async reader/writer pair.

use std::io;

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::error::CommandError;
use crate::protocol::MAX_LINE_LENGTH;

/// Where a session writes its output and reads its input.
#[async_trait]
pub trait PromptChannel: Send {
    /// Write one line of output.
    async fn emit_line(&mut self, line: &str) -> io::Result<()>;

    /// Show `prompt` and wait for the next input line.
    ///
    /// Returns `None` once the peer has closed its side.
    async fn request_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Whether the input buffer can be pre-filled before a request.
    fn supports_prefill(&self) -> bool {
        false
    }

    /// Like `request_line`, with `initial` placed in the input buffer when
    /// the channel supports it.
    async fn request_line_prefilled(
        &mut self,
        prompt: &str,
        initial: &str,
    ) -> io::Result<Option<String>> {
        let _ = initial;
        self.request_line(prompt).await
    }

    /// Release the channel. Nothing is read or written afterwards.
    async fn close(&mut self) -> io::Result<()>;
}

/// Ask for a line and trim it. A closed channel aborts the calling handler.
pub async fn ask<C>(channel: &mut C, prompt: &str) -> Result<String, CommandError>
where
    C: PromptChannel + ?Sized,
{
    channel
        .request_line(prompt)
        .await?
        .map(|line| line.trim().to_string())
        .ok_or(CommandError::ChannelClosed)
}

/// `ask` with the current value pre-filled where possible.
pub async fn ask_prefilled<C>(
    channel: &mut C,
    prompt: &str,
    initial: &str,
) -> Result<String, CommandError>
where
    C: PromptChannel + ?Sized,
{
    let line = if channel.supports_prefill() {
        channel.request_line_prefilled(prompt, initial).await?
    } else {
        channel.request_line(prompt).await?
    };
    line.map(|line| line.trim().to_string())
        .ok_or(CommandError::ChannelClosed)
}

/// Plain text channel: no pre-fill, `\n`-terminated lines.
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
}

/// Channel over an accepted TCP connection.
pub type TcpChannel = LineChannel<BufReader<OwnedReadHalf>, OwnedWriteHalf>;

impl<R, W> LineChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read one line without its `\n` or `\r\n` ending. Bytes that are not
    /// UTF-8 are replaced rather than rejected, so the dispatcher sees them
    /// as an ordinary (unknown) command.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        // Room for the longest line plus a CRLF ending.
        let limit = MAX_LINE_LENGTH as u64 + 2;
        let read = (&mut self.reader).take(limit).read_until(b'\n', &mut buf).await?;
        if read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        if buf.len() > MAX_LINE_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "input line too long",
            ));
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

impl TcpChannel {
    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self::new(BufReader::new(reader), writer)
    }
}

#[async_trait]
impl<R, W> PromptChannel for LineChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn emit_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    async fn request_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.writer.write_all(prompt.as_bytes()).await?;
        self.writer.flush().await?;
        self.read_line().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::data::{MemoryStore, QuizStore};
    use crate::protocol::FAREWELL;
    use crate::server::Session;

    fn channel(input: &'static [u8]) -> LineChannel<&'static [u8], Vec<u8>> {
        LineChannel::new(input, Vec::new())
    }

    #[tokio::test]
    async fn test_request_line_writes_prompt_and_strips_line_endings() {
        let mut ch = channel(b"list\r\nshow 1\nlast");
        assert_eq!(ch.request_line("> ").await.unwrap().as_deref(), Some("list"));
        assert_eq!(ch.request_line("> ").await.unwrap().as_deref(), Some("show 1"));
        assert_eq!(ch.request_line("> ").await.unwrap().as_deref(), Some("last"));
        assert_eq!(ch.request_line("> ").await.unwrap(), None);
        assert_eq!(ch.writer, b"> > > > ".to_vec());
    }

    #[tokio::test]
    async fn test_emit_line_appends_newline() {
        let mut ch = channel(b"");
        ch.emit_line("hello").await.unwrap();
        assert_eq!(ch.writer, b"hello\n".to_vec());
    }

    #[tokio::test]
    async fn test_overlong_line_is_rejected() {
        let input: &'static [u8] = Box::leak(vec![b'x'; MAX_LINE_LENGTH + 10].into_boxed_slice());
        let mut ch = channel(input);
        let err = ch.request_line("> ").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_line_length_excludes_line_ending() {
        let mut full = vec![b'x'; MAX_LINE_LENGTH];
        full.extend_from_slice(b"\r\n");
        full.extend_from_slice(&[b'y'; MAX_LINE_LENGTH]);
        full.push(b'\n');
        let mut ch = channel(Box::leak(full.into_boxed_slice()));
        for _ in 0..2 {
            let line = ch.request_line("> ").await.unwrap().unwrap();
            assert_eq!(line.len(), MAX_LINE_LENGTH);
        }

        let mut over = vec![b'x'; MAX_LINE_LENGTH + 1];
        over.extend_from_slice(b"\r\n");
        let mut ch = channel(Box::leak(over.into_boxed_slice()));
        let err = ch.request_line("> ").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let mut ch = channel(b"\xff\xfe\nok\n");
        assert_eq!(ch.request_line("> ").await.unwrap().as_deref(), Some("\u{fffd}\u{fffd}"));
        assert_eq!(ch.request_line("> ").await.unwrap().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_command_does_not_end_session() {
        let store: Arc<dyn QuizStore> = Arc::new(MemoryStore::new());
        let mut session = Session::new(
            channel(b"\xff\xfe\nadd\nQ\nA\nlist\nquit\n"),
            Arc::clone(&store),
            StdRng::seed_from_u64(3),
        );
        session.run().await.unwrap();

        let output = String::from_utf8(session.channel.writer.clone()).unwrap();
        let hint = output.find("Use 'help' to see all available commands.").unwrap();
        let listed = output.find(" [1]: Q\n").unwrap();
        assert!(hint < listed, "{output}");
        assert!(output.ends_with(&format!("{FAREWELL}\n")), "{output}");
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ask_trims_and_reports_closed_channel() {
        let mut ch = channel(b"  Paris  \n");
        assert_eq!(ask(&mut ch, "? ").await.unwrap(), "Paris");
        assert!(matches!(ask(&mut ch, "? ").await, Err(CommandError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_prefill_is_skipped_on_plain_channels() {
        let mut ch = channel(b"new question\n");
        assert!(!ch.supports_prefill());
        let line = ask_prefilled(&mut ch, "? ", "old question").await.unwrap();
        assert_eq!(line, "new question");
        assert_eq!(ch.writer, b"? ".to_vec());
    }
}
