//! Operator yes/no confirmation before a write.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

/// Asks the operator to approve one write.
#[allow(async_fn_in_trait)]
pub trait Confirmer {
    /// Show `summary` and return whether the operator agreed.
    async fn confirm(&mut self, summary: &str) -> io::Result<bool>;
}

impl<C: Confirmer> Confirmer for &mut C {
    async fn confirm(&mut self, summary: &str) -> io::Result<bool> {
        (**self).confirm(summary).await
    }
}

/// Interpret one answer line. Only a literal `n` (any case, surrounding
/// whitespace ignored) declines; an empty line accepts.
pub fn is_assent(line: &str) -> bool {
    !line.trim().eq_ignore_ascii_case("n")
}

/// Line-oriented prompt over any reader/writer pair.
///
/// Owned by a single orchestrator run; the underlying handles are released
/// when it is dropped.
pub struct LineConfirmer<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LineConfirmer<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl LineConfirmer<BufReader<Stdin>, Stdout> {
    /// Prompt on stdout and read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Confirmer for LineConfirmer<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn confirm(&mut self, summary: &str) -> io::Result<bool> {
        self.writer
            .write_all(format!("{summary} (Y/n): ").as_bytes())
            .await?;
        self.writer.flush().await?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            // closed input counts as the empty answer
            self.writer.write_all(b"\n").await?;
            self.writer.flush().await?;
        }
        let accepted = is_assent(&line);
        tracing::debug!(accepted, "operator answered");
        Ok(accepted)
    }
}

/// Approves every write without prompting (`--yes`).
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    async fn confirm(&mut self, summary: &str) -> io::Result<bool> {
        tracing::info!(%summary, "confirmed without prompting");
        Ok(true)
    }
}
