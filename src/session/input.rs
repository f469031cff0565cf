use anyhow::Result;
use futures::StreamExt;
use tokio::{io::AsyncBufRead, io::AsyncBufReadExt, sync::mpsc};
use tokio_stream::wrappers::LinesStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::request::{parse_line, Request, SessionInput};

/// Reads session input line by line and forwards it to the processor. Reading stops at end of
/// input, on `quit`, or when the session is cancelled. Dropping the reader closes the channel,
/// which in turn stops the processor.
pub struct InputReader<R> {
    source: R,
    next: mpsc::Sender<SessionInput>,
    shutdown: CancellationToken,
}

impl<R: AsyncBufRead + Unpin> InputReader<R> {
    pub fn new(source: R, next: mpsc::Sender<SessionInput>, shutdown: CancellationToken) -> Self {
        Self {
            source,
            next,
            shutdown,
        }
    }

    /// Executes the reader loop.
    pub async fn run(self) -> Result<()> {
        let mut lines = LinesStream::new(self.source.lines());
        loop {
            let line = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Session cancelled, stopping input");
                    return Ok(())
                }
                line = lines.next() => line,
            };

            let Some(line) = line.transpose()? else {
                debug!("End of input");
                return Ok(());
            };

            let Some(input) = parse_line(&line) else {
                continue;
            };
            let quit = matches!(input, SessionInput::Request(Request::Quit));

            debug!("Sending input {:?}", input);
            self.next
                .send(input)
                .await
                .inspect_err(|e| error!("Processor is gone, dropping input {e:?}"))?;

            if quit {
                return Ok(());
            }
        }
    }
}
