//! Interactive session: one task reads lines, another owns the store and applies them.

use std::io::Write;

use anyhow::Result;
use input::InputReader;
use processing::{OutputSettings, SessionProcessor};
use request::SessionInput;
use tokio::{
    io::{AsyncBufRead, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::activities::{factory::CommandFactory, store::ActivityStore};

pub mod input;
pub mod processing;
pub mod request;
pub mod shutdown;

const INPUT_BUFFER: usize = 10;

/// Runs a session over stdin and stdout until end of input, `quit` or Ctrl-C.
pub async fn start_session(
    store: ActivityStore,
    factory: CommandFactory,
    settings: OutputSettings,
) -> Result<ActivityStore> {
    let shutdown_token = CancellationToken::new();

    let (_, session_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        run_session(
            BufReader::new(tokio::io::stdin()),
            std::io::stdout(),
            store,
            factory,
            settings,
            shutdown_token.clone(),
        ),
    );

    let store = session_result?;
    info!(
        "Session finished after {} commands",
        store.history().len()
    );
    Ok(store)
}

/// Either side finishing cancels `shutdown_token`, so the other one never waits forever.
pub async fn run_session<R, W>(
    source: R,
    out: W,
    store: ActivityStore,
    factory: CommandFactory,
    settings: OutputSettings,
    shutdown_token: CancellationToken,
) -> Result<ActivityStore>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (sender, receiver) = mpsc::channel::<SessionInput>(INPUT_BUFFER);

    let reader = InputReader::new(source, sender, shutdown_token.clone());
    let processor = SessionProcessor::new(receiver, store, factory, settings, out);

    let (input_result, processing_result) = tokio::join!(
        async {
            let result = reader.run().await;
            shutdown_token.cancel();
            result
        },
        async {
            let result = processor.run().await;
            shutdown_token.cancel();
            result
        },
    );

    if let Err(input_result) = input_result {
        error!("Input reader got an error {:?}", input_result);
    }

    processing_result.inspect_err(|e| error!("Processor got an error {e:?}"))
}
