use tokio::select;
use tokio_util::sync::CancellationToken;

/// Cancels the session on Ctrl-C. Returns early when the session ends on its own.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
