use anyhow::Result;

/// Every dispatch happens on one thread, one after another, so the whole application runs on a
/// current-thread runtime.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
