use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, filtered by `RUST_LOG`
///
/// Calling it again is a no-op, the host may initialise more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("logging already initialised");
    }
}

#[uniffi::export]
fn init_logging() {
    init();
}
