use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "similar_products_api=info,tower_http=info";

/// Filter from `RUST_LOG`, falling back to the service default
///
/// Reads the process environment, so a `.env` file must be loaded first.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global fmt subscriber
pub fn init() {
    // a subscriber may already be installed, e.g. by a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init();
}
