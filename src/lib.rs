pub mod config;
pub mod models;
pub mod normalize;
pub mod symptoms;
pub mod vision;
pub mod escalation;
pub mod triage;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, falling back to
/// [`config::default_log_filter`]. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("{} core v{}", config::APP_NAME, config::APP_VERSION);
}
