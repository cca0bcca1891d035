pub mod admission; // Patient and admission context
pub mod api; // Read-only JSON API
pub mod catalog; // Unified item catalog + browsing
pub mod config;
pub mod db;
pub mod documents; // Discharge notes, ECG measurements and records
pub mod events; // Windowed event retrieval

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// [`config::default_log_filter`].
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
