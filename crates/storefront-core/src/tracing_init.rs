//! Tracing subscriber setup shared by binaries and test harnesses.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `default_filter` is used when `RUST_LOG` is unset (e.g.
/// `"storefront_catalog=info"`). With `log_json` the output is one JSON
/// object per line; otherwise a compact human-readable format.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
