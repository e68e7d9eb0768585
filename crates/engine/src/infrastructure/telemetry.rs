//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a formatting subscriber filtered by `RUST_LOG`
/// (default `xregions_engine=info`).
///
/// Hosts that already installed a global subscriber keep theirs; this call
/// then does nothing.
pub fn init_tracing() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xregions_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed, keeping the existing one");
    }
}
