pub mod persistence;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber; `RUST_LOG` overrides the `yakstra_core=info` default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("yakstra_core=info"));

        // The host application may already own the global subscriber.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
