//! Tracing subscriber setup.
//!
//! Embedders call [`init`] once at startup. The filter comes from `RUST_LOG`
//! when set, otherwise `todoledger=info`; `TODOLEDGER_DEBUG` raises the
//! default to `debug`. Calling `init` again is harmless.

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "todoledger=info";
pub const DEBUG_FILTER: &str = "todoledger=debug";

pub fn init() {
    let default = if std::env::var("TODOLEDGER_DEBUG").is_ok() {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed by the embedding application.
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
