// src/log.rs
//
// Thin macro layer over `tracing`. Library code logs through `logf!`/`logd!`/
// `logw!`/`loge!`; only the binary installs a subscriber via `init`.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global fmt subscriber. `verbosity` counts `-v` flags.
/// `RUST_LOG` wins over the flag when set. Calling twice is harmless.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "market_enrich=info",
        1 => "market_enrich=debug",
        _ => "market_enrich=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
