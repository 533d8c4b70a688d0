//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a fallback filter when `RUST_LOG` is unset
///
/// Returns `false` if a logger was already installed (tests and tools may
/// call this more than once).
pub fn try_init_with_default(default_filter: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init()
        .is_ok()
}

/// Initialize logging from `RUST_LOG`, ignoring an already installed logger
pub fn try_init() -> bool {
    env_logger::try_init().is_ok()
}
