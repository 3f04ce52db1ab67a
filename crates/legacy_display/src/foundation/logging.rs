//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
///
/// Calling this more than once is harmless; only the first call installs a logger.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still takes precedence when it is set. The level string uses
/// the usual `env_logger` filter syntax (`"info"`, `"legacy_display=debug"`, ...).
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}
