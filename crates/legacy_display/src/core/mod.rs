//! # Core Module
//!
//! Shared configuration types consumed by the display and input layers.

pub mod config;

// Re-export commonly used config types
pub use config::{
    CompatConfig,
    ControllerConfig,
    DisplayConfig,
    RecreatePolicy,
    Config,
    ConfigError,
};
