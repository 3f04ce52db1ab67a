//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Logging setup
//! - Monotonic timestamps and frame pacing

pub mod logging;
pub mod time;
