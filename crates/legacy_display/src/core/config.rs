//! # Unified Configuration System
//!
//! All tunables of the display and controller layers live here, grouped the
//! way they are consumed:
//!
//! - **Display Config**: window defaults and the recreate-vs-resize policy
//! - **Controller Config**: device enumeration defaults
//! - **Compat Config**: top-level file format wrapping both plus logging
//!
//! Every struct uses `#[serde(default)]`, so a configuration file only needs
//! to mention the values it overrides.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// # Recreate Policy
///
/// Decides whether a display change is satisfied by destroying and recreating
/// the native window or by resizing it in place. Some native backends cannot
/// alter pixel-format-affecting attributes of a live window, which is what
/// `recreate_on_attribute_change` exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecreatePolicy {
    /// Recreate the window for every size change, attribute-affecting or not
    pub always_recreate_on_resize: bool,
    /// Recreate the window when the change alters native pixel-format attributes
    pub recreate_on_attribute_change: bool,
}

impl RecreatePolicy {
    /// Whether a change with the given attribute impact requires recreation
    pub fn should_recreate(&self, attribute_change: bool) -> bool {
        self.always_recreate_on_resize || (attribute_change && self.recreate_on_attribute_change)
    }
}

impl Default for RecreatePolicy {
    fn default() -> Self {
        Self {
            always_recreate_on_resize: false,
            recreate_on_attribute_change: true,
        }
    }
}

/// # Display Configuration
///
/// Defaults applied to the single logical window when it is first created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial window title
    pub title: String,
    /// Recreate-vs-resize policy
    pub recreate: RecreatePolicy,
    /// Whether the window starts resizable
    pub initial_resizable: bool,
    /// Ignore every icon request
    pub disable_window_icon: bool,
    /// Request a debug graphics context
    pub debug_context: bool,
    /// Capacity of the bounded callback message channel
    pub event_channel_capacity: usize,
    /// Swap interval applied when the context is first made current
    pub swap_interval: i32,
}

impl DisplayConfig {
    /// Create a display configuration with defaults
    pub fn new() -> Self {
        Self {
            title: "Game".to_string(),
            recreate: RecreatePolicy::default(),
            initial_resizable: false,
            disable_window_icon: false,
            debug_context: true,
            event_channel_capacity: 1024,
            swap_interval: 0,
        }
    }

    /// Set the initial title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the recreate-vs-resize policy
    pub fn with_recreate_policy(mut self, policy: RecreatePolicy) -> Self {
        self.recreate = policy;
        self
    }

    /// Set whether the window starts resizable
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.initial_resizable = resizable;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.swap_interval < 0 {
            return Err(ConfigError::Invalid("swap_interval cannot be negative".to_string()));
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Controller Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Dead zone assigned to every axis when devices are enumerated
    pub default_dead_zone: f32,
}

impl ControllerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.default_dead_zone) {
            return Err(ConfigError::Invalid(format!(
                "default_dead_zone must be in [0, 1), got {}",
                self.default_dead_zone
            )));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { default_dead_zone: 0.0 }
    }
}

/// # Complete Configuration
///
/// Top-level configuration that encompasses every subsystem. This is the
/// structure applications load from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Default log filter
    pub log_level: String,
    /// Display configuration
    pub display: DisplayConfig,
    /// Controller configuration
    pub controllers: ControllerConfig,
}

impl CompatConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display.validate()?;
        self.controllers.validate()?;
        Ok(())
    }
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            display: DisplayConfig::default(),
            controllers: ControllerConfig::default(),
        }
    }
}

impl Config for CompatConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("legacy_display_{}_{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_policy_decision_table() {
        let resize_only = RecreatePolicy { always_recreate_on_resize: false, recreate_on_attribute_change: false };
        assert!(!resize_only.should_recreate(false));
        assert!(!resize_only.should_recreate(true));

        let on_attr = RecreatePolicy::default();
        assert!(!on_attr.should_recreate(false));
        assert!(on_attr.should_recreate(true));

        let always = RecreatePolicy { always_recreate_on_resize: true, recreate_on_attribute_change: false };
        assert!(always.should_recreate(false));
        assert!(always.should_recreate(true));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CompatConfig = toml::from_str(
            "[display.recreate]\nalways_recreate_on_resize = true\n",
        )
        .unwrap();
        assert!(config.display.recreate.always_recreate_on_resize);
        assert!(config.display.recreate.recreate_on_attribute_change);
        assert_eq!(config.display.title, "Game");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = temp_path("config.toml");
        let mut config = CompatConfig::default();
        config.display.title = "Saved".to_string();
        config.controllers.default_dead_zone = 0.1;
        config.save_to_file(&path).unwrap();

        let loaded = CompatConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_load_ron() {
        let path = temp_path("config.ron");
        let mut config = CompatConfig::default();
        config.display.disable_window_icon = true;
        config.save_to_file(&path).unwrap();

        let loaded = CompatConfig::load_from_file(&path).unwrap();
        assert!(loaded.display.disable_window_icon);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_format_and_missing_file() {
        let config = CompatConfig::default();
        assert!(matches!(
            config.save_to_file("settings.ini"),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        let missing = temp_path("does_not_exist.toml");
        assert_eq!(CompatConfig::load_or_default(&missing).unwrap(), CompatConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CompatConfig::default();
        assert!(config.validate().is_ok());

        config.display.event_channel_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.display.event_channel_capacity = 16;
        config.controllers.default_dead_zone = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
