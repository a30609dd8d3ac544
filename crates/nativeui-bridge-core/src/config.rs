//! Bridge configuration.
//!
//! Hosts usually embed a small TOML table in their own settings file:
//!
//! ```
//! use nativeui_bridge_core::BridgeConfig;
//!
//! let config = BridgeConfig::from_toml_str(
//!     r#"
//!     ui_thread_name = "app-ui"
//!     command_bar_extent = 72.0
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.ui_thread_name, "app-ui");
//! assert_eq!(config.ui_queue_capacity, 256);
//! ```

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Default capacity for the UI context's work queue.
pub const DEFAULT_UI_QUEUE_CAPACITY: usize = 256;

/// Height in pixels of the row reserved for a visible command bar.
pub const DEFAULT_COMMAND_BAR_EXTENT: f32 = 78.0;

/// Configuration shared by the UI context and the screen widgets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name given to the dedicated UI thread.
    pub ui_thread_name: String,
    /// Capacity of the UI thread's work queue.
    pub ui_queue_capacity: usize,
    /// Fixed height of the row a screen reserves for its command bar.
    pub command_bar_extent: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ui_thread_name: "nativeui-main".to_string(),
            ui_queue_capacity: DEFAULT_UI_QUEUE_CAPACITY,
            command_bar_extent: DEFAULT_COMMAND_BAR_EXTENT,
        }
    }
}

impl BridgeConfig {
    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.ui_queue_capacity == 0 {
            return Err(BridgeError::Config(
                "ui_queue_capacity must be greater than zero".to_string(),
            ));
        }
        if self.command_bar_extent.is_nan() || self.command_bar_extent <= 0.0 {
            return Err(BridgeError::Config(format!(
                "command_bar_extent must be positive, got {}",
                self.command_bar_extent
            )));
        }
        Ok(())
    }
}
