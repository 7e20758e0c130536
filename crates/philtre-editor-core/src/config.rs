//! Hook configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the editor hooks, passed in from the host page.
///
/// Every field has a default, so an empty object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HookConfig {
    /// Debounce window for `update` round-trips, in milliseconds.
    pub debounce_ms: u32,
    /// How long an update may stay unacknowledged before it counts as
    /// failed, in milliseconds.
    pub round_trip_timeout_ms: u32,
    /// Minimum drag-select rectangle width and height, in pixels.
    pub drag_threshold_px: f64,
    /// Treat the platform as macOS (Cmd-only shortcuts). Detected from the
    /// browser when unset.
    pub mac: Option<bool>,
    /// Selector for the editor root that scopes multi-block copy.
    pub editor_selector: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            round_trip_timeout_ms: 5000,
            drag_threshold_px: 5.0,
            mac: None,
            editor_selector: ".philtre__editor".to_string(),
        }
    }
}

impl HookConfig {
    pub fn round_trip_timeout(&self) -> Duration {
        Duration::from_millis(self.round_trip_timeout_ms.into())
    }

    /// Selector for blocks currently in a multi-block selection.
    pub fn selected_blocks_selector(&self) -> String {
        format!("{} [{}]", self.editor_selector, crate::dom::SELECTED_ATTR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: HookConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HookConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config: HookConfig =
            serde_json::from_str(r#"{"debounceMs": 200, "mac": true}"#).unwrap();
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.mac, Some(true));
        assert_eq!(config.round_trip_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_selected_blocks_selector() {
        assert_eq!(
            HookConfig::default().selected_blocks_selector(),
            ".philtre__editor [data-selected]"
        );
    }
}
