//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use philtre_editor_core::HookConfig;

/// TypeScript shape of the hook options accepted from the host page.
/// Omitted fields keep their defaults.
///
/// Only used for the generated typings; [`parse_config`] reads straight
/// into [`HookConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsHookConfig {
    #[tsify(optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u32>,
    #[tsify(optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_trip_timeout_ms: Option<u32>,
    #[tsify(optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag_threshold_px: Option<f64>,
    /// Force macOS (Cmd-only) shortcuts on or off.
    #[tsify(optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<bool>,
    #[tsify(optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_selector: Option<String>,
}

/// Parse an optional config object; `undefined` and `null` mean defaults.
pub fn parse_config(value: JsValue) -> Result<HookConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(HookConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid hook config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: HookConfig =
            serde_json::from_str(r##"{"debounceMs": 120, "editorSelector": "#editor"}"##).unwrap();

        assert_eq!(config.debounce_ms, 120);
        assert_eq!(config.editor_selector, "#editor");
        assert_eq!(config.round_trip_timeout_ms, 5000);
        assert_eq!(config.drag_threshold_px, 5.0);
        assert_eq!(config.mac, None);
    }

    #[test]
    fn test_typings_cover_every_config_field() {
        let config = HookConfig {
            mac: Some(true),
            ..HookConfig::default()
        };
        let js: JsHookConfig = serde_json::from_value(serde_json::to_value(&config).unwrap())
            .expect("JsHookConfig is missing a HookConfig field");
        assert_eq!(js.debounce_ms, Some(config.debounce_ms));
        assert_eq!(js.mac, Some(true));

        // And nothing the typings allow is rejected by the real config.
        let back: HookConfig = serde_json::from_value(serde_json::to_value(&js).unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
