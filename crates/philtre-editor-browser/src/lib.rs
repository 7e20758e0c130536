//! Browser DOM layer for the philtre editor hooks.
//!
//! This crate wires `philtre-editor-core` to the live DOM and to the
//! LiveView hook object. It assumes a `wasm32-unknown-unknown` target
//! environment.
//!
//! # Architecture
//!
//! - `dom`: `BlockDom` over a block element, attribute lookups
//! - `cursor`: Selection API reads and selection restoration
//! - `hook`: `ViewHook` binding and event dispatch to `phx-target`
//! - `content_editable`: the per-block editing hook
//! - `code`: the code block textarea hook
//! - `navigation`: the section-level focus navigation hook
//! - `root`: document-wide listeners (history, copy, drag-select)
//! - `platform`: OS detection for shortcut modifiers
//!
//! # Re-exports
//!
//! This crate re-exports `philtre-editor-core` for convenience, so consumers
//! only need to depend on `philtre-editor-browser`.

// Re-export core crate
pub use philtre_editor_core;
pub use philtre_editor_core::*;

pub mod code;
pub mod content_editable;
pub mod cursor;
pub mod dom;
pub mod hook;
pub mod navigation;
pub mod platform;
pub mod root;

pub use code::CodeBlock;
pub use content_editable::{BlockRegistry, BlockState, ContentEditable};
pub use dom::BrowserBlock;
pub use hook::{Transport, ViewHook};
pub use navigation::BlockNavigation;
pub use platform::is_mac;
pub use root::EditorRoot;

/// Wrap a thrown JS value.
pub(crate) fn js_error(value: wasm_bindgen::JsValue) -> HookError {
    HookError::Dom(format!("{:?}", value))
}
