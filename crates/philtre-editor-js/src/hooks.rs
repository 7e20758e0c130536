//! JS-facing hook handles.
//!
//! A page creates one `EditorRoot` and forwards each LiveView hook's
//! lifecycle to it:
//!
//! ```js
//! const root = new EditorRoot({ debounceMs: 50 });
//!
//! const ContentEditable = {
//!   mounted() { this.block = root.mountBlock(this); },
//!   updated() { this.block.updated(); },
//!   destroyed() { this.block.destroy(); },
//! };
//!
//! const History = {
//!   mounted() { root.attachHistory(this); },
//!   destroyed() { root.detachHistory(); },
//! };
//!
//! const Selection = {
//!   mounted() { root.attachSelection(this); },
//!   destroyed() { root.detachSelection(); },
//! };
//!
//! const Code = {
//!   mounted() { this.code = root.mountCode(this, (el) => Prism.highlightElement(el)); },
//!   updated() { this.code.updated(); },
//!   destroyed() { this.code.destroy(); },
//! };
//!
//! const BlockNavigation = {
//!   mounted() { this.nav = root.mountNavigation(this); },
//!   updated() { this.nav.updated(); },
//!   destroyed() { this.nav.destroy(); },
//! };
//! ```

use wasm_bindgen::prelude::*;

use philtre_editor_browser::{
    BlockNavigation, CodeBlock, ContentEditable, EditorRoot, HookError, ViewHook,
};

use crate::types::parse_config;

fn to_js_error(e: HookError) -> JsError {
    JsError::new(&e.to_string())
}

/// Owner of the document-wide listeners and the block registry.
#[wasm_bindgen(js_name = EditorRoot)]
pub struct JsEditorRoot {
    root: EditorRoot,
}

#[wasm_bindgen(js_class = EditorRoot)]
impl JsEditorRoot {
    /// Create the root. `config` is an optional `JsHookConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditorRoot, JsError> {
        let config = parse_config(config)?;
        let root = EditorRoot::new(config).map_err(to_js_error)?;
        Ok(Self { root })
    }

    /// Mount a ContentEditable hook (`this` of its `mounted` callback).
    #[wasm_bindgen(js_name = mountBlock)]
    pub fn mount_block(&self, hook: ViewHook) -> JsContentEditable {
        JsContentEditable {
            inner: Some(self.root.mount_block(hook)),
        }
    }

    /// Mount a BlockNavigation hook. Fails if the section has no block.
    #[wasm_bindgen(js_name = mountNavigation)]
    pub fn mount_navigation(&self, hook: ViewHook) -> Result<JsBlockNavigation, JsError> {
        let inner = BlockNavigation::mount(hook).map_err(to_js_error)?;
        Ok(JsBlockNavigation { inner: Some(inner) })
    }

    /// Mount a Code hook. `highlighter`, if given, is called with the
    /// highlight element whenever its text changes.
    #[wasm_bindgen(js_name = mountCode)]
    pub fn mount_code(
        &self,
        hook: ViewHook,
        highlighter: Option<js_sys::Function>,
    ) -> Result<JsCodeBlock, JsError> {
        let inner = CodeBlock::mount(hook, highlighter).map_err(to_js_error)?;
        Ok(JsCodeBlock { inner: Some(inner) })
    }

    #[wasm_bindgen(js_name = attachHistory)]
    pub fn attach_history(&self, hook: ViewHook) {
        self.root.attach_history(hook);
    }

    #[wasm_bindgen(js_name = detachHistory)]
    pub fn detach_history(&self) {
        self.root.detach_history();
    }

    #[wasm_bindgen(js_name = attachSelection)]
    pub fn attach_selection(&self, hook: ViewHook) {
        self.root.attach_selection(hook);
    }

    #[wasm_bindgen(js_name = detachSelection)]
    pub fn detach_selection(&self) {
        self.root.detach_selection();
    }

    /// Ids of the blocks currently mounted.
    #[wasm_bindgen(js_name = blockIds)]
    pub fn block_ids(&self) -> Vec<String> {
        self.root
            .block_ids()
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[wasm_bindgen(js_name = isMac)]
    pub fn is_mac(&self) -> bool {
        self.root.is_mac()
    }
}

/// A mounted ContentEditable hook.
#[wasm_bindgen(js_name = ContentEditable)]
pub struct JsContentEditable {
    inner: Option<ContentEditable>,
}

#[wasm_bindgen(js_class = ContentEditable)]
impl JsContentEditable {
    /// Restore the selection after a server render.
    pub fn updated(&self) {
        if let Some(inner) = &self.inner {
            inner.updated();
        }
    }

    /// Detach listeners and unregister the block. Safe to call twice.
    pub fn destroy(&mut self) {
        self.inner.take();
    }
}

/// A mounted BlockNavigation hook.
#[wasm_bindgen(js_name = BlockNavigation)]
pub struct JsBlockNavigation {
    inner: Option<BlockNavigation>,
}

#[wasm_bindgen(js_class = BlockNavigation)]
impl JsBlockNavigation {
    pub fn updated(&self) -> Result<(), JsError> {
        match &self.inner {
            Some(inner) => inner.updated().map_err(to_js_error),
            None => Ok(()),
        }
    }

    pub fn destroy(&mut self) {
        self.inner.take();
    }
}

/// A mounted Code hook.
#[wasm_bindgen(js_name = CodeBlock)]
pub struct JsCodeBlock {
    inner: Option<CodeBlock>,
}

#[wasm_bindgen(js_class = CodeBlock)]
impl JsCodeBlock {
    pub fn updated(&self) -> Result<(), JsError> {
        match &self.inner {
            Some(inner) => inner.updated().map_err(to_js_error),
            None => Ok(()),
        }
    }

    pub fn destroy(&mut self) {
        self.inner.take();
    }
}
