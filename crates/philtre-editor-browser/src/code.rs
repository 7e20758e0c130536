//! Code block hook: a textarea with a highlighted mirror behind it.
//!
//! The textarea is the only editable surface. Its value is sent whole on
//! every input and copied into the mirror element. Tokenizing the mirror is
//! left to a highlighter function supplied by the host page.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlTextAreaElement};

use philtre_editor_core::dom::{CODE_EDITABLE_SELECTOR, CODE_HIGHLIGHTED_SELECTOR, LANGUAGE_ATTR};
use philtre_editor_core::{
    HookError, LanguageClasses, OutboundEvent, highlight_source, is_add_block_key,
};

use crate::dom::query_required;
use crate::hook::{Transport, ViewHook};
use crate::js_error;
use crate::platform::key_combo;

struct CodeState {
    el: HtmlElement,
    transport: Transport,
    highlighter: Option<js_sys::Function>,
}

impl CodeState {
    fn editable(&self) -> Result<HtmlTextAreaElement, HookError> {
        query_required(&self.el, CODE_EDITABLE_SELECTOR)?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| HookError::MissingElement {
                selector: CODE_EDITABLE_SELECTOR.to_string(),
            })
    }

    fn highlighted(&self) -> Result<HtmlElement, HookError> {
        query_required(&self.el, CODE_HIGHLIGHTED_SELECTOR)
    }

    /// Point the mirror at the block's `data-language`.
    fn apply_language(&self) -> Result<(), HookError> {
        let language = self
            .el
            .get_attribute(LANGUAGE_ATTR)
            .filter(|l| !l.is_empty())
            .ok_or(HookError::MissingAttribute {
                attribute: LANGUAGE_ATTR,
            })?;
        let highlighted = self.highlighted()?;

        let list = highlighted.class_list();
        let current: Vec<String> = (0..list.length()).filter_map(|i| list.item(i)).collect();
        let classes = LanguageClasses::new(current.iter().map(String::as_str), &language);
        for class in &classes.remove {
            list.remove_1(class).map_err(js_error)?;
        }
        for class in &classes.add {
            list.add_1(class).map_err(js_error)?;
        }
        tracing::debug!(target: "philtre::code", %language, "language applied");
        Ok(())
    }

    /// Copy the textarea into the mirror and run the highlighter over it.
    fn refresh_highlight(&self) -> Result<(), HookError> {
        let highlighted = self.highlighted()?;
        let source = highlight_source(&self.editable()?.value());
        highlighted.set_text_content(Some(&source));
        if let Some(highlighter) = &self.highlighter {
            highlighter
                .call1(&JsValue::NULL, &highlighted)
                .map_err(js_error)?;
        }
        Ok(())
    }

    fn push(&self, event: OutboundEvent) {
        if let Err(e) = self.transport.push(&event) {
            tracing::error!(target: "philtre::code", event = event.name, "push failed: {e}");
        }
    }

    fn on_input(&self, editable: &HtmlTextAreaElement) {
        if let Err(e) = self.refresh_highlight() {
            tracing::warn!(target: "philtre::code", "highlight refresh failed: {e}");
        }
        self.push(OutboundEvent::code_update(editable.value()));
    }

    fn on_keypress(&self, event: &web_sys::KeyboardEvent) {
        if is_add_block_key(&key_combo(event)) {
            event.prevent_default();
            self.push(OutboundEvent::add_block());
        }
    }
}

/// A mounted Code hook.
pub struct CodeBlock {
    state: Rc<CodeState>,
    _listeners: Vec<EventListener>,
}

impl CodeBlock {
    /// Mount on a code block. `highlighter` is called with the mirror
    /// element after each refresh.
    ///
    /// Fails if the block has no language or either container is missing.
    pub fn mount(hook: ViewHook, highlighter: Option<js_sys::Function>) -> Result<Self, HookError> {
        let state = Rc::new(CodeState {
            el: hook.el(),
            transport: Transport::new(hook),
            highlighter,
        });
        state.apply_language()?;
        let editable = state.editable()?;

        let listeners = vec![
            {
                let state = state.clone();
                EventListener::new_with_options(
                    &editable,
                    "keypress",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                            state.on_keypress(event);
                        }
                    },
                )
            },
            {
                let state = state.clone();
                let target = editable.clone();
                EventListener::new(&editable, "input", move |_| state.on_input(&target))
            },
        ];

        state.refresh_highlight()?;
        tracing::debug!(target: "philtre::code", block_id = %state.el.id(), "mounted");

        Ok(Self {
            state,
            _listeners: listeners,
        })
    }

    /// The server re-rendered the block, possibly with a new language.
    pub fn updated(&self) -> Result<(), HookError> {
        self.state.apply_language()?;
        self.state.refresh_highlight()
    }
}
