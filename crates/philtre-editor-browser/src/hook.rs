//! Binding to the LiveView hook object and event dispatch through it.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use philtre_editor_core::{HookError, OutboundEvent};

use crate::dom::get_target;
use crate::js_error;

// === ViewHook binding ===
//
// The `this` of a LiveView hook callback. Only the members the editor hooks
// use are bound.

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type ViewHook;

    #[wasm_bindgen(method, getter)]
    pub fn el(this: &ViewHook) -> web_sys::HtmlElement;

    #[wasm_bindgen(method, js_name = pushEventTo)]
    pub fn push_event_to(this: &ViewHook, target: &str, event: &str, payload: &JsValue);

    #[wasm_bindgen(method, js_name = pushEventTo)]
    pub fn push_event_to_with_reply(
        this: &ViewHook,
        target: &str,
        event: &str,
        payload: &JsValue,
        on_reply: &js_sys::Function,
    );

    #[wasm_bindgen(method, js_name = handleEvent)]
    pub fn handle_event(this: &ViewHook, event: &str, callback: &js_sys::Function);
}

/// Sends events to the server component named by the hook element's
/// `phx-target`.
///
/// The target is read on every send, so a template that drops the attribute
/// fails the dispatch that needed it rather than the mount.
#[derive(Clone)]
pub struct Transport {
    hook: ViewHook,
}

impl Transport {
    pub fn new(hook: ViewHook) -> Self {
        Self { hook }
    }

    /// Fire-and-forget push.
    pub fn push(&self, event: &OutboundEvent) -> Result<(), HookError> {
        let target = get_target(&self.hook.el())?;
        let payload = to_js(event)?;
        tracing::debug!(target: "philtre::push", event = event.name, phx_target = %target, "push");
        self.hook.push_event_to(&target, event.name, &payload);
        Ok(())
    }

    /// Push and call `on_reply` when the server acknowledges.
    ///
    /// The callback is dropped unfired if the server never replies; callers
    /// arm their own timeout.
    pub fn push_with_reply<F>(&self, event: &OutboundEvent, on_reply: F) -> Result<(), HookError>
    where
        F: FnOnce() + 'static,
    {
        let target = get_target(&self.hook.el())?;
        let payload = to_js(event)?;
        tracing::debug!(target: "philtre::push", event = event.name, phx_target = %target, "push (awaiting reply)");

        let callback = Closure::once_into_js(move |_reply: JsValue, _ref: JsValue| on_reply());
        self.hook
            .push_event_to_with_reply(&target, event.name, &payload, callback.unchecked_ref());
        Ok(())
    }
}

/// Serialize a payload as a plain JS object.
fn to_js(event: &OutboundEvent) -> Result<JsValue, HookError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    event
        .payload
        .serialize(&serializer)
        .map_err(|e| js_error(e.into()))
}
