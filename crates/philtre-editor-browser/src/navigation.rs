//! Block navigation hook, bound to a section container.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord};

use philtre_editor_core::dom::{BLOCK_ATTR, BLOCK_SELECTOR, FOCUSED_ATTR};
use philtre_editor_core::{HookError, NavigationCommand, OutboundEvent};

use crate::dom::query_required;
use crate::hook::{Transport, ViewHook};
use crate::js_error;
use crate::platform::key_combo;

struct Section {
    el: HtmlElement,
    transport: Transport,
}

impl Section {
    fn is_focused(&self) -> bool {
        self.el.has_attribute(FOCUSED_ATTR)
    }

    /// The section's block element.
    fn focusable(&self) -> Result<HtmlElement, HookError> {
        query_required(&self.el, BLOCK_SELECTOR)
    }

    fn push(&self, event: OutboundEvent) {
        if let Err(e) = self.transport.push(&event) {
            tracing::error!(target: "philtre::navigation", event = event.name, "push failed: {e}");
        }
    }

    fn focus_current(&self) {
        match self.focusable() {
            Ok(block) => self.push(OutboundEvent::focus_current(block.id())),
            Err(e) => tracing::error!(target: "philtre::navigation", "focus_current: {e}"),
        }
    }

    /// Focus the inner block if the server marked this section focused.
    fn maybe_focus_block(&self) -> Result<(), HookError> {
        if !self.is_focused() {
            return Ok(());
        }
        let block = self.focusable()?;
        if active_element_id().is_some_and(|id| id == block.id()) {
            return Ok(());
        }
        block.focus().map_err(js_error)
    }

    fn on_keydown(&self, event: &web_sys::KeyboardEvent) {
        let Some(command) = NavigationCommand::resolve(&key_combo(event)) else {
            return;
        };
        event.prevent_default();
        self.push(OutboundEvent::navigation(command));
    }

    fn on_mutations(&self, mutations: &js_sys::Array) {
        let added_block = mutations
            .iter()
            .filter_map(|m| m.dyn_into::<MutationRecord>().ok())
            .flat_map(|record| {
                let nodes = record.added_nodes();
                (0..nodes.length()).filter_map(move |i| nodes.get(i))
            })
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .find(|el| el.has_attribute(BLOCK_ATTR));

        let Some(added_block) = added_block else {
            return;
        };
        if self.is_focused() {
            return;
        }
        if active_element_id().is_some_and(|id| id == added_block.id()) {
            tracing::trace!(target: "philtre::navigation", block_id = %added_block.id(), "re-added block holds focus");
            self.focus_current();
        }
    }
}

fn active_element_id() -> Option<String> {
    web_sys::window()?
        .document()?
        .active_element()
        .map(|el| el.id())
}

/// A mounted BlockNavigation hook.
pub struct BlockNavigation {
    section: Rc<Section>,
    observer: MutationObserver,
    _on_mutations: Closure<dyn FnMut(js_sys::Array)>,
    _listeners: Vec<EventListener>,
}

impl BlockNavigation {
    pub fn mount(hook: ViewHook) -> Result<Self, HookError> {
        let section = Rc::new(Section {
            el: hook.el(),
            transport: Transport::new(hook),
        });
        let el = section.el.clone();
        let focusable = section.focusable()?;

        let listeners = vec![
            {
                let section = section.clone();
                EventListener::new_with_options(
                    &el,
                    "keydown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                            section.on_keydown(event);
                        }
                    },
                )
            },
            {
                let section = section.clone();
                EventListener::new(&focusable, "focus", move |_| {
                    if !section.is_focused() {
                        section.focus_current();
                    }
                })
            },
        ];

        let on_mutations = {
            let section = section.clone();
            Closure::<dyn FnMut(js_sys::Array)>::new(move |mutations: js_sys::Array| {
                section.on_mutations(&mutations)
            })
        };
        let observer =
            MutationObserver::new(on_mutations.as_ref().unchecked_ref()).map_err(js_error)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(false);
        observer.observe_with_options(&el, &init).map_err(js_error)?;

        section.maybe_focus_block()?;

        Ok(Self {
            section,
            observer,
            _on_mutations: on_mutations,
            _listeners: listeners,
        })
    }

    /// The server re-rendered the section.
    pub fn updated(&self) -> Result<(), HookError> {
        self.section.maybe_focus_block()
    }
}

impl Drop for BlockNavigation {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
