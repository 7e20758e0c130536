//! Editor root: owns the document-wide listeners.
//!
//! History shortcuts, multi-block copy and drag-select are detected anywhere
//! in the document but only act once the matching surface is attached (a
//! History hook for undo/redo, a Selection hook for copy and drag). Block
//! hooks mount through the root so history can wait on their pending
//! updates.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement};

use philtre_editor_core::dom::BLOCK_SELECTOR;
use philtre_editor_core::{
    DragSelection, HistoryCommand, HookConfig, HookError, HookRegistry, OutboundEvent, Rect,
    SmolStr, blocks_in_rect,
};

use crate::content_editable::{BlockRegistry, ContentEditable};
use crate::dom::element_ids;
use crate::hook::{Transport, ViewHook};
use crate::js_error;
use crate::platform::{is_mac, key_combo};

struct SelectionSurface {
    transport: Transport,
    rect: HtmlElement,
}

struct RootState {
    config: HookConfig,
    is_mac: bool,
    document: Document,
    blocks: BlockRegistry,
    history: RefCell<Option<Transport>>,
    selection: RefCell<Option<SelectionSurface>>,
    drag: RefCell<DragSelection>,
}

/// The editor root. Create one per page before mounting hooks.
pub struct EditorRoot {
    state: Rc<RootState>,
    _listeners: Vec<EventListener>,
}

impl EditorRoot {
    pub fn new(config: HookConfig) -> Result<Self, HookError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let is_mac = config.mac.unwrap_or_else(is_mac);

        let state = Rc::new(RootState {
            config,
            is_mac,
            document: document.clone(),
            blocks: Rc::new(RefCell::new(HookRegistry::new())),
            history: RefCell::new(None),
            selection: RefCell::new(None),
            drag: RefCell::new(DragSelection::new()),
        });

        let listeners = vec![
            {
                let state = state.clone();
                EventListener::new_with_options(
                    &document,
                    "keydown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                            state.on_history_key(event);
                        }
                    },
                )
            },
            {
                let state = state.clone();
                EventListener::new_with_options(
                    &document,
                    "copy",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| state.on_copy(event),
                )
            },
            {
                let state = state.clone();
                EventListener::new(&document, "mousedown", move |event| {
                    if let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() {
                        state.on_mouse_down(event);
                    }
                })
            },
            {
                let state = state.clone();
                EventListener::new(&document, "mousemove", move |event| {
                    if let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() {
                        state.on_mouse_move(event);
                    }
                })
            },
            {
                let state = state.clone();
                EventListener::new(&document, "mouseup", move |_| state.on_mouse_up())
            },
        ];

        tracing::debug!(target: "philtre::root", is_mac, "editor root created");
        Ok(Self {
            state,
            _listeners: listeners,
        })
    }

    pub fn is_mac(&self) -> bool {
        self.state.is_mac
    }

    /// Mount a ContentEditable hook and register its block.
    pub fn mount_block(&self, hook: ViewHook) -> ContentEditable {
        ContentEditable::mount(
            hook,
            self.state.config.clone(),
            self.state.is_mac,
            Some(self.state.blocks.clone()),
        )
    }

    /// Ids of the blocks currently registered.
    pub fn block_ids(&self) -> Vec<SmolStr> {
        self.state
            .blocks
            .borrow()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Route undo/redo through this hook's `phx-target`.
    pub fn attach_history(&self, hook: ViewHook) {
        self.state.history.replace(Some(Transport::new(hook)));
    }

    pub fn detach_history(&self) {
        self.state.history.replace(None);
    }

    /// Use this hook's element as the drag-select rectangle and its
    /// `phx-target` for `select_blocks` and `copy_blocks`.
    pub fn attach_selection(&self, hook: ViewHook) {
        let rect = hook.el();
        set_styles(
            &rect,
            &[
                ("display", "none"),
                ("position", "fixed"),
                ("background", "rgba(0, 0, 255, 0.1)"),
                ("pointer-events", "none"),
            ],
        );
        self.state.selection.replace(Some(SelectionSurface {
            transport: Transport::new(hook),
            rect,
        }));
    }

    pub fn detach_selection(&self) {
        self.state.selection.replace(None);
        self.state.drag.replace(DragSelection::new());
    }
}

impl RootState {
    fn on_history_key(&self, event: &web_sys::KeyboardEvent) {
        let Some(command) = HistoryCommand::resolve(&key_combo(event), self.is_mac) else {
            return;
        };
        let Some(transport) = self.history.borrow().clone() else {
            return;
        };
        event.prevent_default();

        let blocks = self.blocks.borrow().handlers();
        tracing::debug!(target: "philtre::root", ?command, pending_blocks = blocks.len(), "history");
        spawn_local(async move {
            for block in blocks {
                let outcome = block.settle_pending().await;
                if !outcome.is_acknowledged() {
                    tracing::warn!(target: "philtre::root", block_id = block.id(), ?outcome, "history after unacknowledged update");
                }
            }
            if let Err(e) = transport.push(&OutboundEvent::history(command)) {
                tracing::error!(target: "philtre::root", "history push failed: {e}");
            }
        });
    }

    fn on_copy(&self, event: &web_sys::Event) {
        let selection = self.selection.borrow();
        let Some(surface) = selection.as_ref() else {
            return;
        };
        let block_ids = element_ids(&self.document, &self.config.selected_blocks_selector());
        if block_ids.is_empty() {
            return;
        }
        event.prevent_default();
        if let Err(e) = surface.transport.push(&OutboundEvent::copy_blocks(block_ids)) {
            tracing::error!(target: "philtre::root", "copy push failed: {e}");
        }
    }

    fn on_mouse_down(&self, event: &web_sys::MouseEvent) {
        let selection = self.selection.borrow();
        let Some(surface) = selection.as_ref() else {
            return;
        };
        let (x, y) = client_point(event);
        self.drag.borrow_mut().begin(x, y);
        draw_rect(&surface.rect, &Rect::new(x, y, 0.0, 0.0));
        set_styles(&surface.rect, &[("display", "block")]);
    }

    fn on_mouse_move(&self, event: &web_sys::MouseEvent) {
        let selection = self.selection.borrow();
        let Some(surface) = selection.as_ref() else {
            return;
        };
        let (x, y) = client_point(event);
        if let Some(rect) = self.drag.borrow_mut().update(x, y) {
            draw_rect(&surface.rect, &rect);
        }
    }

    fn on_mouse_up(&self) {
        let selection = self.selection.borrow();
        let Some(surface) = selection.as_ref() else {
            return;
        };
        if !self.drag.borrow().is_selecting() {
            return;
        }
        let finished = self.drag.borrow_mut().finish(self.config.drag_threshold_px);
        set_styles(&surface.rect, &[("display", "none"), ("width", "0px"), ("height", "0px")]);

        let Some(rect) = finished else {
            return;
        };
        let block_ids = match block_rects(&self.document) {
            Ok(blocks) => blocks_in_rect(&rect, blocks),
            Err(e) => {
                tracing::error!(target: "philtre::root", "drag select: {e}");
                return;
            }
        };
        tracing::debug!(target: "philtre::root", selected = block_ids.len(), "drag select");
        if let Err(e) = surface.transport.push(&OutboundEvent::select_blocks(block_ids)) {
            tracing::error!(target: "philtre::root", "select push failed: {e}");
        }
    }
}

fn client_point(event: &web_sys::MouseEvent) -> (f64, f64) {
    (f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Every block's id and bounding rectangle, in document order.
fn block_rects(document: &Document) -> Result<Vec<(SmolStr, Rect)>, HookError> {
    let list = document.query_selector_all(BLOCK_SELECTOR).map_err(js_error)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter(|el| !el.id().is_empty())
        .map(|el| {
            let r = el.get_bounding_client_rect();
            (
                SmolStr::from(el.id()),
                Rect::new(r.left(), r.top(), r.width(), r.height()),
            )
        })
        .collect())
}

fn draw_rect(el: &HtmlElement, rect: &Rect) {
    set_styles(
        el,
        &[
            ("left", &format!("{}px", rect.left)),
            ("top", &format!("{}px", rect.top)),
            ("width", &format!("{}px", rect.width)),
            ("height", &format!("{}px", rect.height)),
        ],
    );
}

fn set_styles(el: &HtmlElement, styles: &[(&str, &str)]) {
    let style = el.style();
    for (property, value) in styles {
        if let Err(e) = style.set_property(property, value) {
            tracing::warn!(target: "philtre::root", property, "style update failed: {:?}", e);
        }
    }
}
