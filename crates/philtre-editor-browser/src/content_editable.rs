//! The per-block ContentEditable hook.
//!
//! Input is serialized into an `update` and debounced through a
//! [`RoundTripQueue`]. Keyboard commands and paste flush any queued update
//! and wait for it to be acknowledged before they are sent, so the server
//! never applies a structural command to stale text.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_time::Instant;

use philtre_editor_core::{
    BlockCommand, CellSelection, FocusIntent, HookConfig, HookError, HookRegistry, OutboundEvent,
    RoundTripOutcome, RoundTripQueue, SmolStr, extract_cells, extract_selection,
};

use crate::cursor::{self, native_selection};
use crate::dom::{BrowserBlock, set_save_failed};
use crate::hook::{Transport, ViewHook};
use crate::platform::key_combo;

const EXPIRY_SLACK_MS: u32 = 20;

/// Blocks registered with an editor root, keyed by block element id.
pub type BlockRegistry = Rc<RefCell<HookRegistry<Rc<BlockState>>>>;

/// State shared between a block's listeners, timers and reply callbacks.
pub struct BlockState {
    id: SmolStr,
    block: BrowserBlock,
    transport: Transport,
    config: HookConfig,
    is_mac: bool,
    queue: RefCell<RoundTripQueue<OutboundEvent>>,
    debounce: RefCell<Option<Timeout>>,
    /// Expiry timers for updates still in flight, by generation.
    expiry: RefCell<Vec<(u64, Timeout)>>,
}

impl BlockState {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot the block as an `update`.
    fn snapshot(&self) -> Result<OutboundEvent, HookError> {
        let native = native_selection(&self.block.document()?);
        let selection = extract_selection(&self.block, native.as_ref())?;
        let cells = extract_cells(&self.block)?;
        Ok(OutboundEvent::update(selection, cells))
    }

    fn on_input(self: &Rc<Self>) {
        let event = match self.snapshot() {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(target: "philtre::block", block_id = %self.id, "update not sent: {e}");
                return;
            }
        };

        let generation = self.queue.borrow_mut().enqueue(event);
        let weak = Rc::downgrade(self);
        let timer = Timeout::new(self.config.debounce_ms, move || {
            if let Some(state) = weak.upgrade() {
                state.fire(generation);
            }
        });
        // Dropping the previous timer cancels it.
        self.debounce.replace(Some(timer));
    }

    fn fire(self: &Rc<Self>, generation: u64) {
        let event = self.queue.borrow_mut().fire(generation, Instant::now());
        if let Some(event) = event {
            self.send_update(generation, event);
        }
    }

    fn send_update(self: &Rc<Self>, generation: u64, event: OutboundEvent) {
        let weak = Rc::downgrade(self);
        let sent = self.transport.push_with_reply(&event, move || {
            if let Some(state) = weak.upgrade() {
                state.settle(generation, RoundTripOutcome::Acknowledged);
            }
        });
        if let Err(e) = sent {
            tracing::error!(target: "philtre::block", block_id = %self.id, "update push failed: {e}");
            self.settle(generation, RoundTripOutcome::Failed);
            return;
        }

        // Timer clocks can run a little ahead of `Instant`.
        let delay = self.config.round_trip_timeout_ms.saturating_add(EXPIRY_SLACK_MS);
        let weak = Rc::downgrade(self);
        let timer = Timeout::new(delay, move || {
            if let Some(state) = weak.upgrade() {
                state.expire(generation);
            }
        });
        self.expiry.borrow_mut().push((generation, timer));
    }

    fn settle(&self, generation: u64, outcome: RoundTripOutcome) {
        self.queue.borrow_mut().settle(generation, outcome);
        // Settling a generation settles everything sent before it.
        self.expiry.borrow_mut().retain(|(g, _)| *g > generation);
        self.mark_saved(outcome.is_acknowledged());
    }

    fn expire(&self, generation: u64) {
        let expired = self.queue.borrow_mut().expire(Instant::now());
        // Includes the timer running this call; its closure is freed once
        // the callback returns.
        let settled = expired.last().map_or(generation, |g| (*g).max(generation));
        self.expiry.borrow_mut().retain(|(g, _)| *g > settled);
        if !expired.is_empty() {
            tracing::warn!(
                target: "philtre::block",
                block_id = %self.id,
                ?expired,
                "update round-trip timed out"
            );
            self.mark_saved(false);
        }
    }

    fn mark_saved(&self, saved: bool) {
        if let Err(e) = set_save_failed(self.block.element(), !saved) {
            tracing::warn!(target: "philtre::block", block_id = %self.id, "failed to update save indicator: {e}");
        }
    }

    /// Send any queued update now and wait until every update sent so far
    /// has been settled.
    pub async fn settle_pending(self: &Rc<Self>) -> RoundTripOutcome {
        let (flushed, wait) = {
            let mut queue = self.queue.borrow_mut();
            let flushed = queue.flush(Instant::now());
            (flushed, queue.wait_idle())
        };
        if let Some((generation, event)) = flushed {
            self.debounce.replace(None);
            self.send_update(generation, event);
        }
        wait.await
    }

    /// Wait for pending updates, then send the event built from the
    /// selection as it is at that point.
    async fn send_after_updates<F>(self: Rc<Self>, build: F)
    where
        F: FnOnce(CellSelection) -> OutboundEvent,
    {
        let outcome = self.settle_pending().await;
        if !self.block.element().is_connected() {
            tracing::debug!(target: "philtre::block", block_id = %self.id, "block removed before send");
            return;
        }
        if !outcome.is_acknowledged() {
            tracing::warn!(
                target: "philtre::block",
                block_id = %self.id,
                ?outcome,
                "sending after an unacknowledged update"
            );
        }

        let event = match cursor::block_selection(&self.block) {
            Ok(selection) => build(selection),
            Err(e) => {
                tracing::error!(target: "philtre::block", block_id = %self.id, "command not sent: {e}");
                return;
            }
        };
        if let Err(e) = self.transport.push(&event) {
            tracing::error!(target: "philtre::block", block_id = %self.id, event = event.name, "push failed: {e}");
        }
    }

    fn on_keydown(self: &Rc<Self>, event: &web_sys::KeyboardEvent) {
        let combo = key_combo(event);
        let command = BlockCommand::resolve(&combo, self.is_mac, || {
            cursor::caret_at_start(&self.block)
        });

        let command = match command {
            Ok(Some(command)) => command,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(target: "philtre::block", block_id = %self.id, "keydown: {e}");
                return;
            }
        };

        event.prevent_default();
        tracing::debug!(target: "philtre::block", block_id = %self.id, ?command, "command");
        let state = self.clone();
        spawn_local(state.send_after_updates(move |selection| {
            OutboundEvent::command(command, selection)
        }));
    }

    fn on_paste(self: &Rc<Self>, event: &web_sys::Event) {
        event.prevent_default();
        let state = self.clone();
        spawn_local(state.send_after_updates(OutboundEvent::paste_blocks));
    }

    fn restore(&self, intent: Option<&FocusIntent>) {
        let result = match intent {
            Some(intent) => cursor::restore_selection(&self.block, intent),
            None => cursor::restore_from_attributes(&self.block),
        };
        if let Err(e) = result {
            tracing::error!(target: "philtre::block", block_id = %self.id, "selection restore failed: {e}");
        }
    }
}

/// A mounted ContentEditable hook.
///
/// Dropping it detaches every listener, cancels the debounce timer and
/// unregisters the block from its editor root.
pub struct ContentEditable {
    state: Rc<BlockState>,
    registry: Option<BlockRegistry>,
    _listeners: Vec<EventListener>,
    _focus_handler: Closure<dyn FnMut(JsValue)>,
}

impl ContentEditable {
    pub fn mount(
        hook: ViewHook,
        config: HookConfig,
        is_mac: bool,
        registry: Option<BlockRegistry>,
    ) -> Self {
        let el = hook.el();
        let id = SmolStr::from(el.id());
        let state = Rc::new(BlockState {
            id: id.clone(),
            block: BrowserBlock::new(el.clone()),
            queue: RefCell::new(RoundTripQueue::new(config.round_trip_timeout())),
            transport: Transport::new(hook.clone()),
            config,
            is_mac,
            debounce: RefCell::new(None),
            expiry: RefCell::new(Vec::new()),
        });

        let listeners = vec![
            {
                let state = state.clone();
                EventListener::new(&el, "input", move |_| state.on_input())
            },
            {
                let state = state.clone();
                EventListener::new_with_options(
                    &el,
                    "keydown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                            state.on_keydown(event);
                        }
                    },
                )
            },
            {
                let state = state.clone();
                EventListener::new_with_options(
                    &el,
                    "paste",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| state.on_paste(event),
                )
            },
        ];

        let focus_handler = {
            let state = state.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
                match serde_wasm_bindgen::from_value::<FocusIntent>(payload) {
                    Ok(intent) if intent.block_id == state.id => state.restore(Some(&intent)),
                    Ok(_) => {}
                    Err(e) => tracing::warn!(target: "philtre::block", "malformed focus event: {e}"),
                }
            })
        };
        hook.handle_event("focus", focus_handler.as_ref().unchecked_ref());

        if let Some(registry) = &registry {
            registry.borrow_mut().register(id.clone(), state.clone());
        }
        tracing::debug!(target: "philtre::block", block_id = %id, "mounted");

        state.restore(None);

        Self {
            state,
            registry,
            _listeners: listeners,
            _focus_handler: focus_handler,
        }
    }

    /// The server re-rendered the block.
    pub fn updated(&self) {
        self.state.restore(None);
    }
}

impl Drop for ContentEditable {
    fn drop(&mut self) {
        self.state.debounce.replace(None);
        self.state.expiry.borrow_mut().clear();
        self.state.queue.borrow_mut().clear();
        if let Some(registry) = &self.registry {
            let mut registry = registry.borrow_mut();
            // A re-mount may already have replaced this block's entry.
            if registry
                .get(&self.state.id)
                .is_some_and(|current| Rc::ptr_eq(current, &self.state))
            {
                registry.unregister(&self.state.id);
            }
        }
        tracing::debug!(target: "philtre::block", block_id = %self.state.id, "destroyed");
    }
}

