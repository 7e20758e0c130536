//! philtre-editor-core: platform-agnostic logic behind the editor's DOM hooks.
//!
//! The server owns the document. This crate only covers the client side of
//! the conversation:
//! - `BlockDom` trait for reading a block's rendered subtree
//! - cell and selection extraction into wire types
//! - keyboard command resolution
//! - selection restoration planning from a `FocusIntent`
//! - the debounced update queue and its ordering against commands
//! - code block language classes and highlight mirror text
//! - drag-select geometry and the hook registry

pub mod actions;
pub mod code;
pub mod config;
pub mod dom;
pub mod drag;
pub mod error;
pub mod events;
pub mod extract;
pub mod focus;
pub mod pending;
pub mod registry;
pub mod selection;
pub mod text;
pub mod types;

#[cfg(test)]
mod test_support;

pub use actions::{BlockCommand, HistoryCommand, Key, KeyCombo, Modifiers, NavigationCommand};
pub use code::{LanguageClasses, highlight_source, is_add_block_key};
pub use config::HookConfig;
pub use dom::{BlockDom, NativeSelection, is_out_of_cell, resolve_cell};
pub use drag::{DragSelection, Rect, blocks_in_rect};
pub use error::{HookError, SelectionSide};
pub use events::{EventPayload, OutboundEvent};
pub use extract::{cell_from_element, default_cells, extract_cells};
pub use focus::{FocusIntent, RestorePlan, plan_restore};
pub use pending::{IdleWait, RoundTripOutcome, RoundTripQueue};
pub use registry::HookRegistry;
pub use selection::{default_selection, extract_selection, is_at_start_of_block};
pub use smol_str::SmolStr;
pub use text::{sanitize_text, utf16_len};
pub use types::{Cell, CellSelection, Modifier};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBlock;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use web_time::Instant;

    #[test]
    fn test_backspace_on_first_cell_start() {
        let block = MockBlock::new("b1").cell("c1", "hello", &[]);
        let native = NativeSelection::caret(block.text_node("c1"), 0);

        let command = BlockCommand::resolve(&KeyCombo::new(Key::Backspace), true, || {
            is_at_start_of_block(&block, Some(&native))
        })
        .unwrap()
        .unwrap();
        let event = OutboundEvent::command(command, extract_selection(&block, Some(&native)).unwrap());

        assert_eq!(event.name, "backspace_from_start");
        assert_eq!(
            event.payload,
            EventPayload::Selection {
                selection: CellSelection::new("c1", 0, "c1", 0)
            }
        );
    }

    #[test]
    fn test_typing_into_empty_block_sends_one_update() {
        let mut queue = RoundTripQueue::new(HookConfig::default().round_trip_timeout());
        let mut timers = Vec::new();

        for typed in ["a", "ab"] {
            let block = MockBlock::new("block-1").loose_text(typed);
            let event = OutboundEvent::update(
                extract_selection(&block, None).unwrap(),
                extract_cells(&block).unwrap(),
            );
            timers.push(queue.enqueue(event));
        }

        let now = Instant::now();
        let sent: Vec<OutboundEvent> = timers
            .into_iter()
            .filter_map(|generation| queue.fire(generation, now))
            .collect();

        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, "update");
        assert_eq!(
            sent[0].payload,
            EventPayload::Update {
                selection: CellSelection::caret("block-1", 2),
                cells: vec![Cell::plain("block-1", "ab")],
            }
        );

        let wait = queue.wait_idle();
        queue.settle(2, RoundTripOutcome::Acknowledged);
        assert_eq!(wait.now_or_never(), Some(RoundTripOutcome::Acknowledged));
    }
}
