//! Outbound events sent to the remote state owner.

use serde::Serialize;
use smol_str::SmolStr;

use crate::actions::{BlockCommand, HistoryCommand, NavigationCommand};
use crate::types::{Cell, CellSelection};

/// Event payloads, serialized as the plain JSON objects the server expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    Update {
        selection: CellSelection,
        cells: Vec<Cell>,
    },
    Selection {
        selection: CellSelection,
    },
    Blocks {
        block_ids: Vec<SmolStr>,
    },
    Block {
        block_id: SmolStr,
    },
    Value {
        value: String,
    },
    Empty {},
}

/// A named event plus payload, ready to push.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub name: &'static str,
    pub payload: EventPayload,
}

impl OutboundEvent {
    /// Debounced text update.
    pub fn update(selection: CellSelection, cells: Vec<Cell>) -> Self {
        Self {
            name: "update",
            payload: EventPayload::Update { selection, cells },
        }
    }

    pub fn command(command: BlockCommand, selection: CellSelection) -> Self {
        Self {
            name: command.event_name(),
            payload: EventPayload::Selection { selection },
        }
    }

    pub fn paste_blocks(selection: CellSelection) -> Self {
        Self {
            name: "paste_blocks",
            payload: EventPayload::Selection { selection },
        }
    }

    pub fn history(command: HistoryCommand) -> Self {
        Self {
            name: command.event_name(),
            payload: EventPayload::Empty {},
        }
    }

    pub fn select_blocks(block_ids: Vec<SmolStr>) -> Self {
        Self {
            name: "select_blocks",
            payload: EventPayload::Blocks { block_ids },
        }
    }

    pub fn copy_blocks(block_ids: Vec<SmolStr>) -> Self {
        Self {
            name: "copy_blocks",
            payload: EventPayload::Blocks { block_ids },
        }
    }

    pub fn focus_current(block_id: impl Into<SmolStr>) -> Self {
        Self {
            name: "focus_current",
            payload: EventPayload::Block {
                block_id: block_id.into(),
            },
        }
    }

    pub fn navigation(command: NavigationCommand) -> Self {
        Self {
            name: command.event_name(),
            payload: EventPayload::Empty {},
        }
    }

    /// A code block's full source, sent on every edit.
    pub fn code_update(value: impl Into<String>) -> Self {
        Self {
            name: "update",
            payload: EventPayload::Value {
                value: value.into(),
            },
        }
    }

    /// Shift+Enter in a code block: leave it for a new block below.
    pub fn add_block() -> Self {
        Self {
            name: "add_block",
            payload: EventPayload::Empty {},
        }
    }

    /// Payload as a JSON value.
    pub fn payload_json(&self) -> serde_json::Value {
        // Every payload variant is a map of strings, numbers and lists.
        serde_json::to_value(&self.payload).unwrap_or_default()
    }
}
