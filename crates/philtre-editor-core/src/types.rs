//! Core wire types: cells, cell modifiers and cell-addressed selections.
//!
//! These are the shapes sent to the remote state owner. They are recomputed
//! from the DOM on every qualifying event and never cached.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Style tag carried by a cell.
///
/// Serialized with the CSS class names the server renders onto cell
/// elements, so the same string identifies the modifier in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Bold text (`strong` class).
    Strong,
    /// Italic text (`italic` class).
    Italic,
    /// Line break (`br` class).
    Br,
}

impl Modifier {
    /// Every modifier, in canonical order.
    pub const ALL: [Modifier; 3] = [Modifier::Strong, Modifier::Italic, Modifier::Br];

    /// The CSS class that marks this modifier on a cell element.
    pub fn class_name(self) -> &'static str {
        match self {
            Modifier::Strong => "strong",
            Modifier::Italic => "italic",
            Modifier::Br => "br",
        }
    }

    /// Look up a modifier by its CSS class name.
    pub fn from_class_name(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.class_name() == class)
    }
}

/// A contiguous run of uniformly styled text inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Server-assigned id, stable across re-renders.
    pub id: SmolStr,
    /// Plain text with editing-surface whitespace artifacts normalized.
    pub text: String,
    /// Style tags. Order carries no meaning.
    pub modifiers: BTreeSet<Modifier>,
}

impl Cell {
    /// Create an unstyled cell.
    pub fn plain(id: impl Into<SmolStr>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            modifiers: BTreeSet::new(),
        }
    }

    /// Builder-style modifier addition.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// A selection expressed in cells rather than DOM nodes.
///
/// Always stored in document order: `start` precedes or equals `end`.
/// Offsets are UTF-16 code units into the respective cell's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSelection {
    pub start_id: SmolStr,
    pub start_offset: usize,
    pub end_id: SmolStr,
    pub end_offset: usize,
}

impl CellSelection {
    /// Create a selection. Callers are responsible for document order.
    pub fn new(
        start_id: impl Into<SmolStr>,
        start_offset: usize,
        end_id: impl Into<SmolStr>,
        end_offset: usize,
    ) -> Self {
        Self {
            start_id: start_id.into(),
            start_offset,
            end_id: end_id.into(),
            end_offset,
        }
    }

    /// Create a collapsed selection (plain caret).
    pub fn caret(id: impl Into<SmolStr>, offset: usize) -> Self {
        let id = id.into();
        Self {
            start_id: id.clone(),
            start_offset: offset,
            end_id: id,
            end_offset: offset,
        }
    }

    /// Check if the selection is a plain caret.
    pub fn is_collapsed(&self) -> bool {
        self.start_id == self.end_id && self.start_offset == self.end_offset
    }

    /// Check if the caret sits at offset 0 of the given cell.
    pub fn starts_at(&self, cell_id: &str) -> bool {
        self.start_id == cell_id && self.start_offset == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_class_names() {
        for m in Modifier::ALL {
            assert_eq!(Modifier::from_class_name(m.class_name()), Some(m));
        }
        assert_eq!(Modifier::from_class_name("bold"), None);
    }

    #[test]
    fn test_modifiers_serialize_in_canonical_order() {
        let cell = Cell::plain("c1", "hi")
            .with_modifier(Modifier::Br)
            .with_modifier(Modifier::Strong);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["modifiers"], serde_json::json!(["strong", "br"]));
    }

    #[test]
    fn test_modifiers_deserialize_any_order() {
        let cell: Cell = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "text": "x",
            "modifiers": ["italic", "strong"],
        }))
        .unwrap();
        assert!(cell.has_modifier(Modifier::Strong));
        assert!(cell.has_modifier(Modifier::Italic));
        assert!(!cell.has_modifier(Modifier::Br));
    }

    #[test]
    fn test_caret_selection() {
        let sel = CellSelection::caret("c1", 0);
        assert!(sel.is_collapsed());
        assert!(sel.starts_at("c1"));
        assert!(!sel.starts_at("c2"));

        let sel = CellSelection::new("c1", 0, "c2", 0);
        assert!(!sel.is_collapsed());
    }
}
