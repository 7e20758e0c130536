//! Error types for hook operations.

use thiserror::Error;

/// Which end of a native selection failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSide {
    Anchor,
    Focus,
}

impl std::fmt::Display for SelectionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionSide::Anchor => f.write_str("anchor"),
            SelectionSide::Focus => f.write_str("focus"),
        }
    }
}

/// Errors raised while serializing or restoring block state.
///
/// Structural errors are loud: they mean the client template and the
/// server render disagree, and the interaction must not proceed with a
/// guessed payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The document has no live selection.
    #[error("no selection during update")]
    NoSelection,

    /// A selection endpoint points outside the block's cell structure.
    #[error("invalid selection: {side} node does not resolve to a cell")]
    UnresolvableSelection { side: SelectionSide },

    /// A required attribute is absent on the hook element.
    #[error("element does not have a \"{attribute}\" attribute")]
    MissingAttribute { attribute: &'static str },

    /// A required descendant element is absent.
    #[error("element not found: {selector}")]
    MissingElement { selector: String },

    /// Block has neither cells nor an element id to fall back on.
    #[error("block has no cell structure and no element id")]
    InvalidBlock,

    /// A DOM call failed.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<&str> for HookError {
    fn from(s: &str) -> Self {
        HookError::Dom(s.to_string())
    }
}

impl From<String> for HookError {
    fn from(s: String) -> Self {
        HookError::Dom(s)
    }
}
