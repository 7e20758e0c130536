//! Platform abstraction over a block's rendered subtree.
//!
//! The serialization algorithms in this crate are written against
//! [`BlockDom`] so they run unchanged over the browser DOM (see
//! `philtre-editor-browser`) and over in-memory trees in tests.

use smol_str::SmolStr;

/// Attribute carrying a cell's server-assigned id.
pub const CELL_ID_ATTR: &str = "data-cell-id";
/// Selector matching every cell element.
pub const CELL_SELECTOR: &str = "[data-cell-id]";
/// Attribute marking a block container.
pub const BLOCK_ATTR: &str = "data-block";
/// Selector matching every block container.
pub const BLOCK_SELECTOR: &str = "[data-block]";
/// Attribute naming the LiveView component that receives pushed events.
pub const TARGET_ATTR: &str = "phx-target";
/// Set by the server on the focused section.
pub const FOCUSED_ATTR: &str = "data-focused";
/// Set by the server on blocks in a multi-block selection.
pub const SELECTED_ATTR: &str = "data-selected";
/// Set on a block while its latest round-trip is unacknowledged.
pub const SAVE_FAILED_ATTR: &str = "data-save-failed";

pub const SELECTION_START_ID_ATTR: &str = "data-selection-start-id";
pub const SELECTION_END_ID_ATTR: &str = "data-selection-end-id";
pub const SELECTION_START_OFFSET_ATTR: &str = "data-selection-start-offset";
pub const SELECTION_END_OFFSET_ATTR: &str = "data-selection-end-offset";

/// The textarea a code block is edited through.
pub const CODE_EDITABLE_SELECTOR: &str = ".philtre__code__editable";
/// The element mirroring a code block's text for highlighting.
pub const CODE_HIGHLIGHTED_SELECTOR: &str = ".philtre__code__highlighted";
/// Set by the server on a code block to name its language.
pub const LANGUAGE_ATTR: &str = "data-language";

/// Read access to one block's subtree.
///
/// `Node` is whatever handle the platform uses for DOM nodes; for the
/// browser it is `web_sys::Node`. Text returned by [`BlockDom::text`] is the
/// rendered text (`innerText`), not yet sanitized.
pub trait BlockDom {
    type Node: Clone + PartialEq;

    /// The block's root element.
    fn root(&self) -> Self::Node;

    /// The root element's id, if it has a non-empty one.
    fn root_id(&self) -> Option<SmolStr>;

    /// The node's cell id, if the node is an element with a non-empty
    /// `data-cell-id`.
    fn cell_id(&self, node: &Self::Node) -> Option<SmolStr>;

    /// Whether the node is a block container (carries `data-block`).
    fn is_block_container(&self, node: &Self::Node) -> bool;

    /// Whether the node is a text node (offsets into it count characters,
    /// not children).
    fn is_text_node(&self, node: &Self::Node) -> bool;

    /// The node's parent element, if any.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// First descendant of `node` carrying a cell id.
    fn first_cell_in(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Every cell element in the block, in document order.
    fn cells(&self) -> Vec<Self::Node>;

    /// Rendered text of the node.
    fn text(&self, node: &Self::Node) -> String;

    /// Whether the element carries the given CSS class.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// UTF-16 length of the sibling text that precedes `node` inside its
    /// parent, so offsets into a later text fragment of a cell can be made
    /// relative to the whole cell.
    fn text_before(&self, node: &Self::Node) -> usize;

    /// Rendered text of the whole block.
    fn block_text(&self) -> String {
        self.text(&self.root())
    }

    /// Look up a cell element by id.
    fn find_cell(&self, id: &str) -> Option<Self::Node> {
        self.cells()
            .into_iter()
            .find(|cell| self.cell_id(cell).as_deref() == Some(id))
    }
}

/// A snapshot of the platform's native selection endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSelection<N> {
    pub anchor_node: N,
    pub anchor_offset: usize,
    pub focus_node: N,
    pub focus_offset: usize,
}

impl<N> NativeSelection<N> {
    pub fn new(anchor_node: N, anchor_offset: usize, focus_node: N, focus_offset: usize) -> Self {
        Self {
            anchor_node,
            anchor_offset,
            focus_node,
            focus_offset,
        }
    }
}

impl<N: Clone> NativeSelection<N> {
    /// Collapsed selection at a single position.
    pub fn caret(node: N, offset: usize) -> Self {
        Self {
            anchor_node: node.clone(),
            anchor_offset: offset,
            focus_node: node,
            focus_offset: offset,
        }
    }
}

/// Resolve the cell element nearest to a node reported by the selection API.
///
/// Looks at most one level up: the node itself, the first cell inside a
/// block container, or the node's direct parent.
pub fn resolve_cell<D: BlockDom>(dom: &D, node: &D::Node) -> Option<D::Node> {
    if dom.cell_id(node).is_some() {
        return Some(node.clone());
    }

    // Caret on the container itself: single-cell blocks without wrapping.
    if dom.is_block_container(node) {
        return dom.first_cell_in(node);
    }

    // Text fragment inside a cell.
    let parent = dom.parent(node)?;
    dom.cell_id(&parent).map(|_| parent)
}

/// Whether the block lacks a usable cell structure.
///
/// True with no cells at all, or with a single empty cell while the block
/// itself already has text (the user typed into a blank block before the
/// server inserted the first real cell).
pub fn is_out_of_cell<D: BlockDom>(dom: &D) -> bool {
    let cells = dom.cells();
    match cells.as_slice() {
        [] => true,
        [only] => dom.text(only).is_empty() && !dom.block_text().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBlock;

    #[test]
    fn test_resolve_cell_on_cell_element() {
        let block = MockBlock::new("b1").cell("c1", "hello", &[]);
        let cell = block.cell_node("c1");
        assert_eq!(resolve_cell(&block, &cell), Some(cell));
    }

    #[test]
    fn test_resolve_cell_on_text_fragment() {
        let block = MockBlock::new("b1").cell("c1", "hello", &[]);
        let text = block.text_node("c1");
        assert_eq!(resolve_cell(&block, &text), Some(block.cell_node("c1")));
    }

    #[test]
    fn test_resolve_cell_on_container_picks_first_cell() {
        let block = MockBlock::new("b1")
            .cell("c1", "one", &[])
            .cell("c2", "two", &[]);
        let root = block.root();
        assert_eq!(resolve_cell(&block, &root), Some(block.cell_node("c1")));
    }

    #[test]
    fn test_resolve_cell_does_not_walk_past_one_level() {
        let block = MockBlock::new("b1").cell("c1", "hello", &[]);
        let stray = block.stray_text("outside");
        assert_eq!(resolve_cell(&block, &stray), None);
    }

    #[test]
    fn test_out_of_cell_states() {
        let empty = MockBlock::new("b1").loose_text("ab");
        assert!(is_out_of_cell(&empty));

        let transitional = MockBlock::new("b1").cell("c1", "", &[]).loose_text("a");
        assert!(is_out_of_cell(&transitional));

        let blank = MockBlock::new("b1").cell("c1", "", &[]);
        assert!(!is_out_of_cell(&blank));

        let normal = MockBlock::new("b1").cell("c1", "x", &[]);
        assert!(!is_out_of_cell(&normal));
    }
}
