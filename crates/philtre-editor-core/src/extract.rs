//! Cell extraction: a block's subtree to an ordered list of [`Cell`]s.
//!
//! Extraction only reads; it never repairs the subtree it is given.

use std::collections::BTreeSet;

use crate::dom::{BlockDom, is_out_of_cell};
use crate::error::HookError;
use crate::text::sanitize_text;
use crate::types::{Cell, Modifier};

/// Read the block's cells in document order.
///
/// Out-of-cell blocks produce a single synthetic cell holding the block's
/// whole text, keyed by the sole cell's id or the block's own id.
pub fn extract_cells<D: BlockDom>(dom: &D) -> Result<Vec<Cell>, HookError> {
    if is_out_of_cell(dom) {
        return default_cells(dom);
    }
    Ok(dom
        .cells()
        .iter()
        .map(|node| cell_from_element(dom, node))
        .collect())
}

/// The synthetic single-cell content for an out-of-cell block.
pub fn default_cells<D: BlockDom>(dom: &D) -> Result<Vec<Cell>, HookError> {
    let cells = dom.cells();
    let id = match cells.first() {
        None => dom.root_id(),
        Some(first) => dom.cell_id(first),
    }
    .ok_or(HookError::InvalidBlock)?;

    Ok(vec![Cell::plain(id, sanitize_text(&dom.block_text()))])
}

/// Convert one cell element, deriving modifiers from its classes.
pub fn cell_from_element<D: BlockDom>(dom: &D, node: &D::Node) -> Cell {
    let modifiers: BTreeSet<Modifier> = Modifier::ALL
        .into_iter()
        .filter(|m| dom.has_class(node, m.class_name()))
        .collect();

    Cell {
        id: dom.cell_id(node).unwrap_or_default(),
        text: sanitize_text(&dom.text(node)),
        modifiers,
    }
}
