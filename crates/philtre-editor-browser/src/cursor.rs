//! Selection API reads and selection restoration.

use web_sys::{Document, Node};

use philtre_editor_core::{
    CellSelection, FocusIntent, HookError, NativeSelection, RestorePlan,
    extract_selection, is_at_start_of_block, plan_restore, utf16_len,
};

use crate::dom::BrowserBlock;
use crate::js_error;

/// The document's live selection, if it has both endpoints.
pub fn native_selection(document: &Document) -> Option<NativeSelection<Node>> {
    let selection = document.get_selection().ok()??;
    let anchor = selection.anchor_node()?;
    let focus = selection.focus_node()?;
    Some(NativeSelection::new(
        anchor,
        selection.anchor_offset() as usize,
        focus,
        selection.focus_offset() as usize,
    ))
}

/// The block's selection in cell coordinates.
pub fn block_selection(block: &BrowserBlock) -> Result<CellSelection, HookError> {
    let native = native_selection(&block.document()?);
    extract_selection(block, native.as_ref())
}

pub fn caret_at_start(block: &BrowserBlock) -> Result<bool, HookError> {
    let native = native_selection(&block.document()?);
    is_at_start_of_block(block, native.as_ref())
}

/// Restore the block's selection from its `data-selection-*` attributes.
///
/// A block without a complete set of attributes is not the focused one and
/// is left alone.
pub fn restore_from_attributes(block: &BrowserBlock) -> Result<(), HookError> {
    let el = block.element();
    let Some(intent) = FocusIntent::from_attributes(el.id(), |name| el.get_attribute(name)) else {
        return Ok(());
    };
    restore_selection(block, &intent)
}

/// Focus the block and select the range the intent names.
pub fn restore_selection(block: &BrowserBlock, intent: &FocusIntent) -> Result<(), HookError> {
    block.element().focus().map_err(js_error)?;

    let RestorePlan::Range {
        start_cell,
        start_offset,
        end_cell,
        end_offset,
    } = plan_restore(block, intent)
    else {
        return Ok(());
    };

    let document = block.document()?;
    let (start_node, start_offset) = range_anchor(&document, &start_cell, start_offset)?;
    let (end_node, end_offset) = range_anchor(&document, &end_cell, end_offset)?;

    tracing::trace!(
        target: "philtre::cursor",
        start_id = %intent.start_id,
        start_offset,
        end_id = %intent.end_id,
        end_offset,
        "restoring selection"
    );

    let range = document.create_range().map_err(js_error)?;
    range.set_start(&start_node, start_offset).map_err(js_error)?;
    range.set_end(&end_node, end_offset).map_err(js_error)?;

    let selection = document
        .get_selection()
        .map_err(js_error)?
        .ok_or("no selection object")?;
    selection.remove_all_ranges().map_err(js_error)?;
    selection.add_range(&range).map_err(js_error)?;
    Ok(())
}

/// Node and DOM offset for a range endpoint inside `cell`.
///
/// Offsets address the cell's first child. An empty cell gets an empty text
/// node so the range has somewhere to land.
fn range_anchor(document: &Document, cell: &Node, offset: usize) -> Result<(Node, u32), HookError> {
    let child = match cell.first_child() {
        Some(child) => child,
        None => {
            let text: Node = document.create_text_node("").into();
            cell.append_child(&text).map_err(js_error)?;
            text
        }
    };

    let limit = if child.node_type() == Node::TEXT_NODE {
        utf16_len(&child.text_content().unwrap_or_default())
    } else {
        child.child_nodes().length() as usize
    };

    Ok((child, offset.min(limit) as u32))
}

