//! Selection extraction: native selection endpoints to [`CellSelection`].

use crate::dom::{BlockDom, NativeSelection, is_out_of_cell, resolve_cell};
use crate::error::{HookError, SelectionSide};
use crate::extract::extract_cells;
use crate::text::{clamp_offset, utf16_len};
use crate::types::CellSelection;

/// Selection used when the block has no usable cell structure.
///
/// Points at the first cell (or the block itself when there is none) with
/// the caret implicitly at the end of the block's text.
pub fn default_selection<D: BlockDom>(dom: &D) -> Result<CellSelection, HookError> {
    let offset = utf16_len(&dom.block_text());
    let id = dom
        .first_cell_in(&dom.root())
        .and_then(|cell| dom.cell_id(&cell))
        .or_else(|| dom.root_id())
        .ok_or(HookError::InvalidBlock)?;
    Ok(CellSelection::caret(id, offset))
}

/// Convert the native selection into a cell-addressed selection.
///
/// Out-of-cell blocks always yield [`default_selection`] and do not need a
/// native selection. Otherwise both endpoints must resolve to cells of this
/// block; anything else is an error rather than a guessed payload.
pub fn extract_selection<D: BlockDom>(
    dom: &D,
    native: Option<&NativeSelection<D::Node>>,
) -> Result<CellSelection, HookError> {
    if is_out_of_cell(dom) {
        return default_selection(dom);
    }

    let native = native.ok_or(HookError::NoSelection)?;

    let (anchor_id, anchor_cell) = resolve_endpoint(dom, &native.anchor_node, SelectionSide::Anchor)?;
    let (focus_id, focus_cell) = resolve_endpoint(dom, &native.focus_node, SelectionSide::Focus)?;

    // An endpoint in another block's cell (focus moved away while a command
    // waited) must not be reported against this block.
    let cells = dom.cells();
    let anchor_index = cells
        .iter()
        .position(|c| *c == anchor_cell)
        .ok_or(HookError::UnresolvableSelection { side: SelectionSide::Anchor })?;
    let focus_index = cells
        .iter()
        .position(|c| *c == focus_cell)
        .ok_or(HookError::UnresolvableSelection { side: SelectionSide::Focus })?;

    let anchor_offset = endpoint_offset(dom, &native.anchor_node, &anchor_cell, native.anchor_offset);
    let focus_offset = endpoint_offset(dom, &native.focus_node, &focus_cell, native.focus_offset);

    // Cell order decides across cells; within one cell the smaller offset wins.
    let anchor_first = if anchor_index != focus_index {
        anchor_index < focus_index
    } else {
        anchor_offset <= focus_offset
    };

    tracing::trace!(
        %anchor_id,
        anchor_offset,
        %focus_id,
        focus_offset,
        anchor_first,
        "extract_selection: resolved endpoints"
    );

    let selection = if anchor_first {
        CellSelection::new(anchor_id, anchor_offset, focus_id, focus_offset)
    } else {
        CellSelection::new(focus_id, focus_offset, anchor_id, anchor_offset)
    };
    Ok(selection)
}

/// Whether the caret sits at offset 0 of the block's first cell.
pub fn is_at_start_of_block<D: BlockDom>(
    dom: &D,
    native: Option<&NativeSelection<D::Node>>,
) -> Result<bool, HookError> {
    let selection = extract_selection(dom, native)?;
    let cells = extract_cells(dom)?;
    Ok(cells
        .first()
        .is_some_and(|first| selection.starts_at(&first.id)))
}

fn resolve_endpoint<D: BlockDom>(
    dom: &D,
    node: &D::Node,
    side: SelectionSide,
) -> Result<(smol_str::SmolStr, D::Node), HookError> {
    let cell = resolve_cell(dom, node).ok_or(HookError::UnresolvableSelection { side })?;
    let id = dom
        .cell_id(&cell)
        .ok_or(HookError::UnresolvableSelection { side })?;
    Ok((id, cell))
}

/// Offset of an endpoint within its cell's text.
///
/// Text-node offsets are shifted past any earlier text fragments of the
/// same cell, then clamped to the cell. Element endpoints carry a child
/// index instead, so 0 maps to the start and anything else to the end of
/// the cell.
fn endpoint_offset<D: BlockDom>(dom: &D, node: &D::Node, cell: &D::Node, offset: usize) -> usize {
    let cell_text = dom.text(cell);
    if dom.is_text_node(node) {
        clamp_offset(&cell_text, dom.text_before(node) + offset)
    } else if offset == 0 {
        0
    } else {
        utf16_len(&cell_text)
    }
}
