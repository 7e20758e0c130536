//! `BlockDom` over a live block element.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};

use philtre_editor_core::dom::{BLOCK_ATTR, CELL_ID_ATTR, CELL_SELECTOR, SAVE_FAILED_ATTR, TARGET_ATTR};
use philtre_editor_core::{BlockDom, HookError, SmolStr, utf16_len};

use crate::js_error;

/// A block's root element, read through the DOM.
#[derive(Debug, Clone)]
pub struct BrowserBlock {
    root: HtmlElement,
}

impl BrowserBlock {
    pub fn new(root: HtmlElement) -> Self {
        Self { root }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.root
    }

    pub fn document(&self) -> Result<web_sys::Document, HookError> {
        self.root
            .owner_document()
            .ok_or_else(|| HookError::from("block is not attached to a document"))
    }
}

impl BlockDom for BrowserBlock {
    type Node = Node;

    fn root(&self) -> Node {
        self.root.clone().into()
    }

    fn root_id(&self) -> Option<SmolStr> {
        let id = self.root.id();
        (!id.is_empty()).then(|| SmolStr::from(id))
    }

    fn cell_id(&self, node: &Node) -> Option<SmolStr> {
        node.dyn_ref::<Element>()?
            .get_attribute(CELL_ID_ATTR)
            .filter(|id| !id.is_empty())
            .map(SmolStr::from)
    }

    fn is_block_container(&self, node: &Node) -> bool {
        let root: &Node = self.root.as_ref();
        node == root
            || node
                .dyn_ref::<Element>()
                .is_some_and(|e| e.has_attribute(BLOCK_ATTR))
    }

    fn is_text_node(&self, node: &Node) -> bool {
        node.node_type() == Node::TEXT_NODE
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_element().map(Into::into)
    }

    fn first_cell_in(&self, node: &Node) -> Option<Node> {
        node.dyn_ref::<Element>()?
            .query_selector(CELL_SELECTOR)
            .ok()
            .flatten()
            .map(Into::into)
    }

    fn cells(&self) -> Vec<Node> {
        let Ok(list) = self.root.query_selector_all(CELL_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length()).filter_map(|i| list.get(i)).collect()
    }

    fn text(&self, node: &Node) -> String {
        match node.dyn_ref::<HtmlElement>() {
            Some(el) => el.inner_text(),
            None => node.text_content().unwrap_or_default(),
        }
    }

    fn has_class(&self, node: &Node, class: &str) -> bool {
        node.dyn_ref::<Element>()
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn text_before(&self, node: &Node) -> usize {
        let mut len = 0;
        let mut sibling = node.previous_sibling();
        while let Some(prev) = sibling {
            len += utf16_len(&prev.text_content().unwrap_or_default());
            sibling = prev.previous_sibling();
        }
        len
    }
}

/// The hook element's `phx-target`. Missing means the template and the
/// hook disagree, which is fatal for the dispatch in progress.
pub fn get_target(el: &Element) -> Result<String, HookError> {
    el.get_attribute(TARGET_ATTR)
        .filter(|t| !t.is_empty())
        .ok_or(HookError::MissingAttribute {
            attribute: TARGET_ATTR,
        })
}

/// Set or clear the block's unsaved-changes indicator.
pub fn set_save_failed(el: &Element, failed: bool) -> Result<(), HookError> {
    let result = if failed {
        el.set_attribute(SAVE_FAILED_ATTR, "")
    } else {
        el.remove_attribute(SAVE_FAILED_ATTR)
    };
    result.map_err(js_error)
}

/// First descendant matching `selector`, or a structural error.
pub fn query_required(el: &Element, selector: &str) -> Result<HtmlElement, HookError> {
    el.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| HookError::MissingElement {
            selector: selector.to_string(),
        })
}

/// Ids of every element matching `selector` in the document, skipping
/// elements without one.
pub fn element_ids(document: &web_sys::Document, selector: &str) -> Vec<SmolStr> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|el| el.id())
        .filter(|id| !id.is_empty())
        .map(SmolStr::from)
        .collect()
}
