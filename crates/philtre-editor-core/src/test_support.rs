//! In-memory `BlockDom` used by the unit tests.

use smol_str::SmolStr;

use crate::dom::BlockDom;
use crate::text::utf16_len;

#[derive(Debug, Clone, PartialEq)]
pub enum MockNode {
    Root,
    Cell(usize),
    CellText(usize),
    /// Text fragment `.1` of a cell split into several text nodes.
    Fragment(usize, usize),
    Loose(usize),
    Stray(String),
    /// A cell belonging to some other block.
    ForeignCell(String),
    ForeignText(String, String),
}

#[derive(Debug, Clone)]
struct MockCell {
    id: String,
    fragments: Vec<String>,
    classes: Vec<String>,
}

impl MockCell {
    fn text(&self) -> String {
        self.fragments.concat()
    }
}

/// A block root holding cells followed by loose text nodes.
#[derive(Debug, Clone)]
pub struct MockBlock {
    id: Option<String>,
    cells: Vec<MockCell>,
    loose: Vec<String>,
}

impl MockBlock {
    pub fn new(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            cells: Vec::new(),
            loose: Vec::new(),
        }
    }

    pub fn without_id() -> Self {
        Self {
            id: None,
            cells: Vec::new(),
            loose: Vec::new(),
        }
    }

    pub fn cell(self, id: &str, text: &str, classes: &[&str]) -> Self {
        self.fragmented_cell(id, &[text], classes)
    }

    /// A cell whose text is split across several text nodes.
    pub fn fragmented_cell(mut self, id: &str, fragments: &[&str], classes: &[&str]) -> Self {
        self.cells.push(MockCell {
            id: id.to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn loose_text(mut self, text: &str) -> Self {
        self.loose.push(text.to_string());
        self
    }

    fn index_of(&self, id: &str) -> usize {
        self.cells
            .iter()
            .position(|c| c.id == id)
            .unwrap_or_else(|| panic!("no mock cell {id}"))
    }

    pub fn cell_node(&self, id: &str) -> MockNode {
        MockNode::Cell(self.index_of(id))
    }

    pub fn text_node(&self, id: &str) -> MockNode {
        MockNode::CellText(self.index_of(id))
    }

    pub fn fragment_node(&self, id: &str, index: usize) -> MockNode {
        MockNode::Fragment(self.index_of(id), index)
    }

    /// A text node inside cell `cell_id` of a different block.
    pub fn foreign_text(&self, cell_id: &str, text: &str) -> MockNode {
        MockNode::ForeignText(cell_id.to_string(), text.to_string())
    }

    pub fn loose_node(&self, index: usize) -> MockNode {
        MockNode::Loose(index)
    }

    pub fn stray_text(&self, text: &str) -> MockNode {
        MockNode::Stray(text.to_string())
    }
}

impl BlockDom for MockBlock {
    type Node = MockNode;

    fn root(&self) -> MockNode {
        MockNode::Root
    }

    fn root_id(&self) -> Option<SmolStr> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(SmolStr::new)
    }

    fn cell_id(&self, node: &MockNode) -> Option<SmolStr> {
        match node {
            MockNode::Cell(i) => self
                .cells
                .get(*i)
                .map(|c| c.id.as_str())
                .filter(|id| !id.is_empty())
                .map(SmolStr::new),
            MockNode::ForeignCell(id) => Some(SmolStr::new(id)),
            _ => None,
        }
    }

    fn is_block_container(&self, node: &MockNode) -> bool {
        *node == MockNode::Root
    }

    fn is_text_node(&self, node: &MockNode) -> bool {
        matches!(
            node,
            MockNode::CellText(_)
                | MockNode::Fragment(..)
                | MockNode::Loose(_)
                | MockNode::Stray(_)
                | MockNode::ForeignText(..)
        )
    }

    fn parent(&self, node: &MockNode) -> Option<MockNode> {
        match node {
            MockNode::Root | MockNode::Stray(_) | MockNode::ForeignCell(_) => None,
            MockNode::Cell(_) | MockNode::Loose(_) => Some(MockNode::Root),
            MockNode::CellText(i) | MockNode::Fragment(i, _) => Some(MockNode::Cell(*i)),
            MockNode::ForeignText(id, _) => Some(MockNode::ForeignCell(id.clone())),
        }
    }

    fn first_cell_in(&self, node: &MockNode) -> Option<MockNode> {
        match node {
            MockNode::Root if !self.cells.is_empty() => Some(MockNode::Cell(0)),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<MockNode> {
        (0..self.cells.len()).map(MockNode::Cell).collect()
    }

    fn text(&self, node: &MockNode) -> String {
        match node {
            MockNode::Root => {
                let mut text: String = self.cells.iter().map(MockCell::text).collect();
                for loose in &self.loose {
                    text.push_str(loose);
                }
                text
            }
            MockNode::Cell(i) | MockNode::CellText(i) => self.cells[*i].text(),
            MockNode::Fragment(i, j) => self.cells[*i].fragments[*j].clone(),
            MockNode::Loose(i) => self.loose[*i].clone(),
            MockNode::Stray(text) | MockNode::ForeignText(_, text) => text.clone(),
            MockNode::ForeignCell(_) => String::new(),
        }
    }

    fn has_class(&self, node: &MockNode, class: &str) -> bool {
        match node {
            MockNode::Cell(i) => self.cells[*i].classes.iter().any(|c| c == class),
            _ => false,
        }
    }

    fn text_before(&self, node: &MockNode) -> usize {
        match node {
            MockNode::Fragment(i, j) => self.cells[*i].fragments[..*j]
                .iter()
                .map(|f| utf16_len(f))
                .sum(),
            _ => 0,
        }
    }
}
