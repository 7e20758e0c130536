//! Selection restoration after a server re-render.
//!
//! The server names the target selection as a [`FocusIntent`], delivered
//! either as a pushed event or through data attributes on the block.
//! [`plan_restore`] turns it into concrete steps against the current DOM;
//! the platform layer performs them.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::dom::{
    BlockDom, SELECTION_END_ID_ATTR, SELECTION_END_OFFSET_ATTR, SELECTION_START_ID_ATTR,
    SELECTION_START_OFFSET_ATTR,
};
use crate::text::clamp_offset;

/// Where the server wants the caret after a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusIntent {
    /// The block element's id. Empty when read from the block itself.
    #[serde(default)]
    pub block_id: SmolStr,
    pub start_id: SmolStr,
    pub start_offset: usize,
    pub end_id: SmolStr,
    pub end_offset: usize,
}

impl FocusIntent {
    /// Read the intent from a block's selection attributes.
    ///
    /// Returns `None` if any attribute is missing or empty (the block is not
    /// the focused one) or if an offset is not a number.
    pub fn from_attributes<F>(block_id: impl Into<SmolStr>, get_attribute: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| get_attribute(name).filter(|v| !v.is_empty());

        let start_id = read(SELECTION_START_ID_ATTR)?;
        let end_id = read(SELECTION_END_ID_ATTR)?;
        let start_offset = read(SELECTION_START_OFFSET_ATTR)?;
        let end_offset = read(SELECTION_END_OFFSET_ATTR)?;

        let parse = |raw: &str| match raw.trim().parse::<usize>() {
            Ok(offset) => Some(offset),
            Err(_) => {
                tracing::warn!(raw, "ignoring focus intent with unparseable offset");
                None
            }
        };

        Some(Self {
            block_id: block_id.into(),
            start_id: start_id.into(),
            start_offset: parse(start_offset.as_str())?,
            end_id: end_id.into(),
            end_offset: parse(end_offset.as_str())?,
        })
    }
}

/// Concrete restoration steps for one block.
#[derive(Debug, Clone, PartialEq)]
pub enum RestorePlan<N> {
    /// Focus the block; there is no text to anchor a range into.
    FocusOnly,
    /// Focus the block, then select from start to end. Each endpoint is a
    /// cell element plus an offset into its first text child.
    Range {
        start_cell: N,
        start_offset: usize,
        end_cell: N,
        end_offset: usize,
    },
    /// Focus the block but leave the selection alone: the intent names cells
    /// this render no longer has.
    Stale,
}

/// Decide how to apply an intent to the block as currently rendered.
pub fn plan_restore<D: BlockDom>(dom: &D, intent: &FocusIntent) -> RestorePlan<D::Node> {
    if dom.block_text().is_empty() {
        return RestorePlan::FocusOnly;
    }

    let (Some(start_cell), Some(end_cell)) =
        (dom.find_cell(&intent.start_id), dom.find_cell(&intent.end_id))
    else {
        tracing::warn!(
            start_id = %intent.start_id,
            end_id = %intent.end_id,
            "focus intent names cells missing from the current render"
        );
        return RestorePlan::Stale;
    };

    let start_offset = clamp_offset(&dom.text(&start_cell), intent.start_offset);
    let end_offset = clamp_offset(&dom.text(&end_cell), intent.end_offset);

    RestorePlan::Range {
        start_cell,
        start_offset,
        end_cell,
        end_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NativeSelection;
    use crate::selection::extract_selection;
    use crate::test_support::{MockBlock, MockNode};
    use crate::types::CellSelection;
    use std::collections::HashMap;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_attrs() -> HashMap<String, String> {
        attrs(&[
            (SELECTION_START_ID_ATTR, "c1"),
            (SELECTION_END_ID_ATTR, "c2"),
            (SELECTION_START_OFFSET_ATTR, "1"),
            (SELECTION_END_OFFSET_ATTR, "3"),
        ])
    }

    #[test]
    fn test_intent_from_attributes() {
        let map = full_attrs();
        let intent = FocusIntent::from_attributes("b1", |k| map.get(k).cloned()).unwrap();
        assert_eq!(
            intent,
            FocusIntent {
                block_id: "b1".into(),
                start_id: "c1".into(),
                start_offset: 1,
                end_id: "c2".into(),
                end_offset: 3,
            }
        );
    }

    #[test]
    fn test_intent_requires_all_attributes() {
        for missing in [
            SELECTION_START_ID_ATTR,
            SELECTION_END_ID_ATTR,
            SELECTION_START_OFFSET_ATTR,
            SELECTION_END_OFFSET_ATTR,
        ] {
            let mut map = full_attrs();
            map.remove(missing);
            assert_eq!(FocusIntent::from_attributes("b1", |k| map.get(k).cloned()), None);

            let mut map = full_attrs();
            map.insert(missing.to_string(), String::new());
            assert_eq!(FocusIntent::from_attributes("b1", |k| map.get(k).cloned()), None);
        }
    }

    #[test]
    fn test_intent_rejects_bad_offsets() {
        let mut map = full_attrs();
        map.insert(SELECTION_END_OFFSET_ATTR.to_string(), "three".to_string());
        assert_eq!(FocusIntent::from_attributes("b1", |k| map.get(k).cloned()), None);
    }

    #[test]
    fn test_intent_from_pushed_event() {
        let intent: FocusIntent = serde_json::from_value(serde_json::json!({
            "start_id": "c1",
            "start_offset": 0,
            "end_id": "c1",
            "end_offset": 0,
        }))
        .unwrap();
        assert_eq!(intent.block_id, "");
        assert_eq!(intent.start_id, "c1");
    }

    fn intent(start: (&str, usize), end: (&str, usize)) -> FocusIntent {
        FocusIntent {
            block_id: "b1".into(),
            start_id: start.0.into(),
            start_offset: start.1,
            end_id: end.0.into(),
            end_offset: end.1,
        }
    }

    #[test]
    fn test_plan_for_empty_block_only_focuses() {
        let block = MockBlock::new("b1").cell("c1", "", &[]);
        assert_eq!(plan_restore(&block, &intent(("c1", 0), ("c1", 0))), RestorePlan::FocusOnly);
    }

    #[test]
    fn test_plan_for_stale_ids() {
        let block = MockBlock::new("b1").cell("c1", "abc", &[]);
        assert_eq!(plan_restore(&block, &intent(("c1", 0), ("gone", 0))), RestorePlan::Stale);
        assert_eq!(plan_restore(&block, &intent(("gone", 0), ("c1", 0))), RestorePlan::Stale);
    }

    #[test]
    fn test_plan_clamps_offsets() {
        let block = MockBlock::new("b1").cell("c1", "abc", &[]).cell("c2", "de", &[]);
        assert_eq!(
            plan_restore(&block, &intent(("c1", 1), ("c2", 10))),
            RestorePlan::Range {
                start_cell: MockNode::Cell(0),
                start_offset: 1,
                end_cell: MockNode::Cell(1),
                end_offset: 2,
            }
        );
    }

    #[test]
    fn test_restore_then_extract_is_stable() {
        let block = MockBlock::new("b1")
            .cell("c1", "hello", &[])
            .cell("c2", "world", &["italic"]);

        for (start, end) in [(("c1", 0), ("c1", 0)), (("c1", 2), ("c2", 4)), (("c2", 5), ("c2", 5))] {
            let plan = plan_restore(&block, &intent(start, end));
            let RestorePlan::Range {
                start_cell,
                start_offset,
                end_cell,
                end_offset,
            } = plan
            else {
                panic!("expected a range plan");
            };

            // The platform anchors into each cell's first text child.
            let as_text = |node: MockNode| match node {
                MockNode::Cell(i) => MockNode::CellText(i),
                other => other,
            };
            let native = NativeSelection::new(
                as_text(start_cell),
                start_offset,
                as_text(end_cell),
                end_offset,
            );
            let extracted = extract_selection(&block, Some(&native)).unwrap();
            assert_eq!(extracted, CellSelection::new(start.0, start.1, end.0, end.1));
        }
    }
}
