//! Explicit registration of per-block handlers with the editor root.
//!
//! Document-wide input is subscribed once by the root; block hooks register
//! here on mount and unregister on destroy, so nothing outlives its block.

use std::collections::HashMap;

use smol_str::SmolStr;

/// Block handlers keyed by block element id.
#[derive(Debug)]
pub struct HookRegistry<H> {
    hooks: HashMap<SmolStr, H>,
}

impl<H> Default for HookRegistry<H> {
    fn default() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }
}

impl<H> HookRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the one it replaces (a re-mount of the
    /// same block).
    pub fn register(&mut self, block_id: impl Into<SmolStr>, handler: H) -> Option<H> {
        let block_id = block_id.into();
        tracing::trace!(%block_id, "registering block hook");
        self.hooks.insert(block_id, handler)
    }

    pub fn unregister(&mut self, block_id: &str) -> Option<H> {
        tracing::trace!(block_id, "unregistering block hook");
        self.hooks.remove(block_id)
    }

    pub fn get(&self, block_id: &str) -> Option<&H> {
        self.hooks.get(block_id)
    }

    pub fn contains(&self, block_id: &str) -> bool {
        self.hooks.contains_key(block_id)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &H)> {
        self.hooks.iter()
    }
}

impl<H: Clone> HookRegistry<H> {
    /// Snapshot of every registered handler.
    pub fn handlers(&self) -> Vec<H> {
        self.hooks.values().cloned().collect()
    }
}
