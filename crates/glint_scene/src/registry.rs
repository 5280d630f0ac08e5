//! Node Registry
//!
//! Index from [`NodeId`] to the [`NodeHandle`] of every node currently
//! attached under a scene root. The registry never owns nodes; it mirrors
//! attachment state and is kept in sync by the owning [`Scene`](crate::Scene).
//!
//! A registry without an established root refuses lookups with
//! [`GlintError::UninitializedRegistry`]. Registries created by a scene have
//! their root established at construction.

use glint_core::{GlintError, NodeHandle, NodeId, Result};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct NodeRegistry {
    root: Option<NodeHandle>,
    nodes: FxHashMap<NodeId, NodeHandle>,
}

impl NodeRegistry {
    /// Creates a registry with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_root(root: NodeHandle) -> Self {
        Self {
            root: Some(root),
            nodes: FxHashMap::default(),
        }
    }

    /// The root queries start from.
    pub fn root(&self) -> Result<NodeHandle> {
        self.root.ok_or(GlintError::UninitializedRegistry)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Inserts or refreshes the mapping for `id`.
    pub fn register(&mut self, id: NodeId, handle: NodeHandle) {
        if self.nodes.insert(id, handle).is_none() {
            log::trace!("Registered node {id}");
        }
    }

    /// Removes the mapping for `id`, if any.
    pub fn unregister(&mut self, id: NodeId) -> Option<NodeHandle> {
        let removed = self.nodes.remove(&id);
        if removed.is_some() {
            log::trace!("Unregistered node {id}");
        }
        removed
    }

    pub fn get_by_id(&self, id: NodeId) -> Result<Option<NodeHandle>> {
        self.root()?;
        Ok(self.nodes.get(&id).copied())
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeHandle)> + '_ {
        self.nodes.iter().map(|(&id, &handle)| (id, handle))
    }
}
