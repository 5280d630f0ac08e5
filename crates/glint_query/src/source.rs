use glint_core::{NodeHandle, PropertyValue, Result};

/// Read-only view of a node hierarchy that queries run against.
///
/// Implemented by the scene; tests implement it over small fixture trees.
/// Queries never mutate the source.
pub trait QuerySource {
    /// The node queries start from when no context node is given.
    ///
    /// Fails with [`GlintError::UninitializedRegistry`](glint_core::GlintError::UninitializedRegistry)
    /// when the source has no established root.
    fn query_root(&self) -> Result<NodeHandle>;

    /// Whether `node` is part of the tree queries may start from.
    fn contains(&self, node: NodeHandle) -> bool;

    /// Children of `node` in draw order. Empty for unknown handles.
    fn child_handles(&self, node: NodeHandle) -> &[NodeHandle];

    fn node_name(&self, node: NodeHandle) -> Option<&str>;

    /// Reads a built-in or user property of `node`.
    fn node_property(&self, node: NodeHandle, property: &str) -> Option<PropertyValue>;
}
