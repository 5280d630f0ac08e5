use glam::{Mat4, Vec3};
use glint_core::{NodeHandle, NodeId, PropertyValue};
use rustc_hash::FxHashMap;

use crate::content::Content;
use crate::transform::Transform;

/// A scene node.
///
/// # Hierarchy
///
/// Nodes live in a [`Scene`](crate::Scene) arena and refer to each other by
/// [`NodeHandle`]. The parent link and the parent's child list are only ever
/// changed together, through the scene's tree mutation API. The scene root
/// is its own parent.
///
/// # Identity
///
/// Each node receives a process-unique [`NodeId`] at construction. `Node`
/// is deliberately not `Clone` so an id can never be shared.
///
/// # Frame state
///
/// World matrix, composed tint, composed alpha and depth are written by
/// the traversal each frame and are only meaningful after it ran.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Local State ===
    pub transform: Transform,
    /// Hidden nodes prune their whole subtree from the draw list.
    pub visible: bool,
    /// Own opacity in `0..=1`.
    pub alpha: f32,
    /// Own RGB tint in `0..=1`, multiplied down the hierarchy.
    pub tint: Vec3,
    pub content: Content,
    properties: FxHashMap<String, PropertyValue>,

    // === Frame State ===
    pub(crate) composed_tint: Vec3,
    pub(crate) composed_alpha: f32,
    pub(crate) depth: f32,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            alpha: 1.0,
            tint: Vec3::ONE,
            content: Content::Empty,
            properties: FxHashMap::default(),
            composed_tint: Vec3::ONE,
            composed_alpha: 1.0,
            depth: 0.0,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.content = content.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Child handles in draw order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Mat4 {
        self.transform.world_matrix()
    }

    #[inline]
    #[must_use]
    pub fn composed_tint(&self) -> Vec3 {
        self.composed_tint
    }

    #[inline]
    #[must_use]
    pub fn composed_alpha(&self) -> f32 {
        self.composed_alpha
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Sets a user property, returning the previous value.
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reads a property by name as seen by the query engine.
    ///
    /// Built-in fields take precedence over user properties of the same
    /// name: `id`, `name`, `visible`, `alpha`, `x`, `y`, `rotation`,
    /// `scaleX`, `scaleY`, `depth`, `childCount`.
    #[must_use]
    pub fn property_value(&self, key: &str) -> Option<PropertyValue> {
        let builtin = match key {
            "id" => PropertyValue::Number(self.id.as_u64() as f64),
            "name" => PropertyValue::Text(self.name.clone()),
            "visible" => PropertyValue::Bool(self.visible),
            "alpha" => self.alpha.into(),
            "x" => self.transform.position.x.into(),
            "y" => self.transform.position.y.into(),
            "rotation" => self.transform.rotation.into(),
            "scaleX" => self.transform.scale.x.into(),
            "scaleY" => self.transform.scale.y.into(),
            "depth" => self.depth.into(),
            "childCount" => PropertyValue::Number(self.children.len() as f64),
            _ => return self.properties.get(key).cloned(),
        };
        Some(builtin)
    }

    /// Resets the per-frame composition state before the node is visited.
    pub(crate) fn reset_frame_state(&mut self, depth: f32) {
        self.transform.world_matrix = Mat4::IDENTITY;
        self.composed_tint = Vec3::ONE;
        self.composed_alpha = 1.0;
        self.depth = depth;
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
