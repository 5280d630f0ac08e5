use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use glint_core::{GlintError, NodeHandle, NodeId, PropertyValue, Result};
use glint_query::{Query, QuerySource, SceneQuery};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::backend::RenderBackend;
use crate::content::{Content, TextureState};
use crate::events::{FrameInfo, NodeEvent, SceneEvents};
use crate::loader::{LoadEvent, ResourceLoader};
use crate::node::Node;
use crate::registry::NodeRegistry;
use crate::settings::SceneSettings;
use crate::traversal::{self, FrameOutput};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph.
///
/// The scene owns every node in an arena and a root sentinel created at
/// construction. Nodes reachable from the root through child links are
/// *attached* and indexed by the scene's [`NodeRegistry`]; everything else
/// in the arena is detached and invisible to traversal and queries.
///
/// All tree mutation goes through the scene so the parent link, the
/// parent's child list and the registry always change together.
pub struct Scene {
    pub id: u32,

    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
    registry: NodeRegistry,

    pub settings: SceneSettings,
    pub events: SceneEvents,

    frame_output: FrameOutput,
    frame: u64,
    last_dt: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(SceneSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: SceneSettings) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root"));
        // The root is its own parent.
        nodes[root].parent = Some(root);

        let id = NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("Created scene {id} with max depth {}", settings.max_depth);

        Self {
            id,
            nodes,
            root,
            registry: NodeRegistry::with_root(root),
            settings,
            events: SceneEvents::default(),
            frame_output: FrameOutput::default(),
            frame: 0,
            last_dt: 0.0,
        }
    }

    // ========================================================================
    // Node creation
    // ========================================================================

    /// Creates a detached node.
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        self.nodes.insert(Node::new(name))
    }

    /// Moves a standalone node into the arena, detached.
    pub fn insert_node(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    /// Starts building a node.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    // ========================================================================
    // Tree mutation
    // ========================================================================

    /// Appends `child` to `parent`'s children.
    ///
    /// A child that already has another parent is detached from it first.
    /// Adding a child to its current parent is a no-op. Fails with
    /// [`GlintError::Cycle`] when `child` is `parent`, the root, or an
    /// ancestor of `parent`; the tree is left unchanged in that case.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;

        if child == parent || child == self.root || self.is_ancestor(child, parent) {
            return Err(GlintError::Cycle { parent, child });
        }

        let old_parent = self.nodes[child].parent;
        if old_parent == Some(parent) {
            return Ok(());
        }
        if let Some(old_parent) = old_parent {
            self.detach(old_parent, child);
        }

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[child].transform.mark_dirty();
        log::trace!("Attached {child:?} under {parent:?}");

        if self.is_attached(parent) {
            self.register_subtree(child);
        }
        Ok(())
    }

    /// Removes `child` from `parent`'s children.
    ///
    /// Returns `child`. Does nothing when `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<NodeHandle> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;

        if child != self.root && self.nodes[child].parent == Some(parent) {
            self.detach(parent, child);
        }
        Ok(child)
    }

    /// Removes `child` from its parent, if it has one.
    pub fn remove_from_parent(&mut self, child: NodeHandle) -> Result<NodeHandle> {
        self.ensure_exists(child)?;
        match self.nodes[child].parent {
            Some(parent) => self.remove_child(parent, child),
            None => Ok(child),
        }
    }

    /// Snapshot of `node`'s children. Empty for unknown handles.
    #[must_use]
    pub fn get_children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// First child of `node` named `name`, in child-list order.
    #[must_use]
    pub fn get_child_by_name(&self, node: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.nodes
            .get(node)?
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|c| c.name == name))
    }

    /// Detaches `handle` and drops it together with its whole subtree.
    pub fn destroy_node(&mut self, handle: NodeHandle) -> Result<()> {
        if handle == self.root {
            return Err(GlintError::RootNode);
        }
        self.remove_from_parent(handle)?;

        for node in self.subtree(handle) {
            self.nodes.remove(node);
        }
        log::trace!("Destroyed {handle:?}");
        Ok(())
    }

    fn ensure_exists(&self, handle: NodeHandle) -> Result<()> {
        if self.nodes.contains_key(handle) {
            Ok(())
        } else {
            Err(GlintError::NodeNotFound(handle))
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = node;
        while let Some(parent) = self.nodes.get(current).and_then(|n| n.parent) {
            if parent == current {
                // Root sentinel.
                return false;
            }
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    fn detach(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent)
            && let Some(pos) = p.children.iter().position(|&c| c == child)
        {
            p.children.remove(pos);
        }
        let was_attached = self.is_attached(child);
        self.nodes[child].parent = None;
        log::trace!("Detached {child:?} from {parent:?}");

        if was_attached {
            self.unregister_subtree(child);
        }
    }

    /// Handles of `handle` and all its descendants, in pre-order.
    fn subtree(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn register_subtree(&mut self, handle: NodeHandle) {
        for node in self.subtree(handle) {
            let id = self.nodes[node].id();
            self.registry.register(id, node);
            self.events
                .node_attached
                .emit(&NodeEvent { handle: node, id });
        }
    }

    fn unregister_subtree(&mut self, handle: NodeHandle) {
        for node in self.subtree(handle) {
            let id = self.nodes[node].id();
            if self.registry.unregister(id).is_some() {
                self.events
                    .node_detached
                    .emit(&NodeEvent { handle: node, id });
            }
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Looks up an attached node by id.
    pub fn get_by_id(&self, id: NodeId) -> Result<Option<&Node>> {
        Ok(self
            .registry
            .get_by_id(id)?
            .and_then(|handle| self.nodes.get(handle)))
    }

    /// Handle of the attached node with `id`.
    #[must_use]
    pub fn handle_of(&self, id: NodeId) -> Option<NodeHandle> {
        self.registry.get_by_id(id).ok().flatten()
    }

    /// Whether `handle` is the root or reachable from it.
    #[must_use]
    pub fn is_attached(&self, handle: NodeHandle) -> bool {
        if handle == self.root {
            return true;
        }
        self.nodes
            .get(handle)
            .is_some_and(|node| self.registry.contains(node.id()))
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Number of nodes in the arena, detached ones and the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Runs a path query from the root. `None` and `""` match nothing.
    pub fn find(&self, query: Option<&str>) -> Result<Vec<NodeHandle>> {
        SceneQuery::new(self).find(query)
    }

    /// Runs a path query from `context`, or from the root.
    pub fn find_from(
        &self,
        query: Option<&str>,
        context: Option<NodeHandle>,
    ) -> Result<Vec<NodeHandle>> {
        SceneQuery::new(self).find_from(query, context)
    }

    /// Runs a precompiled query.
    pub fn run_query(&self, query: &Query, context: Option<NodeHandle>) -> Result<Vec<NodeHandle>> {
        query.execute(self, context)
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances content of every attached node by `dt` seconds, then emits
    /// [`SceneEvents::frame`].
    pub fn tick(&mut self, dt: f32) {
        for handle in self.subtree(self.root) {
            self.nodes[handle].content.update(dt);
        }

        self.frame += 1;
        self.last_dt = dt;
        let info = FrameInfo {
            frame: self.frame,
            dt,
        };
        self.events.frame.emit(&info);
    }

    /// Rebuilds the draw list from the current tree state.
    pub fn traverse(&mut self) -> &FrameOutput {
        traversal::traverse(
            &mut self.nodes,
            self.root,
            &self.settings,
            &mut self.frame_output,
        );
        &self.frame_output
    }

    /// [`tick`](Self::tick) followed by [`traverse`](Self::traverse).
    pub fn update(&mut self, dt: f32) -> &FrameOutput {
        self.tick(dt);
        self.traverse()
    }

    /// Output of the last traversal.
    #[inline]
    #[must_use]
    pub fn frame_output(&self) -> &FrameOutput {
        &self.frame_output
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Replays the last traversal into `backend`.
    pub fn render(&self, backend: &mut dyn RenderBackend) {
        backend.begin_frame(&FrameInfo {
            frame: self.frame,
            dt: self.last_dt,
        });

        for item in &self.frame_output.draw_list {
            if let Some(node) = self.nodes.get(item.handle) {
                backend.draw(item, &node.content);
            }
        }
        for bounds in &self.frame_output.debug_bounds {
            backend.draw_debug_bounds(bounds);
        }
        for origin in &self.frame_output.debug_origins {
            backend.draw_debug_origin(origin);
        }

        backend.end_frame();
    }

    // ========================================================================
    // Resource loading
    // ========================================================================

    /// Starts loading every pending texture of the attached tree.
    ///
    /// Each url is requested once per call. Returns the number of loads started.
    pub fn request_textures(&mut self, loader: &mut dyn ResourceLoader) -> usize {
        let mut requested = FxHashSet::default();

        for handle in self.subtree(self.root) {
            let Content::Texture(texture) = &mut self.nodes[handle].content else {
                continue;
            };
            if texture.state != TextureState::Pending {
                continue;
            }
            texture.state = TextureState::Loading;
            if requested.insert(texture.url.clone()) {
                log::debug!("Requesting texture {:?}", texture.url);
                loader.start_load(&texture.url);
            }
        }

        requested.len()
    }

    /// Applies every completion reported by `loader`.
    pub fn pump_loads(&mut self, loader: &mut dyn ResourceLoader) -> usize {
        let events = loader.poll();
        let count = events.len();
        for event in events {
            self.apply_load_event(&event);
        }
        count
    }

    /// Stores a load result on every unresolved texture with the event's
    /// url, then emits [`SceneEvents::texture_loaded`].
    ///
    /// Returns the number of textures updated.
    pub fn apply_load_event(&mut self, event: &LoadEvent) -> usize {
        let mut updated = 0;

        for (_, node) in &mut self.nodes {
            let Content::Texture(texture) = &mut node.content else {
                continue;
            };
            if texture.url != event.url
                || !matches!(texture.state, TextureState::Pending | TextureState::Loading)
            {
                continue;
            }
            texture.state = match &event.result {
                Ok(handle) => TextureState::Loaded(*handle),
                Err(reason) => TextureState::Failed(reason.clone()),
            };
            updated += 1;
        }

        if let Err(reason) = &event.result {
            log::warn!("Texture {:?} failed to load: {reason}", event.url);
        }
        self.events.texture_loaded.emit(event);
        updated
    }
}

impl QuerySource for Scene {
    fn query_root(&self) -> Result<NodeHandle> {
        self.registry.root()
    }

    fn contains(&self, node: NodeHandle) -> bool {
        self.is_attached(node)
    }

    fn child_handles(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(node).map_or(&[][..], |n| n.children())
    }

    fn node_name(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    fn node_property(&self, node: NodeHandle, property: &str) -> Option<PropertyValue> {
        self.nodes.get(node)?.property_value(property)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("attached", &self.registry.len())
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::new(name),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.node.transform.set_position(x, y);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.node.transform.rotation = radians;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, x: f32, y: f32) -> Self {
        self.node.transform.set_scale(x, y);
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.node.transform.set_anchor(x, y);
        self
    }

    #[must_use]
    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.node.tint = tint;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.node.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.node.visible = visible;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.node.content = content.into();
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.node.set_property(key, value);
        self
    }

    /// Attaches the node under `parent` on build.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Inserts the node, attaching it when a parent was given.
    ///
    /// On a failed attach the node is dropped again.
    pub fn build(self) -> Result<NodeHandle> {
        let handle = self.scene.nodes.insert(self.node);

        if let Some(parent) = self.parent
            && let Err(err) = self.scene.add_child(parent, handle)
        {
            self.scene.nodes.remove(handle);
            return Err(err);
        }
        Ok(handle)
    }
}
