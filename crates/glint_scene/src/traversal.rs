//! Frame Traversal
//!
//! Walks the hierarchy once per frame, starting at the root, and produces
//! the ordered draw list consumed by the renderer.
//!
//! For every visited node the traversal:
//!
//! 1. assigns a depth from the parent's depth window,
//! 2. resets the node's world matrix, composed tint and composed alpha,
//! 3. stops there if the node is hidden, pruning its whole subtree,
//! 4. otherwise composes `world = parent_world * local`,
//!    `tint = parent_tint * tint` and `alpha = parent_alpha * alpha`,
//!    appends the node to the draw list and queues its children.
//!
//! Visiting is pre-order with children in child-list order, which is also
//! the draw order.
//!
//! # Depth windows
//!
//! A node with `len` children splits its window `[min, max)` into `len`
//! equal slices of width `diff`. Child `i` gets depth `min + diff * i` and
//! hands the range `[depth + diff / 10, depth + 9 * diff / 10]` down to its
//! own children. Windows shrink geometrically with tree depth; once a
//! window is too narrow to split, descendants share one depth and
//! [`FrameOutput::depth_underflow`] is raised.
//!
//! The root is the sentinel of the hierarchy: its own transform, tint and
//! alpha seed the composition, but it is never part of the draw list.

use glam::{Mat4, Vec2, Vec3};
use glint_core::{NodeHandle, NodeId};
use slotmap::SlotMap;

use crate::content::Rect;
use crate::node::Node;
use crate::settings::{DebugOverlays, SceneSettings};

/// One visible node, resolved for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub handle: NodeHandle,
    pub id: NodeId,
    pub world: Mat4,
    pub tint: Vec3,
    pub alpha: f32,
    pub depth: f32,
}

impl DrawItem {
    /// World matrix as 16 column-major floats.
    #[must_use]
    pub fn world_cols(&self) -> [f32; 16] {
        self.world.to_cols_array()
    }
}

/// World-space bounding box of a drawn node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugBounds {
    pub handle: NodeHandle,
    pub rect: Rect,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugOrigin {
    pub handle: NodeHandle,
    pub point: Vec2,
}

/// Result of one traversal.
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Visible nodes in draw order.
    pub draw_list: Vec<DrawItem>,
    pub debug_bounds: Vec<DebugBounds>,
    pub debug_origins: Vec<DebugOrigin>,
    /// Nodes visited, root and hidden nodes included.
    pub visited: usize,
    /// Set when some depth window became too narrow to order its children.
    pub depth_underflow: bool,
}

impl FrameOutput {
    pub fn clear(&mut self) {
        self.draw_list.clear();
        self.debug_bounds.clear();
        self.debug_origins.clear();
        self.visited = 0;
        self.depth_underflow = false;
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.draw_list.iter().any(|item| item.handle == handle)
    }

    /// Draw-list handles in order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.draw_list.iter().map(|item| item.handle)
    }
}

/// A half-open depth range reserved for a node's descendants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthWindow {
    pub min: f64,
    pub max: f64,
}

impl DepthWindow {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `len` children can get strictly increasing depths and
    /// non-empty windows of their own.
    #[must_use]
    pub fn can_split(self, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        let margin = (self.max - self.min) / len as f64 / 10.0;
        margin > 0.0 && self.max + margin > self.max && self.min + margin > self.min
    }

    /// Whether the depths of `len` children stay strictly increasing, and
    /// above `parent_depth`, once narrowed to the stored `f32`.
    #[must_use]
    pub fn orders_in_f32(self, parent_depth: Option<f32>, len: usize) -> bool {
        let mut previous = parent_depth;
        for index in 0..len {
            let (depth, _) = self.slot(index, len);
            let stored = depth as f32;
            if previous.is_some_and(|p| stored <= p) {
                return false;
            }
            previous = Some(stored);
        }
        true
    }

    /// Depth and child window of child `index` out of `len`.
    #[must_use]
    pub fn slot(self, index: usize, len: usize) -> (f64, Self) {
        let diff = (self.max - self.min) / len as f64;
        let depth = self.min + diff * index as f64;
        let margin = diff / 10.0;
        let window = if margin > 0.0 && depth + margin > depth {
            Self::new(depth + margin, depth + margin * 9.0)
        } else {
            Self::new(depth, depth)
        };
        (depth, window)
    }
}

struct Visit {
    handle: NodeHandle,
    parent_world: Mat4,
    parent_tint: Vec3,
    parent_alpha: f32,
    depth: f64,
    window: DepthWindow,
}

/// Runs one traversal from `root`, writing frame state into `nodes` and
/// the draw list into `output`.
pub fn traverse(
    nodes: &mut SlotMap<NodeHandle, Node>,
    root: NodeHandle,
    settings: &SceneSettings,
    output: &mut FrameOutput,
) {
    output.clear();

    let Some(root_node) = nodes.get_mut(root) else {
        return;
    };
    root_node.reset_frame_state(0.0);
    output.visited = 1;
    if !root_node.visible {
        return;
    }

    root_node.transform.update_local_matrix();
    let root_world = *root_node.transform.local_matrix();
    root_node.transform.set_world_matrix(root_world);
    root_node.composed_tint = root_node.tint;
    root_node.composed_alpha = root_node.alpha;

    let mut stack: Vec<Visit> = Vec::with_capacity(64);
    let window = DepthWindow::new(0.0, f64::from(settings.max_depth.max(0.0)));
    queue_children(
        &mut stack,
        root_node,
        None,
        window,
        &mut output.depth_underflow,
    );

    while let Some(visit) = stack.pop() {
        let Some(node) = nodes.get_mut(visit.handle) else {
            continue;
        };
        output.visited += 1;

        node.reset_frame_state(visit.depth as f32);
        if !node.visible {
            continue;
        }

        node.transform.update_local_matrix();
        let world = visit.parent_world * *node.transform.local_matrix();
        node.transform.set_world_matrix(world);
        node.composed_tint = visit.parent_tint * node.tint;
        node.composed_alpha = visit.parent_alpha * node.alpha;

        output.draw_list.push(DrawItem {
            handle: visit.handle,
            id: node.id(),
            world,
            tint: node.composed_tint,
            alpha: node.composed_alpha,
            depth: node.depth,
        });

        let depth = node.depth;
        queue_children(
            &mut stack,
            node,
            Some(depth),
            visit.window,
            &mut output.depth_underflow,
        );
    }

    if output.depth_underflow {
        log::warn!(
            "Depth window underflow: hierarchy too deep for max_depth {}, some nodes share a depth",
            settings.max_depth
        );
    }

    if !settings.debug_overlays.is_empty() {
        debug_pass(nodes, settings.debug_overlays, output);
    }

    log::debug!(
        "Traversal visited {} nodes, drew {}",
        output.visited,
        output.draw_list.len()
    );
}

/// Pushes `node`'s children in reverse so they pop in child-list order.
///
/// `parent_depth` is `None` for the root, which is never drawn and so
/// does not need to sort below its children.
fn queue_children(
    stack: &mut Vec<Visit>,
    node: &Node,
    parent_depth: Option<f32>,
    window: DepthWindow,
    underflow: &mut bool,
) {
    let len = node.children.len();
    if len == 0 {
        return;
    }
    if !window.can_split(len) || !window.orders_in_f32(parent_depth, len) {
        *underflow = true;
    }

    let parent_world = node.transform.world_matrix;
    for (index, &child) in node.children.iter().enumerate().rev() {
        let (depth, child_window) = window.slot(index, len);
        stack.push(Visit {
            handle: child,
            parent_world,
            parent_tint: node.composed_tint,
            parent_alpha: node.composed_alpha,
            depth,
            window: child_window,
        });
    }
}

/// Second pass over the draw list emitting debug overlays.
fn debug_pass(
    nodes: &SlotMap<NodeHandle, Node>,
    overlays: DebugOverlays,
    output: &mut FrameOutput,
) {
    for item in &output.draw_list {
        if overlays.contains(DebugOverlays::ORIGINS) {
            output.debug_origins.push(DebugOrigin {
                handle: item.handle,
                point: item.world.transform_point3(Vec3::ZERO).truncate(),
            });
        }

        if overlays.contains(DebugOverlays::BOUNDS) {
            let Some(local) = nodes.get(item.handle).and_then(|n| n.content.local_bounds()) else {
                continue;
            };
            let corners = local
                .corners()
                .map(|c| item.world.transform_point3(c.extend(0.0)).truncate());
            if let Some(rect) = Rect::from_points(corners) {
                output.debug_bounds.push(DebugBounds {
                    handle: item.handle,
                    rect,
                    depth: item.depth,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_evenly_spaced_with_margins() {
        let window = DepthWindow::new(0.0, 100.0);
        let (d0, w0) = window.slot(0, 4);
        let (d1, w1) = window.slot(1, 4);
        assert!((d0 - 0.0).abs() < 1e-9);
        assert!((d1 - 25.0).abs() < 1e-9);
        assert!((w0.min - 2.5).abs() < 1e-9);
        assert!((w0.max - 22.5).abs() < 1e-9);
        assert!(w1.min > d1 && w1.max < 50.0);
    }

    #[test]
    fn collapsed_window_cannot_split() {
        assert!(DepthWindow::new(0.0, 100.0).can_split(10));
        assert!(!DepthWindow::new(5.0, 5.0).can_split(1));
        assert!(!DepthWindow::new(1.0e17, 1.0e17 + 16.0).can_split(2));
        let (depth, window) = DepthWindow::new(5.0, 5.0).slot(0, 3);
        assert!((depth - 5.0).abs() < f64::EPSILON);
        assert_eq!(window, DepthWindow::new(5.0, 5.0));
    }

    #[test]
    fn f32_collisions_break_ordering() {
        let window = DepthWindow::new(0.0, 100.0);
        assert!(window.orders_in_f32(None, 4));
        assert!(window.orders_in_f32(Some(-1.0), 4));
        assert!(!window.orders_in_f32(Some(0.0), 4));

        // Wide enough in f64, but narrower than one f32 ulp at 50.
        let narrow = DepthWindow::new(50.0, 50.0 + 1.0e-6);
        assert!(narrow.can_split(2));
        assert!(!narrow.orders_in_f32(Some(50.0), 2));
    }
}
