use glint_core::{NodeHandle, NodeId, Signal};

use crate::loader::LoadEvent;

/// A node entering or leaving the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEvent {
    pub handle: NodeHandle,
    pub id: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Number of ticks run so far, starting at 1 for the first tick.
    pub frame: u64,
    /// Seconds advanced by this tick.
    pub dt: f32,
}

/// Signals emitted by a [`Scene`](crate::Scene).
///
/// All signals fire synchronously on the thread driving the scene, in
/// connection order, before the triggering call returns.
#[derive(Debug, Default)]
pub struct SceneEvents {
    /// One event per node registered, in pre-order of the attached subtree.
    pub node_attached: Signal<NodeEvent>,
    /// One event per node unregistered, in pre-order of the detached subtree.
    pub node_detached: Signal<NodeEvent>,
    /// After every tick, once content updates have run.
    pub frame: Signal<FrameInfo>,
    /// After a load completion has been applied to the scene.
    pub texture_loaded: Signal<LoadEvent>,
}
