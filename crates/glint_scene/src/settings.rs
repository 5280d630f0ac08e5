//! Scene Settings
//!
//! Per-scene configuration. Settings are plain data and deserialize from
//! any serde format, with every field optional:
//!
//! ```rust,ignore
//! use glint::scene::{DebugOverlays, SceneSettings};
//!
//! let settings = SceneSettings {
//!     max_depth: 1000.0,
//!     debug_overlays: DebugOverlays::BOUNDS,
//! };
//! let scene = Scene::with_settings(settings);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Default upper bound of the depth range handed out by the traversal.
pub const DEFAULT_MAX_DEPTH: f32 = 100.0;

bitflags! {
    /// Debug passes run after the draw list is built.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DebugOverlays: u32 {
        /// World-space bounding box of every drawn node with content.
        const BOUNDS  = 1 << 0;
        /// World-space origin of every drawn node.
        const ORIGINS = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Depths are distributed over `[0, max_depth)`. Default: 100.
    pub max_depth: f32,
    /// Default: none.
    pub debug_overlays: DebugOverlays,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            debug_overlays: DebugOverlays::empty(),
        }
    }
}
