//! Glint Scene
//!
//! The hierarchical 2D scene graph:
//!
//! - [`Scene`]: owns the node arena, the root sentinel and the [`NodeRegistry`],
//!   and exposes tree mutation, lookup, queries and the per-frame tick
//! - [`Node`] / [`Transform`]: per-node local state and frame state
//! - [`Content`]: the visual capability carried by a node
//! - [`traversal`]: world matrix, tint, alpha and depth composition producing
//!   the ordered draw list
//! - [`RenderBackend`] / [`ResourceLoader`]: contracts for the renderer and
//!   the image loader living outside the scene graph
//!
//! ```rust,ignore
//! use glint::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let ship = scene
//!     .build_node("ship")
//!     .with_position(10.0, 20.0)
//!     .with_parent(scene.root())
//!     .build()?;
//!
//! let frame = scene.update(1.0 / 60.0);
//! assert_eq!(frame.draw_list[0].handle, ship);
//! ```

pub mod backend;
pub mod content;
pub mod events;
pub mod loader;
pub mod node;
pub mod registry;
pub mod scene;
pub mod settings;
pub mod transform;
pub mod traversal;

pub use backend::RenderBackend;
pub use content::{Content, ContentConfig, Rect, SolidColor};
pub use events::{FrameInfo, NodeEvent, SceneEvents};
pub use loader::{LoadEvent, ResourceLoader};
pub use node::Node;
pub use registry::NodeRegistry;
pub use scene::{NodeBuilder, Scene};
pub use settings::{DebugOverlays, SceneSettings};
pub use transform::Transform;
pub use traversal::{DebugBounds, DebugOrigin, DrawItem, FrameOutput};
