//! Glint
//!
//! A 2D scene-graph core: build a hierarchy of nodes, let the engine compose
//! their transforms, tints and alphas each frame, and hand the resulting draw
//! list to a renderer. Nodes are selected with a small path query language.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`core`]: handles, ids, errors, property values, signals, timing
//! - [`query`]: the path query language
//! - [`scene`]: scene graph, nodes, content, traversal and backend contracts

pub use glint_core as core;
pub use glint_query as query;
pub use glint_scene as scene;

pub use glint_core::{GlintError, NodeHandle, NodeId, PropertyValue, Result, Signal, Timer};
pub use glint_query::Query;
pub use glint_scene::{Content, DrawItem, FrameOutput, Node, Scene, SceneSettings, Transform};

/// Everything needed to build and drive a scene.
pub mod prelude {
    pub use glam::{Mat4, Vec2, Vec3, Vec4};

    pub use glint_core::{GlintError, NodeHandle, NodeId, PropertyValue, Result, Timer};
    pub use glint_query::{Query, QuerySource};
    pub use glint_scene::content::{
        EmitterConfig, GridConfig, LineGrid, ParticleEmitter, SpriteSheet, SpriteSheetConfig,
        TextureConfig, TextureContent, TextureHandle, TextureState,
    };
    pub use glint_scene::{
        Content, ContentConfig, DebugOverlays, DrawItem, FrameOutput, LoadEvent, Node,
        RenderBackend, ResourceLoader, Scene, SceneSettings, SolidColor, Transform,
    };
}
