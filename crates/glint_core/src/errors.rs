//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! Structural mutations fail loudly: an illegal re-parent or a stale handle
//! is reported to the caller as a [`GlintError`]. The query layer fails
//! softly instead, so an ill-formed query yields an empty result and never
//! surfaces here. The only query-side error is [`GlintError::UninitializedRegistry`].
//!
//! ```rust,ignore
//! use glint::core::{GlintError, Result};
//!
//! fn reparent(scene: &mut Scene, parent: NodeHandle, child: NodeHandle) -> Result<()> {
//!     scene.add_child(parent, child)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::handle::NodeHandle;

/// The main error type for the Glint engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlintError {
    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// Adding `child` under `parent` would make the hierarchy cyclic: the
    /// child is the parent itself, one of its ancestors, or the root.
    #[error("Cannot attach {child:?} under {parent:?}: the hierarchy would contain a cycle")]
    Cycle {
        /// The node that would receive the child
        parent: NodeHandle,
        /// The node being attached
        child: NodeHandle,
    },

    /// The handle does not resolve to a live node of this scene.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// The scene root cannot be detached or destroyed.
    #[error("Operation not permitted on the scene root")]
    RootNode,

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// The registry was queried before a scene root was established.
    #[error("Node registry queried before a scene root was established")]
    UninitializedRegistry,
}

/// Alias for `Result<T, GlintError>`.
pub type Result<T> = std::result::Result<T, GlintError>;
