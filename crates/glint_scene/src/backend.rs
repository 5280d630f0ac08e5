//! Renderer contract.
//!
//! The scene graph does not rasterize anything. After a traversal,
//! [`Scene::render`](crate::Scene::render) replays the draw list into a
//! [`RenderBackend`] in draw order, handing it each node's resolved world
//! matrix, composed tint, composed alpha and depth together with the node's
//! content.

use crate::content::Content;
use crate::events::FrameInfo;
use crate::traversal::{DebugBounds, DebugOrigin, DrawItem};

pub trait RenderBackend {
    fn begin_frame(&mut self, _frame: &FrameInfo) {}

    /// Draws one visible node. Called in draw order.
    fn draw(&mut self, item: &DrawItem, content: &Content);

    /// Draws one bounding-box overlay, after all nodes.
    fn draw_debug_bounds(&mut self, _bounds: &DebugBounds) {}

    fn draw_debug_origin(&mut self, _origin: &DebugOrigin) {}

    fn end_frame(&mut self) {}
}
