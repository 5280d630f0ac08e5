//! Glint Core
//!
//! Foundational types shared by every Glint crate:
//!
//! - [`NodeHandle`] / [`NodeId`]: arena handles and process-unique node identity
//! - [`GlintError`]: the engine-wide error taxonomy
//! - [`PropertyValue`]: dynamically typed node properties read by the query engine
//! - [`Signal`]: synchronous callback lists dispatched in registration order
//! - [`Timer`]: frame timing for the per-frame tick

pub mod errors;
pub mod handle;
pub mod signal;
pub mod time;
pub mod value;

pub use errors::{GlintError, Result};
pub use handle::{NodeHandle, NodeId};
pub use signal::{ConnectionId, Signal};
pub use time::Timer;
pub use value::PropertyValue;
