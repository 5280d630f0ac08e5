//! Glint Query
//!
//! A small path language for selecting nodes out of a hierarchy.
//!
//! ```text
//! a.b.c              shallow chain: child `a`, its child `b`, its child `c`
//! ..z                any descendant named `z`
//! a..f               any descendant `f` of the child `a`
//! ..(@testProp==5)   any descendant whose `testProp` equals 5
//! items[0:2]         collection token (slice is accepted syntax only)
//! ```
//!
//! Queries run against any [`QuerySource`]. Malformed queries never raise:
//! they simply match nothing.

mod error;
mod lexer;
pub mod query;
pub mod source;
pub mod token;

pub use error::ParseError;
pub use query::{Query, QueryStep, SceneQuery, SearchMode};
pub use source::QuerySource;
pub use token::{CompareOp, QueryToken, Slice};
