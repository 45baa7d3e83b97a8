//! jfmt-util - Foundation types for the jfmt parser core.
//!
//! This crate provides the utilities shared by the lexer and parser:
//!
//! - [`span`] - byte-offset source ranges
//! - [`source`] - validated, immutable source buffers with offset-to-line
//!   mapping
//! - [`diagnostic`] - error and warning collection
//! - [`symbol`] - global string interning for declared names and keywords
//! - [`index_vec`] - typed-index vectors backing the node arena
//!
//! Everything here is a zero-cost abstraction over plain vectors and
//! integers; none of it allocates beyond what the equivalent hand-written
//! code would.

pub mod diagnostic;
pub mod index_vec;
pub mod source;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use source::{Source, SourceError, MAX_SOURCE_BYTES, MAX_SOURCE_CHARS};
pub use span::Span;
pub use symbol::Symbol;
