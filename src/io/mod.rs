//! Input/output helpers.
//!
//! - snapshot JSON read/write (`snapshot`)
//! - saved source documents for offline runs (`document`)

pub mod document;
pub mod snapshot;

pub use document::*;
pub use snapshot::*;
