//! Document module.
//!
//! This module provides the document tree and the writer and reader that
//! convert mapped objects to and from it.

pub mod codec;
#[allow(clippy::module_inception)]
pub mod document;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use document::Document;
pub use reader::DocumentReader;
pub use writer::DocumentWriter;
