//! Document-level views over a DSC event stream.
//!
//! This module contains:
//! - `structure` - Summary of bounding boxes, pages and diagnostics (DocumentStructure)
//! - `writer` - Text sink writing comments back out (DscWriter)

pub mod structure;
pub mod writer;

// Re-export main types for convenience
pub use structure::{DocumentStructure, PageEntry};
pub use writer::DscWriter;
