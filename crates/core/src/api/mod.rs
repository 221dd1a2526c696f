//! High-level API module for DSC parsing.
//!
//! # Example
//!
//! ```ignore
//! use psdsc_core::api::{ParserOptions, structure_from_bytes};
//!
//! let data = std::fs::read("figure.eps")?;
//! let structure = structure_from_bytes(&data, ParserOptions::default());
//! println!("{:?}", structure.bounding_box);
//! ```

pub mod high_level;

// Re-export for convenience
pub use crate::parser::ParserOptions;
pub use high_level::{
    parse_bytes, parse_reader, read_structure, read_structures_parallel, structure_from_bytes,
};
