//! psdsc - PostScript Document Structuring Convention comments.
//!
//! Typed DSC comments (bounding boxes, page markers and the like), a tolerant
//! event parser that tracks document sections, and a writer producing
//! canonical comment lines.

pub mod api;
pub mod document;
pub mod error;
pub mod model;
pub mod parser;

// Re-export high_level for convenience
pub use api::high_level;

pub use document::{DocumentStructure, DscWriter};
pub use error::{DscError, Result};
pub use model::{
    BoundingBox, BoxComment, BoxValue, Comment, CommentKind, DscComment, GenericComment,
    HiResBoundingBox, PageComment, Scope,
};
pub use parser::{DscParser, Event, EventKind, ParserOptions, Section, ViolationPolicy};
