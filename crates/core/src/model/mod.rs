//! DSC comment model types.
//!
//! - `bbox` - Bounding box values (BoundingBox, HiResBoundingBox)
//! - `comment` - The DscComment trait and the concrete comment types
//! - `catalog` - Built-in comment kinds, their keywords and legality

pub mod bbox;
pub mod catalog;
pub mod comment;

// Re-export main types for convenience
pub use bbox::{BBox, BoundingBox, Coordinate, HiResBoundingBox, Precision};
pub use catalog::{CommentKind, Legality, Scope};
pub use comment::{
    ATEND, BoxComment, BoxValue, Comment, DscComment, GenericComment, MarkerComment, PageComment,
};
