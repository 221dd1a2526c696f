//! DSC comment parsing.
//!
//! - `scanner`: splits a line into keyword and argument text
//! - `lines`: line sources over byte buffers and readers
//! - `section`: Header / Prolog / Page / Trailer state machine
//! - `events`: the lazy event parser

pub mod events;
pub mod lines;
pub mod scanner;
pub mod section;

// Re-export main types for convenience
pub use events::{DscParser, Event, EventKind, ParserOptions, Position, ViolationPolicy};
pub use lines::{ByteLines, ReaderLines};
pub use scanner::{ScannedLine, VersionLine, scan_line, scan_version};
pub use section::{Section, SectionTracker};
