//! Error types for psdsc DSC comment parsing.

use thiserror::Error;

use crate::parser::section::Section;

/// Primary error type for DSC comment operations.
///
/// Only `Io` is fatal to an event stream; the other variants are local to a
/// single comment and are reported as events.
#[derive(Error, Debug)]
pub enum DscError {
    #[error("malformed arguments for %%{keyword}: {reason}")]
    MalformedArguments { keyword: String, reason: String },

    #[error("%%{keyword} is not legal in the {section} section")]
    SectionViolation { keyword: String, section: Section },

    #[error("document ended inside an open {section} section")]
    UnterminatedSection { section: Section },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DscError {
    pub(crate) fn malformed(keyword: &str, reason: impl Into<String>) -> Self {
        DscError::MalformedArguments {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors that end an event stream.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DscError::Io(_))
    }
}

/// Convenience Result type alias for DscError.
pub type Result<T> = std::result::Result<T, DscError>;
