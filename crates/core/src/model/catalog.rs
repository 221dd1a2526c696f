//! The catalog of built-in DSC comment kinds.
//!
//! Each kind carries its keyword and its legality as plain data. Keywords
//! that are not in the catalog fall back to [`GenericComment`].

use std::collections::HashMap;
use std::sync::LazyLock;

use super::bbox::Precision;
use super::comment::{BoxComment, Comment, GenericComment, MarkerComment, PageComment};
use crate::parser::section::Section;

/// Whether a bounding box describes the whole document or the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Document,
    Page,
}

/// Sections in which a comment kind may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Legality {
    Anywhere,
    /// Header or prolog.
    DocumentLevel,
    /// Inside an open page.
    PageLevel,
}

impl Legality {
    pub fn permits(self, section: Section) -> bool {
        match self {
            Legality::Anywhere => true,
            Legality::DocumentLevel => matches!(section, Section::Header | Section::Prolog),
            Legality::PageLevel => section == Section::Page,
        }
    }
}

/// Built-in DSC comment kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    BoundingBox,
    HiResBoundingBox,
    PageBoundingBox,
    PageHiResBoundingBox,
    Page,
    EndComments,
    EndProlog,
    PageTrailer,
    Trailer,
    Eof,
    BeginDocument,
    EndDocument,
}

static CATALOG: LazyLock<HashMap<&'static str, CommentKind>> = LazyLock::new(|| {
    CommentKind::ALL
        .iter()
        .map(|kind| (kind.keyword(), *kind))
        .collect()
});

impl CommentKind {
    pub const ALL: [CommentKind; 12] = [
        CommentKind::BoundingBox,
        CommentKind::HiResBoundingBox,
        CommentKind::PageBoundingBox,
        CommentKind::PageHiResBoundingBox,
        CommentKind::Page,
        CommentKind::EndComments,
        CommentKind::EndProlog,
        CommentKind::PageTrailer,
        CommentKind::Trailer,
        CommentKind::Eof,
        CommentKind::BeginDocument,
        CommentKind::EndDocument,
    ];

    /// Canonical name including the `%%` sigil.
    pub const fn name(self) -> &'static str {
        match self {
            CommentKind::BoundingBox => "%%BoundingBox",
            CommentKind::HiResBoundingBox => "%%HiResBoundingBox",
            CommentKind::PageBoundingBox => "%%PageBoundingBox",
            CommentKind::PageHiResBoundingBox => "%%PageHiResBoundingBox",
            CommentKind::Page => "%%Page",
            CommentKind::EndComments => "%%EndComments",
            CommentKind::EndProlog => "%%EndProlog",
            CommentKind::PageTrailer => "%%PageTrailer",
            CommentKind::Trailer => "%%Trailer",
            CommentKind::Eof => "%%EOF",
            CommentKind::BeginDocument => "%%BeginDocument",
            CommentKind::EndDocument => "%%EndDocument",
        }
    }

    /// Keyword without the sigil, as it appears after `%%` in a line.
    pub fn keyword(self) -> &'static str {
        &self.name()[2..]
    }

    /// Look up a keyword (without the sigil).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        CATALOG.get(keyword).copied()
    }

    /// The bounding box kind for a scope and precision.
    pub const fn bounding_box(scope: Scope, precision: Precision) -> Self {
        match (scope, precision) {
            (Scope::Document, Precision::Integer) => CommentKind::BoundingBox,
            (Scope::Document, Precision::HighResolution) => CommentKind::HiResBoundingBox,
            (Scope::Page, Precision::Integer) => CommentKind::PageBoundingBox,
            (Scope::Page, Precision::HighResolution) => CommentKind::PageHiResBoundingBox,
        }
    }

    /// Scope of a bounding box kind; `None` for other kinds.
    pub const fn box_scope(self) -> Option<Scope> {
        match self {
            CommentKind::BoundingBox | CommentKind::HiResBoundingBox => Some(Scope::Document),
            CommentKind::PageBoundingBox | CommentKind::PageHiResBoundingBox => Some(Scope::Page),
            _ => None,
        }
    }

    pub fn legality(self) -> Legality {
        match self.box_scope() {
            Some(Scope::Document) => Legality::DocumentLevel,
            Some(Scope::Page) => Legality::PageLevel,
            None => Legality::Anywhere,
        }
    }

    /// An empty comment of this kind, ready to be populated by `parse`.
    pub fn construct(self) -> Comment {
        match self {
            CommentKind::BoundingBox => Comment::BoundingBox(BoxComment::empty(Scope::Document)),
            CommentKind::PageBoundingBox => Comment::BoundingBox(BoxComment::empty(Scope::Page)),
            CommentKind::HiResBoundingBox => {
                Comment::HiResBoundingBox(BoxComment::empty(Scope::Document))
            }
            CommentKind::PageHiResBoundingBox => {
                Comment::HiResBoundingBox(BoxComment::empty(Scope::Page))
            }
            CommentKind::Page => Comment::Page(PageComment::default()),
            marker => Comment::Marker(MarkerComment::new(marker)),
        }
    }
}

/// Construct an empty comment for any keyword, falling back to a generic
/// comment for keywords outside the catalog.
pub fn construct(keyword: &str) -> Comment {
    match CommentKind::from_keyword(keyword) {
        Some(kind) => kind.construct(),
        None => Comment::Generic(GenericComment::new(keyword)),
    }
}
