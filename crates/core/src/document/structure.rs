//! Document structure summary.
//!
//! Folds an event stream into what page-level tools need: the document
//! bounding boxes (with `(atend)` values resolved from the trailer), the page
//! list and every diagnostic raised along the way.

use crate::error::{DscError, Result};
use crate::model::bbox::{BBox, BoundingBox, Coordinate, HiResBoundingBox};
use crate::model::catalog::{CommentKind, Scope};
use crate::model::comment::{BoxComment, Comment};
use crate::parser::events::{Event, EventKind, Position};
use crate::parser::scanner::VersionLine;
use crate::parser::section::Section;

/// One `%%Page:` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry {
    pub label: String,
    pub ordinal: u32,
    /// Line of the `%%Page:` comment.
    pub line: usize,
    pub bounding_box: Option<BoundingBox>,
    pub hires_bounding_box: Option<HiResBoundingBox>,
}

#[derive(Debug, Default)]
pub struct DocumentStructure {
    pub version: Option<VersionLine>,
    pub bounding_box: Option<BoundingBox>,
    pub hires_bounding_box: Option<HiResBoundingBox>,
    pub pages: Vec<PageEntry>,
    /// Number of comment lines, malformed ones included.
    pub comment_count: usize,
    /// Malformed comment errors.
    pub errors: Vec<(Position, DscError)>,
    /// Section violations and unterminated sections.
    pub warnings: Vec<(Position, DscError)>,
    pub eof_seen: bool,
    /// The fault that ended the stream early, if any.
    pub fault: Option<DscError>,
}

/// Keep the first given value; `(atend)` leaves the slot open for the
/// trailer.
fn fill<T: Coordinate>(slot: &mut Option<BBox<T>>, comment: &BoxComment<T>) {
    if slot.is_none() {
        *slot = comment.bbox();
    }
}

impl DocumentStructure {
    /// Consume an event stream. Stops at the first `Err`, which is kept in
    /// `fault` alongside everything folded before it.
    pub fn collect<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Result<Event>>,
    {
        let mut structure = DocumentStructure::default();
        for event in events {
            match event {
                Ok(event) => structure.add(event),
                Err(e) => {
                    structure.fault = Some(e);
                    break;
                }
            }
        }
        structure
    }

    /// Fold a single event.
    pub fn add(&mut self, event: Event) {
        let position = event.position;
        match event.kind {
            EventKind::Version(version) => self.version = Some(version),
            EventKind::Comment(comment) => {
                self.comment_count += 1;
                if !position.embedded {
                    self.add_comment(position, comment);
                }
            }
            EventKind::Malformed { error, .. } => {
                self.comment_count += 1;
                self.errors.push((position, error));
            }
            EventKind::Warning(warning) => self.warnings.push((position, warning)),
            EventKind::Raw(_) => {}
        }
    }

    fn add_comment(&mut self, position: Position, comment: Comment) {
        match comment {
            Comment::BoundingBox(c) => match c.scope() {
                Scope::Document if position.section != Section::Page => {
                    fill(&mut self.bounding_box, &c)
                }
                Scope::Document => {}
                Scope::Page => {
                    if let Some(page) = self.pages.last_mut() {
                        fill(&mut page.bounding_box, &c);
                    }
                }
            },
            Comment::HiResBoundingBox(c) => match c.scope() {
                Scope::Document if position.section != Section::Page => {
                    fill(&mut self.hires_bounding_box, &c)
                }
                Scope::Document => {}
                Scope::Page => {
                    if let Some(page) = self.pages.last_mut() {
                        fill(&mut page.hires_bounding_box, &c);
                    }
                }
            },
            Comment::Page(page) => self.pages.push(PageEntry {
                label: page.label().into_owned(),
                ordinal: page.ordinal(),
                line: position.line,
                bounding_box: None,
                hires_bounding_box: None,
            }),
            Comment::Marker(marker) if marker.kind() == CommentKind::Eof => self.eof_seen = true,
            Comment::Marker(_) | Comment::Generic(_) => {}
        }
    }

    pub fn is_eps(&self) -> bool {
        self.version.as_ref().is_some_and(VersionLine::is_eps)
    }

    /// The most precise document bounding box available.
    pub fn effective_bounding_box(&self) -> Option<HiResBoundingBox> {
        self.hires_bounding_box
            .or_else(|| self.bounding_box.map(HiResBoundingBox::from))
    }

    /// Look up a page by its ordinal.
    pub fn page(&self, ordinal: u32) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.ordinal == ordinal)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.fault.is_none()
    }
}
