//! Document section tracking.
//!
//! A conforming document moves through `Header → Prolog → (Page)* → Trailer`.
//! The tracker follows the sentinel comments and answers whether a comment
//! kind is legal where it appears.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::model::catalog::{CommentKind, Scope};

/// A structural region of a DSC document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Prolog,
    Page,
    Trailer,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Prolog => "prolog",
            Section::Page => "page",
            Section::Trailer => "trailer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of observing one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Section the comment belongs to. Opening sentinels belong to the
    /// section they open.
    pub section: Section,
    pub legal: bool,
    /// True inside `%%BeginDocument` ... `%%EndDocument`.
    pub embedded: bool,
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    section: Section,
    page_opened: bool,
    eof_seen: bool,
    embedded_depth: usize,
    /// Document-scope box kinds whose header value was `(atend)`.
    deferred: HashSet<CommentKind>,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTracker {
    pub fn new() -> Self {
        Self {
            section: Section::Header,
            page_opened: false,
            eof_seen: false,
            embedded_depth: 0,
            deferred: HashSet::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn in_embedded_document(&self) -> bool {
        self.embedded_depth > 0
    }

    pub fn eof_seen(&self) -> bool {
        self.eof_seen
    }

    fn enter(&mut self, section: Section) {
        if self.section != section {
            debug!(from = %self.section, to = %section, "section transition");
            self.section = section;
        }
    }

    /// A line that is not a structured comment ends the header.
    pub fn observe_content(&mut self) {
        if self.section == Section::Header && !self.in_embedded_document() {
            self.enter(Section::Prolog);
        }
    }

    /// Observe a comment line.
    ///
    /// `kind` is `None` for keywords outside the catalog. `deferred` is true
    /// when the comment parsed to an `(atend)` value.
    pub fn observe(&mut self, kind: Option<CommentKind>, deferred: bool) -> Observation {
        if self.in_embedded_document() {
            match kind {
                Some(CommentKind::BeginDocument) => self.embedded_depth += 1,
                Some(CommentKind::EndDocument) => self.embedded_depth -= 1,
                _ => {}
            }
            return Observation {
                section: self.section,
                legal: true,
                embedded: true,
            };
        }

        let Some(kind) = kind else {
            return Observation {
                section: self.section,
                legal: true,
                embedded: false,
            };
        };

        match kind {
            CommentKind::Page => {
                self.page_opened = true;
                self.enter(Section::Page);
            }
            CommentKind::Trailer => self.enter(Section::Trailer),
            _ => {}
        }

        let section = self.section;
        let mut legal = kind.legality().permits(section);
        if kind.box_scope() == Some(Scope::Document) {
            if deferred && legal {
                self.deferred.insert(kind);
            } else if section == Section::Trailer && self.deferred.contains(&kind) {
                legal = !deferred;
            }
        }

        match kind {
            CommentKind::EndComments | CommentKind::EndProlog if section == Section::Header => {
                self.enter(Section::Prolog)
            }
            CommentKind::Eof => self.eof_seen = true,
            CommentKind::BeginDocument => self.embedded_depth += 1,
            _ => {}
        }

        Observation {
            section,
            legal,
            embedded: false,
        }
    }

    /// The section left open at end of input, if the document ended inside a
    /// page without a trailer or `%%EOF`.
    pub fn unterminated(&self) -> Option<Section> {
        (self.page_opened && self.section == Section::Page && !self.eof_seen)
            .then_some(Section::Page)
    }
}
