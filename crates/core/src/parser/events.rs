//! DSC event parser.
//!
//! `DscParser` pulls lines from a source and yields one event per DSC
//! comment. It is tolerant: malformed arguments and out-of-section comments
//! become events instead of stopping the parse. Only a failing line source
//! (or a section violation under `ViolationPolicy::Strict`) ends the stream
//! early.

use std::collections::VecDeque;
use std::io::{self, BufRead};

use tracing::{debug, trace};

use super::lines::{ByteLines, ReaderLines};
use super::scanner::{VersionLine, ends_header, scan_line, scan_version};
use super::section::{Section, SectionTracker};
use crate::error::{DscError, Result};
use crate::model::catalog;
use crate::model::comment::{Comment, DscComment};

/// What to do with a comment that is not legal in the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationPolicy {
    /// Emit the comment followed by a warning event.
    #[default]
    Warn,
    /// Emit the comment without a warning.
    Ignore,
    /// End the stream with `DscError::SectionViolation`.
    Strict,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    /// Emit non-comment lines as `EventKind::Raw`.
    pub raw_passthrough: bool,
    pub policy: ViolationPolicy,
}

impl ParserOptions {
    pub fn with_raw_passthrough(mut self, raw_passthrough: bool) -> Self {
        self.raw_passthrough = raw_passthrough;
        self
    }

    pub fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number in the source.
    pub line: usize,
    /// 0-based index of the comment line among all comment lines, malformed
    /// and strict-mode violations included. Version, raw and end-of-stream
    /// events carry the ordinal of the next comment line.
    pub ordinal: usize,
    pub section: Section,
    /// Inside an embedded `%%BeginDocument` block.
    pub embedded: bool,
}

#[derive(Debug)]
pub enum EventKind {
    /// The `%!PS-Adobe-` first line.
    Version(VersionLine),
    Comment(Comment),
    /// A catalog comment whose arguments did not parse.
    Malformed { line: String, error: DscError },
    /// A non-fatal structural problem (`SectionViolation`,
    /// `UnterminatedSection`).
    Warning(DscError),
    /// A non-comment line, only with `raw_passthrough`.
    Raw(String),
}

#[derive(Debug)]
pub struct Event {
    pub position: Position,
    pub kind: EventKind,
}

impl Event {
    pub fn comment(&self) -> Option<&Comment> {
        match &self.kind {
            EventKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.kind, EventKind::Warning(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, EventKind::Malformed { .. })
    }
}

/// Lazy, forward-only DSC event stream over a line source.
///
/// Restart by building a new parser over the start of the source.
pub struct DscParser<S> {
    source: S,
    options: ParserOptions,
    tracker: SectionTracker,
    pending: VecDeque<Event>,
    line_number: usize,
    comments_seen: usize,
    done: bool,
}

impl<'a> DscParser<ByteLines<'a>> {
    pub fn from_bytes(data: &'a [u8]) -> Self {
        DscParser::new(ByteLines::new(data))
    }
}

impl<R: BufRead> DscParser<ReaderLines<R>> {
    pub fn from_reader(reader: R) -> Self {
        DscParser::new(ReaderLines::new(reader))
    }
}

impl<S> DscParser<S>
where
    S: Iterator<Item = io::Result<String>>,
{
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            options,
            tracker: SectionTracker::new(),
            pending: VecDeque::new(),
            line_number: 0,
            comments_seen: 0,
            done: false,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// The section in effect after the lines consumed so far.
    pub fn section(&self) -> Section {
        self.tracker.section()
    }

    fn event_position(&self, section: Section, embedded: bool) -> Position {
        Position {
            line: self.line_number,
            ordinal: self.comments_seen,
            section,
            embedded,
        }
    }

    fn push(&mut self, position: Position, kind: EventKind) {
        self.pending.push_back(Event { position, kind });
    }

    /// Turn one line into zero or more pending events. Fails only on a
    /// strict-mode section violation.
    fn process_line(&mut self, line: String) -> Result<()> {
        let Some(scanned) = scan_line(&line) else {
            if self.line_number == 1 {
                if let Some(version) = scan_version(&line) {
                    let position = self.event_position(self.tracker.section(), false);
                    self.push(position, EventKind::Version(version));
                    return Ok(());
                }
            }
            if ends_header(&line) {
                self.tracker.observe_content();
            }
            if self.options.raw_passthrough {
                let embedded = self.tracker.in_embedded_document();
                let position = self.event_position(self.tracker.section(), embedded);
                self.push(position, EventKind::Raw(line));
            }
            return Ok(());
        };

        trace!(keyword = scanned.keyword, line = self.line_number, "dsc comment");

        let mut comment = catalog::construct(scanned.keyword);
        if let Comment::Generic(generic) = &mut comment {
            generic.set_colon(scanned.colon);
        }
        let parsed = comment.parse(scanned.arguments);
        let deferred = parsed.is_ok() && comment.is_deferred();
        let observation = self.tracker.observe(comment.kind(), deferred);
        let position = self.event_position(observation.section, observation.embedded);

        match parsed {
            Err(error) => {
                debug!(line = self.line_number, %error, "malformed dsc comment");
                self.push(position, EventKind::Malformed { line, error });
            }
            Ok(()) if observation.legal => {
                self.push(position, EventKind::Comment(comment));
            }
            Ok(()) => {
                let violation = DscError::SectionViolation {
                    keyword: scanned.keyword.to_string(),
                    section: observation.section,
                };
                match self.options.policy {
                    ViolationPolicy::Strict => {
                        self.comments_seen += 1;
                        return Err(violation);
                    }
                    ViolationPolicy::Warn => {
                        debug!(line = self.line_number, %violation, "section violation");
                        self.push(position, EventKind::Comment(comment));
                        self.push(position, EventKind::Warning(violation));
                    }
                    ViolationPolicy::Ignore => {
                        self.push(position, EventKind::Comment(comment));
                    }
                }
            }
        }

        self.comments_seen += 1;
        Ok(())
    }

    fn finish(&mut self) {
        if let Some(section) = self.tracker.unterminated() {
            let position = self.event_position(section, false);
            self.push(
                position,
                EventKind::Warning(DscError::UnterminatedSection { section }),
            );
        }
    }
}

impl<S> Iterator for DscParser<S>
where
    S: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }

            match self.source.next() {
                None => {
                    self.done = true;
                    self.finish();
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(line)) => {
                    self.line_number += 1;
                    if let Err(e) = self.process_line(line) {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(data: &[u8]) -> Vec<&'static str> {
        DscParser::from_bytes(data)
            .map(|event| match event.unwrap().kind {
                EventKind::Version(_) => "version",
                EventKind::Comment(_) => "comment",
                EventKind::Malformed { .. } => "malformed",
                EventKind::Warning(_) => "warning",
                EventKind::Raw(_) => "raw",
            })
            .collect()
    }

    #[test]
    fn test_version_only_on_first_line() {
        assert_eq!(kinds(b"%!PS-Adobe-3.0\n%%EOF\n"), vec!["version", "comment"]);
        assert_eq!(kinds(b"%%EOF\n%!PS-Adobe-3.0\n"), vec!["comment"]);
    }

    #[test]
    fn test_position_tracks_lines_and_ordinals() {
        let events: Vec<Event> = DscParser::from_bytes(b"%%A: 1\nshowpage\n%%B: 2\n")
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(events[0].position.line, 1);
        assert_eq!(events[0].position.ordinal, 0);
        assert_eq!(events[1].position.line, 3);
        assert_eq!(events[1].position.ordinal, 1);
        assert_eq!(events[1].position.section, Section::Prolog);
    }
}
