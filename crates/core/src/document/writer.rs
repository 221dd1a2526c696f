//! Text sink for DSC comments.
//!
//! Writes one comment per line in the order the caller supplies them.

use std::io::Write;

use crate::error::Result;
use crate::model::comment::DscComment;
use crate::parser::events::{Event, EventKind};
use crate::parser::scanner::VersionLine;

pub struct DscWriter<W: Write> {
    inner: W,
    lines: usize,
}

impl<W: Write> DscWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    pub fn write_version(&mut self, version: &VersionLine) -> Result<()> {
        writeln!(self.inner, "{version}")?;
        self.lines += 1;
        Ok(())
    }

    pub fn write_comment<C: DscComment + ?Sized>(&mut self, comment: &C) -> Result<()> {
        writeln!(self.inner, "{}", comment.to_line())?;
        self.lines += 1;
        Ok(())
    }

    /// Write a line of ordinary PostScript.
    pub fn write_raw(&mut self, line: &str) -> Result<()> {
        writeln!(self.inner, "{line}")?;
        self.lines += 1;
        Ok(())
    }

    /// Write an event back out.
    ///
    /// Comments are written in canonical form, malformed lines verbatim.
    /// Warnings produce no output.
    pub fn write_event(&mut self, event: &Event) -> Result<()> {
        match &event.kind {
            EventKind::Version(version) => self.write_version(version),
            EventKind::Comment(comment) => self.write_comment(comment),
            EventKind::Malformed { line, .. } => self.write_raw(line),
            EventKind::Raw(line) => self.write_raw(line),
            EventKind::Warning(_) => Ok(()),
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
