//! Line scanner for DSC comments.
//!
//! Splits a single line into keyword and argument text without knowing
//! anything about comment semantics.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// The DSC comment sigil.
pub const SIGIL: &str = "%%";

/// A DSC comment line split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    /// Keyword without the sigil.
    pub keyword: &'a str,
    /// Text after the keyword, with one leading `:` and one following
    /// space or tab removed. Trailing whitespace is kept.
    pub arguments: &'a str,
    /// Whether the keyword was followed by `:`.
    pub colon: bool,
}

/// Scan one line. Returns `None` for lines that are not DSC comments.
pub fn scan_line(line: &str) -> Option<ScannedLine<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let rest = line.strip_prefix(SIGIL)?;

    let end = rest
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(rest.len());
    let keyword = &rest[..end];
    if keyword.is_empty() {
        return None;
    }

    let mut arguments = &rest[end..];
    let colon = arguments.starts_with(':');
    if colon {
        arguments = &arguments[1..];
    }
    if let Some(stripped) = arguments.strip_prefix([' ', '\t']) {
        arguments = stripped;
    }

    Some(ScannedLine {
        keyword,
        arguments,
        colon,
    })
}

/// True for lines that implicitly close the header: anything that does not
/// start with `%` followed by a printable, non-space character. Blank lines
/// and `% ` comments end the header; `%%` and `%!` lines do not.
pub fn ends_header(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut chars = line.chars();
    !(chars.next() == Some('%') && chars.next().is_some_and(|c| c.is_ascii_graphic()))
}

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^%!PS-Adobe-(\d+\.\d+)(?:[ \t]+(\S+))?[ \t]*$").expect("valid version regex")
});

/// The `%!PS-Adobe-3.0 EPSF-3.0` line opening a conforming document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLine {
    /// DSC version, e.g. `3.0`.
    pub version: String,
    /// Conformance keyword, e.g. `EPSF-3.0`.
    pub conformance: Option<String>,
}

impl VersionLine {
    /// True for Encapsulated PostScript.
    pub fn is_eps(&self) -> bool {
        self.conformance
            .as_deref()
            .is_some_and(|c| c.starts_with("EPSF-"))
    }
}

impl fmt::Display for VersionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%!PS-Adobe-{}", self.version)?;
        if let Some(conformance) = &self.conformance {
            write!(f, " {conformance}")?;
        }
        Ok(())
    }
}

/// Parse a `%!PS-Adobe-` version line.
pub fn scan_version(line: &str) -> Option<VersionLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = VERSION_RE.captures(line)?;
    Some(VersionLine {
        version: caps[1].to_string(),
        conformance: caps.get(2).map(|m| m.as_str().to_string()),
    })
}
