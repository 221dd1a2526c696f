//! DSC comment types.
//!
//! Every comment can name itself, populate its fields from argument text and
//! write the canonical argument text back. Parsing what `generate` produces
//! always reconstructs equal field values.

use std::borrow::Cow;
use std::fmt;

use super::bbox::{BBox, BoundingBox, Coordinate, HiResBoundingBox};
use super::catalog::{CommentKind, Scope};
use crate::error::{DscError, Result};

/// Argument text of a deferred value.
pub const ATEND: &str = "(atend)";

/// Capabilities shared by all DSC comments.
pub trait DscComment {
    /// Canonical keyword including the `%%` sigil.
    fn name(&self) -> Cow<'_, str>;

    /// Populate this comment from the text following the keyword.
    fn parse(&mut self, arguments: &str) -> Result<()>;

    /// Canonical argument text for the current field values.
    fn generate(&self) -> String;

    fn is_valid(&self) -> bool;

    /// The full comment line without a line terminator.
    fn to_line(&self) -> String {
        let arguments = self.generate();
        if arguments.is_empty() {
            self.name().into_owned()
        } else {
            format!("{}: {}", self.name(), arguments)
        }
    }
}

/// Value of a bounding box comment: coordinates, or `(atend)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxValue<T> {
    Given(BBox<T>),
    AtEnd,
}

/// Any of the four bounding box comments.
///
/// The document and page variants share all parsing and formatting; the
/// scope only changes the keyword and where the comment is legal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxComment<T> {
    scope: Scope,
    value: BoxValue<T>,
}

impl<T: Coordinate> BoxComment<T> {
    pub fn new(scope: Scope, bbox: BBox<T>) -> Self {
        Self {
            scope,
            value: BoxValue::Given(bbox),
        }
    }

    /// A zeroed comment awaiting `parse`.
    pub fn empty(scope: Scope) -> Self {
        Self::new(scope, BBox::default())
    }

    pub fn document(bbox: BBox<T>) -> Self {
        Self::new(Scope::Document, bbox)
    }

    pub fn page(bbox: BBox<T>) -> Self {
        Self::new(Scope::Page, bbox)
    }

    pub fn at_end(scope: Scope) -> Self {
        Self {
            scope,
            value: BoxValue::AtEnd,
        }
    }

    pub fn kind(&self) -> CommentKind {
        CommentKind::bounding_box(self.scope, T::PRECISION)
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn value(&self) -> BoxValue<T> {
        self.value
    }

    /// The coordinates, unless the value is deferred.
    pub fn bbox(&self) -> Option<BBox<T>> {
        match self.value {
            BoxValue::Given(bbox) => Some(bbox),
            BoxValue::AtEnd => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.value == BoxValue::AtEnd
    }
}

impl<T: Coordinate> DscComment for BoxComment<T> {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.kind().name())
    }

    fn parse(&mut self, arguments: &str) -> Result<()> {
        self.value = if arguments.trim() == ATEND {
            BoxValue::AtEnd
        } else {
            BoxValue::Given(BBox::parse_arguments(self.kind().keyword(), arguments)?)
        };
        Ok(())
    }

    fn generate(&self) -> String {
        match self.value {
            BoxValue::Given(bbox) => bbox.to_string(),
            BoxValue::AtEnd => ATEND.to_string(),
        }
    }

    fn is_valid(&self) -> bool {
        match self.value {
            BoxValue::Given(bbox) => bbox.is_finite(),
            BoxValue::AtEnd => true,
        }
    }
}

/// `%%Page: <label> <ordinal>`.
///
/// The label is kept as written, so `(Cover page)` and `iii` both round-trip
/// unchanged. `?` means the producer did not know a label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageComment {
    label: String,
    ordinal: u32,
}

impl PageComment {
    /// Build a page comment, parenthesizing the label when it is not a
    /// single bare token.
    pub fn new(label: &str, ordinal: u32) -> Self {
        let needs_parens = label.is_empty()
            || label
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '\\'));
        let label = if needs_parens {
            let mut quoted = String::with_capacity(label.len() + 2);
            quoted.push('(');
            for c in label.chars() {
                if matches!(c, '(' | ')' | '\\') {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            quoted.push(')');
            quoted
        } else {
            label.to_string()
        };
        Self { label, ordinal }
    }

    /// The label token as written.
    pub fn raw_label(&self) -> &str {
        &self.label
    }

    /// The label text with surrounding parentheses and escapes removed.
    pub fn label(&self) -> Cow<'_, str> {
        match self
            .label
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
        {
            Some(inner) if inner.contains('\\') => {
                let mut text = String::with_capacity(inner.len());
                let mut chars = inner.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            text.push(escaped);
                        }
                    } else {
                        text.push(c);
                    }
                }
                Cow::Owned(text)
            }
            Some(inner) => Cow::Borrowed(inner),
            None => Cow::Borrowed(&self.label),
        }
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

/// Split a leading PostScript string token `( ... )` off `text`, honoring
/// nested parentheses and backslash escapes. Returns the token and the rest.
fn split_string_token(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some((&text[..=i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

impl DscComment for PageComment {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(CommentKind::Page.name())
    }

    fn parse(&mut self, arguments: &str) -> Result<()> {
        let keyword = CommentKind::Page.keyword();
        let arguments = arguments.trim();

        let (label, rest) = if arguments.starts_with('(') {
            split_string_token(arguments)
                .ok_or_else(|| DscError::malformed(keyword, "unterminated page label"))?
        } else {
            let end = arguments
                .find(|c: char| c.is_ascii_whitespace())
                .unwrap_or(arguments.len());
            arguments.split_at(end)
        };
        if label.is_empty() {
            return Err(DscError::malformed(keyword, "missing page label"));
        }

        let tokens: Vec<&str> = rest.split_ascii_whitespace().collect();
        let [ordinal] = tokens.as_slice() else {
            return Err(DscError::malformed(keyword, "expected `<label> <ordinal>`"));
        };
        let ordinal = ordinal.parse::<u32>().map_err(|_| {
            DscError::malformed(keyword, format!("{ordinal:?} is not a page ordinal"))
        })?;

        self.label = label.to_string();
        self.ordinal = ordinal;
        Ok(())
    }

    fn generate(&self) -> String {
        format!("{} {}", self.label, self.ordinal)
    }

    fn is_valid(&self) -> bool {
        !self.label.is_empty() && self.ordinal >= 1
    }
}

/// Structural sentinels such as `%%EndComments` or `%%Trailer`.
///
/// Only `%%BeginDocument` takes an argument (the embedded file name), which
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerComment {
    kind: CommentKind,
    argument: String,
}

impl MarkerComment {
    pub fn new(kind: CommentKind) -> Self {
        Self {
            kind,
            argument: String::new(),
        }
    }

    pub fn kind(&self) -> CommentKind {
        self.kind
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    fn takes_argument(&self) -> bool {
        self.kind == CommentKind::BeginDocument
    }
}

impl DscComment for MarkerComment {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.kind.name())
    }

    fn parse(&mut self, arguments: &str) -> Result<()> {
        let arguments = arguments.trim();
        if !arguments.is_empty() && !self.takes_argument() {
            return Err(DscError::malformed(self.kind.keyword(), "takes no arguments"));
        }
        self.argument = arguments.to_string();
        Ok(())
    }

    fn generate(&self) -> String {
        self.argument.clone()
    }

    fn is_valid(&self) -> bool {
        self.takes_argument() || self.argument.is_empty()
    }
}

/// A comment outside the catalog. Arguments are kept as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericComment {
    keyword: String,
    arguments: String,
    colon: bool,
}

impl GenericComment {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            arguments: String::new(),
            colon: true,
        }
    }

    pub fn with_arguments(keyword: &str, arguments: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            arguments: arguments.to_string(),
            colon: true,
        }
    }

    /// Keyword without the sigil.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Whether the keyword is followed by `:` when rendered.
    pub fn set_colon(&mut self, colon: bool) {
        self.colon = colon;
    }
}

impl DscComment for GenericComment {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("%%{}", self.keyword))
    }

    fn parse(&mut self, arguments: &str) -> Result<()> {
        self.arguments = arguments.to_string();
        Ok(())
    }

    fn generate(&self) -> String {
        self.arguments.clone()
    }

    fn is_valid(&self) -> bool {
        !self.keyword.is_empty()
    }

    fn to_line(&self) -> String {
        match (self.colon, self.arguments.is_empty()) {
            (true, true) => format!("%%{}:", self.keyword),
            (true, false) => format!("%%{}: {}", self.keyword, self.arguments),
            (false, true) => format!("%%{}", self.keyword),
            (false, false) => format!("%%{} {}", self.keyword, self.arguments),
        }
    }
}

/// A parsed DSC comment.
#[derive(Debug, Clone)]
pub enum Comment {
    /// `%%BoundingBox` or `%%PageBoundingBox`.
    BoundingBox(BoxComment<i32>),
    /// `%%HiResBoundingBox` or `%%PageHiResBoundingBox`.
    HiResBoundingBox(BoxComment<f64>),
    Page(PageComment),
    Marker(MarkerComment),
    Generic(GenericComment),
}

impl Comment {
    /// The catalog kind; `None` for generic comments.
    pub fn kind(&self) -> Option<CommentKind> {
        match self {
            Comment::BoundingBox(c) => Some(c.kind()),
            Comment::HiResBoundingBox(c) => Some(c.kind()),
            Comment::Page(_) => Some(CommentKind::Page),
            Comment::Marker(c) => Some(c.kind()),
            Comment::Generic(_) => None,
        }
    }

    /// True for a bounding box comment holding `(atend)`.
    pub fn is_deferred(&self) -> bool {
        match self {
            Comment::BoundingBox(c) => c.is_deferred(),
            Comment::HiResBoundingBox(c) => c.is_deferred(),
            _ => false,
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Comment::BoundingBox(c) => c.bbox(),
            _ => None,
        }
    }

    pub fn hires_bounding_box(&self) -> Option<HiResBoundingBox> {
        match self {
            Comment::HiResBoundingBox(c) => c.bbox(),
            _ => None,
        }
    }

    fn as_dyn(&self) -> &dyn DscComment {
        match self {
            Comment::BoundingBox(c) => c,
            Comment::HiResBoundingBox(c) => c,
            Comment::Page(c) => c,
            Comment::Marker(c) => c,
            Comment::Generic(c) => c,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn DscComment {
        match self {
            Comment::BoundingBox(c) => c,
            Comment::HiResBoundingBox(c) => c,
            Comment::Page(c) => c,
            Comment::Marker(c) => c,
            Comment::Generic(c) => c,
        }
    }
}

impl DscComment for Comment {
    fn name(&self) -> Cow<'_, str> {
        self.as_dyn().name()
    }

    fn parse(&mut self, arguments: &str) -> Result<()> {
        self.as_dyn_mut().parse(arguments)
    }

    fn generate(&self) -> String {
        self.as_dyn().generate()
    }

    fn is_valid(&self) -> bool {
        self.as_dyn().is_valid()
    }

    fn to_line(&self) -> String {
        self.as_dyn().to_line()
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.generate() == other.generate()
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl From<BoxComment<i32>> for Comment {
    fn from(c: BoxComment<i32>) -> Self {
        Comment::BoundingBox(c)
    }
}

impl From<BoxComment<f64>> for Comment {
    fn from(c: BoxComment<f64>) -> Self {
        Comment::HiResBoundingBox(c)
    }
}

impl From<PageComment> for Comment {
    fn from(c: PageComment) -> Self {
        Comment::Page(c)
    }
}

impl From<GenericComment> for Comment {
    fn from(c: GenericComment) -> Self {
        Comment::Generic(c)
    }
}
