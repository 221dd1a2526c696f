//! Bounding box value types.
//!
//! `%%BoundingBox` and `%%HiResBoundingBox` describe the same relation
//! (lower-left and upper-right corners in default user space) and differ only
//! in coordinate precision. Both are `BBox<T>`; the coordinate type decides how
//! values are parsed and written.

use std::fmt::{self, Write as _};

use crate::error::{DscError, Result};

/// Numeric precision of a bounding box payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// Whole user-space units (`%%BoundingBox`).
    Integer,
    /// Decimal user-space units (`%%HiResBoundingBox`).
    HighResolution,
}

/// A coordinate type usable in a bounding box.
pub trait Coordinate: Copy + PartialEq + Default + fmt::Debug + Send + Sync + 'static {
    const PRECISION: Precision;

    /// Parse a single argument token. Returns `None` if the token is not a
    /// number of this precision.
    fn parse_token(token: &str) -> Option<Self>;

    /// Append the canonical text of this value.
    fn write_token(self, out: &mut String);

    fn is_finite(self) -> bool;

    fn to_f64(self) -> f64;
}

impl Coordinate for i32 {
    const PRECISION: Precision = Precision::Integer;

    fn parse_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    fn write_token(self, out: &mut String) {
        let _ = write!(out, "{self}");
    }

    fn is_finite(self) -> bool {
        true
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Coordinate for f64 {
    const PRECISION: Precision = Precision::HighResolution;

    fn parse_token(token: &str) -> Option<Self> {
        if !is_real_token(token) {
            return None;
        }
        token.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn write_token(self, out: &mut String) {
        // f64 Display is the shortest round-trip form and never uses an
        // exponent. Negative zero is written as plain zero.
        if self == 0.0 {
            out.push('0');
        } else {
            let _ = write!(out, "{self}");
        }
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Check that a token is a PostScript decimal number:
/// `[+-]? digits? (. digits?)? ([eE] [+-]? digits)?` with at least one mantissa digit.
fn is_real_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// A rectangle given by its lower-left (llx, lly) and upper-right (urx, ury)
/// corners.
///
/// Degenerate boxes (zero area, or corners swapped) are accepted; use
/// [`BBox::is_normalized`] and [`BBox::is_empty`] to inspect them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox<T> {
    llx: T,
    lly: T,
    urx: T,
    ury: T,
}

/// Integer bounding box (`%%BoundingBox`, `%%PageBoundingBox`).
pub type BoundingBox = BBox<i32>;

/// High-resolution bounding box (`%%HiResBoundingBox`, `%%PageHiResBoundingBox`).
pub type HiResBoundingBox = BBox<f64>;

impl<T: Coordinate> BBox<T> {
    pub const fn new(llx: T, lly: T, urx: T, ury: T) -> Self {
        Self { llx, lly, urx, ury }
    }

    pub fn llx(&self) -> T {
        self.llx
    }

    pub fn lly(&self) -> T {
        self.lly
    }

    pub fn urx(&self) -> T {
        self.urx
    }

    pub fn ury(&self) -> T {
        self.ury
    }

    pub fn width(&self) -> f64 {
        self.urx.to_f64() - self.llx.to_f64()
    }

    pub fn height(&self) -> f64 {
        self.ury.to_f64() - self.lly.to_f64()
    }

    /// True when the box encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// True when the upper-right corner is not below or left of the lower-left one.
    pub fn is_normalized(&self) -> bool {
        self.width() >= 0.0 && self.height() >= 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.llx.is_finite() && self.lly.is_finite() && self.urx.is_finite() && self.ury.is_finite()
    }

    /// The box as an `(x0, y0, x1, y1)` tuple of floats.
    pub fn as_rect(&self) -> (f64, f64, f64, f64) {
        (
            self.llx.to_f64(),
            self.lly.to_f64(),
            self.urx.to_f64(),
            self.ury.to_f64(),
        )
    }

    /// Parse the four coordinate tokens of a bounding box comment.
    ///
    /// `keyword` is only used to label the error.
    pub fn parse_arguments(keyword: &str, arguments: &str) -> Result<Self> {
        let tokens: Vec<&str> = arguments.split_ascii_whitespace().collect();
        if tokens.len() != 4 {
            return Err(DscError::malformed(
                keyword,
                format!("expected 4 coordinates, found {}", tokens.len()),
            ));
        }

        let mut values = [T::default(); 4];
        for (slot, token) in values.iter_mut().zip(&tokens) {
            *slot = T::parse_token(token).ok_or_else(|| {
                let expected = match T::PRECISION {
                    Precision::Integer => "an integer",
                    Precision::HighResolution => "a decimal number",
                };
                DscError::malformed(keyword, format!("{token:?} is not {expected}"))
            })?;
        }

        let [llx, lly, urx, ury] = values;
        Ok(Self::new(llx, lly, urx, ury))
    }

    /// Append the canonical `llx lly urx ury` text.
    pub fn write_arguments(&self, out: &mut String) {
        for (i, value) in [self.llx, self.lly, self.urx, self.ury].into_iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            value.write_token(out);
        }
    }
}

impl<T: Coordinate> fmt::Display for BBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.write_arguments(&mut text);
        f.write_str(&text)
    }
}

impl HiResBoundingBox {
    /// The smallest integer box containing this one.
    ///
    /// Lower corner coordinates are floored and upper corner coordinates are
    /// ceiled. Values outside the `i32` range saturate.
    pub fn enclosing(&self) -> BoundingBox {
        BoundingBox::new(
            self.llx.floor() as i32,
            self.lly.floor() as i32,
            self.urx.ceil() as i32,
            self.ury.ceil() as i32,
        )
    }
}

impl From<BoundingBox> for HiResBoundingBox {
    fn from(b: BoundingBox) -> Self {
        HiResBoundingBox::new(b.llx as f64, b.lly as f64, b.urx as f64, b.ury as f64)
    }
}
