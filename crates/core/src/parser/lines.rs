//! Line sources for the DSC parser.
//!
//! PostScript files use LF, CRLF or bare CR line endings, and comment text is
//! frequently Latin-1 rather than UTF-8. Both sources split on any of the
//! three endings and decode each line as UTF-8 when valid, Latin-1 otherwise.

use std::io::{self, BufRead};

/// Decode a raw line: UTF-8 if valid, else byte-per-char Latin-1.
pub fn decode_line(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Lines of an in-memory buffer. Never fails.
#[derive(Debug, Clone)]
pub struct ByteLines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteLines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl Iterator for ByteLines<'_> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let rest = &self.data[self.pos..];
        let (line, advance) = match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) if rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n') => (&rest[..i], i + 2),
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;

        Some(Ok(decode_line(line.to_vec())))
    }
}

/// Lines of a buffered reader. I/O errors are passed through.
#[derive(Debug)]
pub struct ReaderLines<R> {
    reader: R,
    /// Set after a CR so that a following LF is swallowed, even across
    /// buffer refills.
    skip_lf: bool,
    done: bool,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            skip_lf: false,
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for ReaderLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = Vec::new();
        loop {
            let (consumed, terminated) = {
                let available = match self.reader.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                };

                if available.is_empty() {
                    self.done = true;
                    return if line.is_empty() {
                        None
                    } else {
                        Some(Ok(decode_line(line)))
                    };
                }

                if self.skip_lf {
                    self.skip_lf = false;
                    if available[0] == b'\n' {
                        (1, false)
                    } else {
                        scan_chunk(available, &mut line, &mut self.skip_lf)
                    }
                } else {
                    scan_chunk(available, &mut line, &mut self.skip_lf)
                }
            };

            self.reader.consume(consumed);
            if terminated {
                return Some(Ok(decode_line(line)));
            }
        }
    }
}

/// Copy bytes up to the first line ending into `line`. Returns the number of
/// bytes to consume and whether a line ending was found.
fn scan_chunk(available: &[u8], line: &mut Vec<u8>, skip_lf: &mut bool) -> (usize, bool) {
    match available.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(i) => {
            line.extend_from_slice(&available[..i]);
            *skip_lf = available[i] == b'\r';
            (i + 1, true)
        }
        None => {
            line.extend_from_slice(available);
            (available.len(), false)
        }
    }
}
