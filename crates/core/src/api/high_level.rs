//! High-level entry points.
//!
//! Thin wrappers that build a `DscParser` over common sources, and helpers
//! that fold whole documents into a `DocumentStructure`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use crate::document::DocumentStructure;
use crate::error::Result;
use crate::parser::{ByteLines, DscParser, ParserOptions, ReaderLines};

/// Parse DSC events from an in-memory document.
pub fn parse_bytes(data: &[u8], options: ParserOptions) -> DscParser<ByteLines<'_>> {
    DscParser::with_options(ByteLines::new(data), options)
}

/// Parse DSC events from a buffered reader.
pub fn parse_reader<R: BufRead>(reader: R, options: ParserOptions) -> DscParser<ReaderLines<R>> {
    DscParser::with_options(ReaderLines::new(reader), options)
}

/// Summarize an in-memory document.
pub fn structure_from_bytes(data: &[u8], options: ParserOptions) -> DocumentStructure {
    DocumentStructure::collect(parse_bytes(data, options))
}

/// Summarize a file.
///
/// Failing to open the file is an error; a read failure part way through is
/// kept in `DocumentStructure::fault` with everything parsed before it.
pub fn read_structure(path: impl AsRef<Path>, options: ParserOptions) -> Result<DocumentStructure> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "reading dsc structure");
    let parser = parse_reader(BufReader::new(file), options);
    Ok(DocumentStructure::collect(parser))
}

/// Summarize many files on the rayon pool. Results keep the input order.
pub fn read_structures_parallel<P>(
    paths: &[P],
    options: ParserOptions,
) -> Vec<Result<DocumentStructure>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| read_structure(path, options))
        .collect()
}
