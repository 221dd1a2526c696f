//! dscdump - Dump the DSC comment structure of PostScript files
//!
//! A command line tool that lists every DSC comment of a PostScript or EPS
//! file together with its section, or prints a per-document summary of
//! bounding boxes and pages.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use memmap2::Mmap;
use psdsc_core::DscError;
use psdsc_core::api::{parse_bytes, parse_reader};
use psdsc_core::document::DocumentStructure;
use psdsc_core::model::{BBox, Coordinate, DscComment};
use psdsc_core::parser::{DscParser, Event, EventKind, ParserOptions, Position, ViolationPolicy};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Policy for comments that appear outside their legal section.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Policy {
    /// Report a warning and keep going (default)
    #[default]
    Warn,
    /// Keep going silently
    Ignore,
    /// Stop at the first violation
    Strict,
}

impl From<Policy> for ViolationPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Warn => ViolationPolicy::Warn,
            Policy::Ignore => ViolationPolicy::Ignore,
            Policy::Strict => ViolationPolicy::Strict,
        }
    }
}

/// A command line tool for dumping the DSC comments of PostScript files.
#[derive(Parser, Debug)]
#[command(name = "dscdump")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to PostScript files, or "-" for stdin
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Also list lines that are not DSC comments
    #[arg(short = 'r', long = "raw", action = ArgAction::SetTrue)]
    raw: bool,

    /// How to treat comments outside their legal section
    #[arg(long, value_enum, default_value = "warn")]
    policy: Policy,

    /// Print a document summary instead of the event list
    #[arg(short = 's', long, action = ArgAction::SetTrue)]
    summary: bool,

    /// Print JSON lines instead of text
    #[arg(short = 'j', long, action = ArgAction::SetTrue)]
    json: bool,
}

/// One event as a JSON line.
#[derive(Serialize)]
struct EventRecord<'a> {
    file: &'a str,
    line: usize,
    ordinal: usize,
    section: &'static str,
    embedded: bool,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid: Option<bool>,
}

#[derive(Serialize)]
struct PageRecord {
    label: String,
    ordinal: u32,
    line: usize,
    bounding_box: Option<[i32; 4]>,
    hires_bounding_box: Option<[f64; 4]>,
}

/// A document summary as a JSON line.
#[derive(Serialize)]
struct SummaryRecord<'a> {
    file: &'a str,
    version: Option<String>,
    eps: bool,
    bounding_box: Option<[i32; 4]>,
    hires_bounding_box: Option<[f64; 4]>,
    comments: usize,
    pages: Vec<PageRecord>,
    errors: Vec<String>,
    warnings: Vec<String>,
    eof: bool,
}

fn corners<T: Coordinate>(bbox: &BBox<T>) -> [T; 4] {
    [bbox.llx(), bbox.lly(), bbox.urx(), bbox.ury()]
}

fn event_label(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::Version(_) => "version",
        EventKind::Comment(_) => "comment",
        EventKind::Malformed { .. } => "error",
        EventKind::Warning(_) => "warning",
        EventKind::Raw(_) => "raw",
    }
}

fn event_text(kind: &EventKind) -> String {
    match kind {
        EventKind::Version(version) => version.to_string(),
        EventKind::Comment(comment) => comment.to_line(),
        EventKind::Malformed { error, .. } => error.to_string(),
        EventKind::Warning(warning) => warning.to_string(),
        EventKind::Raw(line) => line.clone(),
    }
}

fn write_event<W: Write>(out: &mut W, file: &str, event: &Event, json: bool) -> Result<()> {
    let position = event.position;
    if json {
        let (name, valid) = match &event.kind {
            EventKind::Comment(comment) => {
                (Some(comment.name().into_owned()), Some(comment.is_valid()))
            }
            EventKind::Malformed { line, .. } => (Some(line.clone()), None),
            _ => (None, None),
        };
        let record = EventRecord {
            file,
            line: position.line,
            ordinal: position.ordinal,
            section: position.section.as_str(),
            embedded: position.embedded,
            kind: event_label(&event.kind),
            name,
            text: event_text(&event.kind),
            valid,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{} {} {} {}",
            position.line,
            position.section,
            event_label(&event.kind),
            event_text(&event.kind)
        )?;
    }
    Ok(())
}

/// Dump events as they are parsed. A fatal fault is returned after the
/// events before it have been written.
fn dump_events<W, S>(out: &mut W, file: &str, parser: DscParser<S>, json: bool) -> Result<()>
where
    W: Write,
    S: Iterator<Item = io::Result<String>>,
{
    for event in parser {
        let event = event?;
        write_event(out, file, &event, json)?;
    }
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    file: &str,
    structure: &DocumentStructure,
    json: bool,
) -> Result<()> {
    let diagnostics = |items: &[(Position, DscError)]| {
        items
            .iter()
            .map(|(position, error)| format!("line {}: {}", position.line, error))
            .collect::<Vec<_>>()
    };
    let errors = diagnostics(&structure.errors);
    let warnings = diagnostics(&structure.warnings);

    if json {
        let record = SummaryRecord {
            file,
            version: structure.version.as_ref().map(ToString::to_string),
            eps: structure.is_eps(),
            bounding_box: structure.bounding_box.as_ref().map(corners),
            hires_bounding_box: structure.hires_bounding_box.as_ref().map(corners),
            comments: structure.comment_count,
            pages: structure
                .pages
                .iter()
                .map(|page| PageRecord {
                    label: page.label.clone(),
                    ordinal: page.ordinal,
                    line: page.line,
                    bounding_box: page.bounding_box.as_ref().map(corners),
                    hires_bounding_box: page.hires_bounding_box.as_ref().map(corners),
                })
                .collect(),
            errors,
            warnings,
            eof: structure.eof_seen,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
        return Ok(());
    }

    let or_none = |value: Option<String>| value.unwrap_or_else(|| "none".to_string());
    writeln!(out, "file: {file}")?;
    writeln!(
        out,
        "version: {}",
        or_none(structure.version.as_ref().map(ToString::to_string))
    )?;
    writeln!(
        out,
        "bounding box: {}",
        or_none(structure.bounding_box.map(|b| b.to_string()))
    )?;
    writeln!(
        out,
        "hires bounding box: {}",
        or_none(structure.hires_bounding_box.map(|b| b.to_string()))
    )?;
    writeln!(out, "comments: {}", structure.comment_count)?;
    writeln!(out, "pages: {}", structure.pages.len())?;
    for page in &structure.pages {
        let bbox = page
            .hires_bounding_box
            .map(|b| b.to_string())
            .or_else(|| page.bounding_box.map(|b| b.to_string()));
        writeln!(
            out,
            "  page {} ({:?}) at line {}, bounding box {}",
            page.ordinal,
            page.label,
            page.line,
            or_none(bbox)
        )?;
    }
    writeln!(out, "errors: {}", errors.len())?;
    for error in &errors {
        writeln!(out, "  {error}")?;
    }
    writeln!(out, "warnings: {}", warnings.len())?;
    for warning in &warnings {
        writeln!(out, "  {warning}")?;
    }
    Ok(())
}

fn process<W, S>(out: &mut W, file: &str, parser: DscParser<S>, args: &Args) -> Result<()>
where
    W: Write,
    S: Iterator<Item = io::Result<String>>,
{
    if args.summary {
        let mut structure = DocumentStructure::collect(parser);
        let fault = structure.fault.take();
        write_summary(out, file, &structure, args.json)?;
        if let Some(fault) = fault {
            return Err(fault.into());
        }
        Ok(())
    } else {
        dump_events(out, file, parser, args.json)
    }
}

fn process_file<W: Write>(
    out: &mut W,
    path: &Path,
    args: &Args,
    options: ParserOptions,
) -> Result<()> {
    let name = path.display().to_string();
    if name == "-" {
        let stdin = io::stdin().lock();
        return process(out, &name, parse_reader(BufReader::new(stdin), options), args);
    }

    let file = File::open(path).with_context(|| format!("failed to open {name}"))?;
    let len = file.metadata()?.len();
    debug!(path = %name, len, "dumping dsc comments");
    if len == 0 {
        return process(out, &name, parse_bytes(&[], options), args);
    }

    let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("failed to map {name}"))?;
    process(out, &name, parse_bytes(&mmap, options), args)
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let options = ParserOptions::default()
        .with_raw_passthrough(args.raw)
        .with_policy(args.policy.into());

    // Open output
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    // Process each input file
    let many = args.files.len() > 1;
    for path in &args.files {
        if path.as_os_str() != "-" && !path.exists() {
            output.flush()?;
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }

        if many && !args.json {
            writeln!(output, "==> {} <==", path.display())?;
        }

        if let Err(e) = process_file(&mut output, path, &args, options) {
            output.flush()?;
            eprintln!("Error processing {}: {:#}", path.display(), e);
            std::process::exit(1);
        }
    }

    output.flush()?;
    Ok(())
}
