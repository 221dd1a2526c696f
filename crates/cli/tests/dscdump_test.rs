//! Tests for the dscdump CLI tool including:
//! - Text and JSON event listings
//! - Document summaries (-s)
//! - Raw passthrough (-r)
//! - Violation policies (--policy)
//! - Output files (-o) and failure exit codes

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::{NamedTempFile, TempDir};

// ============================================================================
// Helper functions
// ============================================================================

const SAMPLE: &str = "%!PS-Adobe-3.0
%%BoundingBox: 0 0 612 792
%%PageBoundingBox: 0 0 100 100
%%EndComments
%%Page: 1 1
%%BoundingBox: a b c
%%EOF
";

const EPS: &str = "%!PS-Adobe-3.0 EPSF-3.0
%%BoundingBox: (atend)
%%EndComments
%%Page: (Cover page) 1
%%PageHiResBoundingBox: 0.5 0.5 99.25 99.75
newpath
%%Trailer
%%BoundingBox: 0 0 100 100
%%EOF
";

/// Write `contents` to a fresh temporary file.
fn sample_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

/// Run dscdump with given arguments and return (exit_code, stdout, stderr).
fn run_dscdump(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_dscdump"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute dscdump");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Run dscdump on `contents` with the given options before the path.
fn run(contents: &str, options: &[&str]) -> (i32, String, String) {
    let file = sample_file(contents);
    let path = file.path().to_string_lossy().to_string();
    let mut args = options.to_vec();
    args.push(&path);
    run_dscdump(&args)
}

// ============================================================================
// Basic invocation
// ============================================================================

#[test]
fn test_help() {
    let (code, stdout, _) = run_dscdump(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("--policy"));
    assert!(stdout.contains("--summary"));
}

#[test]
fn test_requires_a_file() {
    let (code, _, stderr) = run_dscdump(&[]);
    assert_ne!(code, 0);
    assert!(stderr.contains("FILES"));
}

#[test]
fn test_missing_file_exits_with_one() {
    let (code, stdout, stderr) = run_dscdump(&["/nonexistent/figure.eps"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("File not found"), "{stderr}");
}

// ============================================================================
// Event listings
// ============================================================================

#[test]
fn test_lists_events_with_sections() {
    let (code, stdout, _) = run(SAMPLE, &[]);
    assert_eq!(code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
1 header version %!PS-Adobe-3.0
2 header comment %%BoundingBox: 0 0 612 792
3 header comment %%PageBoundingBox: 0 0 100 100
3 header warning %%PageBoundingBox is not legal in the header section
4 header comment %%EndComments
5 page comment %%Page: 1 1
6 page error malformed arguments for %%BoundingBox: expected 4 coordinates, found 3
7 page comment %%EOF
");
}

#[test]
fn test_raw_lines_are_listed() {
    let (code, stdout, _) = run("%%Page: 1 1\nshowpage\n%%EOF\n", &["-r"]);
    assert_eq!(code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
1 page comment %%Page: 1 1
2 page raw showpage
3 page comment %%EOF
");
}

#[test]
fn test_ignore_policy_hides_warnings() {
    let (code, stdout, _) = run(SAMPLE, &["--policy", "ignore"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("warning"));
    assert!(stdout.contains("%%PageBoundingBox: 0 0 100 100"));
}

#[test]
fn test_strict_policy_fails_on_violation() {
    let (code, stdout, stderr) = run(SAMPLE, &["--policy", "strict"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("is not legal in the header section"), "{stderr}");
    // Events before the violation are still written.
    assert!(stdout.contains("%%BoundingBox: 0 0 612 792"));
    assert!(!stdout.contains("%%EOF"));
}

#[test]
fn test_json_event_lines() {
    let (code, stdout, _) = run(SAMPLE, &["-j"]);
    assert_eq!(code, 0);

    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect();
    assert_eq!(records.len(), 8);

    assert_eq!(records[0]["kind"], "version");
    assert_eq!(records[1]["kind"], "comment");
    assert_eq!(records[1]["name"], "%%BoundingBox");
    assert_eq!(records[1]["text"], "%%BoundingBox: 0 0 612 792");
    assert_eq!(records[1]["valid"], true);
    assert_eq!(records[1]["section"], "header");
    assert_eq!(records[3]["kind"], "warning");
    assert_eq!(records[6]["kind"], "error");
    assert_eq!(records[6]["name"], "%%BoundingBox: a b c");
    assert_eq!(records[7]["line"], 7);
    assert_eq!(records[7]["embedded"], false);
}

#[test]
fn test_multiple_files_get_headers() {
    let first = sample_file("%%EOF\n");
    let second = sample_file("%%EOF\n");
    let first_path = first.path().to_string_lossy().to_string();
    let second_path = second.path().to_string_lossy().to_string();

    let (code, stdout, _) = run_dscdump(&[&first_path, &second_path]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        format!(
            "==> {first_path} <==\n1 header comment %%EOF\n\
             ==> {second_path} <==\n1 header comment %%EOF\n"
        )
    );
}

#[test]
fn test_empty_file_lists_nothing() {
    let (code, stdout, stderr) = run("", &[]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.is_empty());
}

#[test]
fn test_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dscdump"))
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn dscdump");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"%%Title: piped\r\n%%EOF\r\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "1 header comment %%Title: piped\n2 header comment %%EOF\n"
    );
}

// ============================================================================
// Summaries
// ============================================================================

#[test]
fn test_summary_text() {
    let file = sample_file(EPS);
    let path = file.path().to_string_lossy().to_string();
    let (code, stdout, _) = run_dscdump(&["-s", &path]);
    assert_eq!(code, 0);

    let body = stdout
        .strip_prefix(&format!("file: {path}\n"))
        .expect("summary starts with the file name");
    insta::assert_snapshot!(body.trim_end(), @r#"
version: %!PS-Adobe-3.0 EPSF-3.0
bounding box: 0 0 100 100
hires bounding box: none
comments: 7
pages: 1
  page 1 ("Cover page") at line 4, bounding box 0.5 0.5 99.25 99.75
errors: 0
warnings: 0
"#);
}

#[test]
fn test_summary_json() {
    let (code, stdout, _) = run(EPS, &["-s", "-j"]);
    assert_eq!(code, 0);

    let record: serde_json::Value = serde_json::from_str(stdout.trim_end()).unwrap();
    assert_eq!(record["eps"], true);
    assert_eq!(record["eof"], true);
    assert_eq!(record["bounding_box"], serde_json::json!([0, 0, 100, 100]));
    assert_eq!(record["hires_bounding_box"], serde_json::Value::Null);
    assert_eq!(record["pages"][0]["label"], "Cover page");
    assert_eq!(
        record["pages"][0]["hires_bounding_box"],
        serde_json::json!([0.5, 0.5, 99.25, 99.75])
    );
    assert_eq!(record["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_summary_reports_diagnostics() {
    let (code, stdout, _) = run("%%Page: 1 1\n%%BoundingBox: x\n", &["-s"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("errors: 1\n  line 2: malformed arguments for %%BoundingBox"));
    assert!(stdout.contains("warnings: 1\n  line 2: document ended inside an open page section"));
}

// ============================================================================
// Output file
// ============================================================================

#[test]
fn test_outfile() {
    let input = sample_file("%%EOF\n");
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("events.txt");
    let (code, stdout, _) = run_dscdump(&[
        "-o",
        &out.to_string_lossy(),
        &input.path().to_string_lossy(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(Path::new(&out).exists());
    assert_eq!(fs::read_to_string(&out).unwrap(), "1 header comment %%EOF\n");
}
