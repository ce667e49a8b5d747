//! End-to-end tests for the filter-lines binary.
//!
//! Tests cover:
//! 1. --keep / --remove with keyword files
//! 2. --range with chr/pos columns and --assume-chr
//! 3. --filters with OR and --match-all
//! 4. --filter-columns projection
//! 5. stdin input and --excluded-out
//! 6. Error handling for missing files, ragged rows and bad values

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

// =============================================================================
// Helper functions
// =============================================================================

fn create_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn run_filter(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--release", "--"])
        .args(args)
        .output()
        .expect("Failed to run filter-lines")
}

fn run_filter_with_stdin(args: &[&str], stdin_content: &str) -> Output {
    let mut child = Command::new("cargo")
        .args(["run", "--release", "--"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn filter-lines");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(stdin_content.as_bytes()).unwrap();
    }

    child
        .wait_with_output()
        .expect("Failed to wait for filter-lines")
}

fn is_success(output: &Output) -> bool {
    output.status.success()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// =============================================================================
// Keyword mode
// =============================================================================

#[test]
fn test_keep_keyword_in_column() {
    let input = create_file("1\tcat\n2\tdog\n");
    let words = create_file("cat\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&words),
        "--column",
        "2",
        "--sep",
        "tab",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1\tcat\n");
    assert!(stderr(&output).contains("done, kept 1 of the 2 lines"));
}

#[test]
fn test_remove_keyword_ignore_case() {
    let input = create_file("a b\nCAT x\nc d\n");
    let words = create_file("cat\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--remove",
        path(&words),
        "--sep",
        "space",
        "--ignore-case",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "a b\nc d\n");
    assert!(stderr(&output).contains("done, removed 1 of the 3 lines"));
}

#[test]
fn test_keyword_match_all_columns() {
    let input = create_file("cat,dog\ncat,cat\n");
    let words = create_file("cat\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&words),
        "--sep",
        ",",
        "--column",
        "1,2",
        "--match-all",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "cat,cat\n");
}

#[test]
fn test_column_list_allows_spaces() {
    let input = create_file("cat,dog\nbird,cow\n");
    let words = create_file("dog\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&words),
        "--sep",
        ",",
        "--column",
        "1, 2",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "cat,dog\n");
}

#[test]
fn test_excluded_out_and_header() {
    let input = create_file("id\tanimal\n1\tcat\n2\tdog\n3\tcow\n");
    let words = create_file("dog\n");
    let excluded = NamedTempFile::new().unwrap();

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&words),
        "--header",
        "--excluded-out",
        path(&excluded),
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "id\tanimal\n2\tdog\n");
    assert_eq!(
        fs::read_to_string(excluded.path()).unwrap(),
        "1\tcat\n3\tcow\n"
    );
}

#[test]
fn test_stdin_input() {
    let words = create_file("dog\n");
    let output = run_filter_with_stdin(&["--keep", path(&words)], "1\tcat\n2\tdog\n");

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "2\tdog\n");
    assert!(stderr(&output).contains("in STDIN"));
}

// =============================================================================
// Range mode
// =============================================================================

#[test]
fn test_range_with_header() {
    let input = create_file("chrom\tpos\n1\t100\n1\t600\n");
    let ranges = create_file("1:50-500\n");
    let excluded = NamedTempFile::new().unwrap();

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&ranges),
        "--range",
        "--chr-index",
        "1",
        "--pos-index",
        "2",
        "--header",
        "--excluded-out",
        path(&excluded),
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chrom\tpos\n1\t100\n");
    assert_eq!(fs::read_to_string(excluded.path()).unwrap(), "1\t600\n");
}

#[test]
fn test_range_assume_chr_and_wildcard() {
    let input = create_file("rs1\t10\nrs2\t99999\n");
    let ranges = create_file("X\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--remove",
        path(&ranges),
        "--range",
        "--assume-chr",
        "Y",
        "--pos-index",
        "2",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "rs1\t10\nrs2\t99999\n");
}

#[test]
fn test_assume_chr_takes_precedence_over_chr_index() {
    let input = create_file("1\t100\n2\t100\n");
    let ranges = create_file("X:50-500\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&ranges),
        "--range",
        "--chr-index",
        "1",
        "--assume-chr",
        "X",
        "--pos-index",
        "2",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1\t100\n2\t100\n");
}

#[test]
fn test_range_requires_pos_index() {
    let input = create_file("1\t100\n");
    let ranges = create_file("1:50-500\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&ranges),
        "--range",
        "--chr-index",
        "1",
    ]);

    assert!(!is_success(&output));
}

#[test]
fn test_latin1_input_line_passes_through() {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(b"1\tcat\n2\tcaf\xe9\n3\tcat\xa0x\n").unwrap();
    input.flush().unwrap();
    let words = create_file("caf\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--remove",
        path(&words),
        "--column",
        "2",
        "--substring-match",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(output.stdout, b"1\tcat\n3\tcat\xa0x\n");
}

#[test]
fn test_range_bad_position_fails() {
    let input = create_file("1\t100\n1\tabc\n");
    let ranges = create_file("1:50-500\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&ranges),
        "--range",
        "--chr-index",
        "1",
        "--pos-index",
        "2",
    ]);

    assert!(!is_success(&output));
    assert!(stderr(&output).contains("line 2"));
}

// =============================================================================
// Filter expressions
// =============================================================================

#[test]
fn test_filters_or() {
    let input = create_file("name weight taste\napple 20 bad\npear 5 bad\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--filters",
        "weight>13,taste=good",
        "--sep",
        "space",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "name weight taste\napple 20 bad\n");
}

#[test]
fn test_filters_match_all() {
    let input = create_file("name weight taste\napple 20 bad\nplum 14 good\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--filters",
        "weight>13,taste=good",
        "--sep",
        "space",
        "--match-all",
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "name weight taste\nplum 14 good\n");
}

#[test]
fn test_filters_unknown_column() {
    let input = create_file("name weight\napple 20\n");

    let output = run_filter(&["--in", path(&input), "--filters", "size>13"]);

    assert!(!is_success(&output));
    let err = stderr(&output);
    assert!(err.contains("size"), "stderr: {}", err);
    assert!(err.contains("--sep"), "stderr: {}", err);
}

#[test]
fn test_filters_ambiguous_partial_match() {
    let input = create_file("weight_a\tweight_b\n1\t2\n");

    let output = run_filter(&[
        "--in",
        path(&input),
        "--filters",
        "weight>0",
        "--partial-match",
    ]);

    assert!(!is_success(&output));
    assert!(stderr(&output).contains("2 unequal matches"));
}

#[test]
fn test_filters_non_numeric_value_fails() {
    let input = create_file("weight\n20\nheavy\n");

    let output = run_filter(&["--in", path(&input), "--filters", "weight>13"]);

    assert!(!is_success(&output));
    assert!(stderr(&output).contains("line 3"));
}

// =============================================================================
// Column projection
// =============================================================================

#[test]
fn test_filter_columns_keep() {
    let input = create_file("chrom pos ref\n1 100 A\n2 200 C\n");
    let names = create_file("pos\nchrom\n");
    let excluded = NamedTempFile::new().unwrap();

    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&names),
        "--filter-columns",
        "--sep",
        "whitespace",
        "--excluded-out",
        path(&excluded),
    ]);

    assert!(is_success(&output), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "chrom pos\n1 100\n2 200\n");
    assert_eq!(fs::read_to_string(excluded.path()).unwrap(), "ref\nA\nC\n");
}

// =============================================================================
// Error handling
// =============================================================================

#[test]
fn test_missing_target_file() {
    let input = create_file("1\tcat\n");

    let output = run_filter(&["--in", path(&input), "--keep", "/nonexistent/words.txt"]);

    assert!(!is_success(&output));
    assert!(stderr(&output).contains("does not exist"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_input_file() {
    let words = create_file("cat\n");

    let output = run_filter(&["--in", "/nonexistent/input.txt", "--keep", path(&words)]);

    assert!(!is_success(&output));
    assert!(stderr(&output).contains("was not found"));
}

#[test]
fn test_ragged_rows_fail() {
    let input = create_file("a\tb\nc\td\te\n");
    let words = create_file("a\n");

    let output = run_filter(&["--in", path(&input), "--keep", path(&words)]);

    assert!(!is_success(&output));
    assert!(stderr(&output).contains("line 2 had 3 columns but the previous lines had 2"));
}

#[test]
fn test_requires_a_target() {
    let input = create_file("a\n");
    let output = run_filter(&["--in", path(&input)]);
    assert!(!is_success(&output));
}

#[test]
fn test_keep_and_filters_conflict() {
    let input = create_file("a\n");
    let words = create_file("a\n");
    let output = run_filter(&[
        "--in",
        path(&input),
        "--keep",
        path(&words),
        "--filters",
        "a=1",
    ]);
    assert!(!is_success(&output));
}
