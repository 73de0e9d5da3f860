use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn run_luksperm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_luksperm"))
        .args(args)
        .output()
        .expect("Failed to execute luksperm")
}

fn fake_header() -> tempfile::NamedTempFile {
    let mut header = tempfile::NamedTempFile::new().unwrap();
    header.write_all(b"LUKS\xba\xbe").unwrap();
    header
}

fn search_args<'a>(header: &'a Path, words: &'a str, k: &'a str, script: &'a str) -> Vec<&'a str> {
    vec![
        "search",
        "--header",
        header.to_str().unwrap(),
        "--words",
        words,
        "-k",
        k,
        "-j",
        "4",
        "--stagger-ms",
        "0",
        "--poll-interval-ms",
        "20",
        "--quiet",
        "--oracle-program",
        "sh",
        "--oracle-arg",
        "-c",
        "--oracle-arg",
        script,
    ]
}

#[test]
fn test_plan_shows_space_and_ranges() {
    let output = run_luksperm(&[
        "plan",
        "--words",
        "tree,lemon,green,blue,skye,red,test",
        "-k",
        "4",
        "-j",
        "4",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("n=7, k=4, k-n-permutations:840"),
        "Should print the permutation count"
    );
    assert!(stdout.contains("[0, 210)"), "Should show the first range");
    assert!(stdout.contains("[630, 840)"), "Should show the last range");
    assert!(
        stdout.contains("starting at \"lemon red blue skye\""),
        "Worker 1 should start at index 210"
    );
}

#[cfg(unix)]
#[test]
fn test_search_finds_passphrase() {
    let header = fake_header();
    let script = r#"read p; if [ "$p" = "Skye lemon tree green" ]; then exit 0; fi; exit 2"#;
    let output = run_luksperm(&search_args(
        header.path(),
        "tree,lemon,green,blue,skye,red,test",
        "4",
        script,
    ));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr),
        stdout
    );
    assert!(stdout.contains("Found: Skye lemon tree green"));
    assert!(stdout.contains("Workers joined. Exiting."));
}

#[cfg(unix)]
#[test]
fn test_search_exhausts_without_match() {
    let header = fake_header();
    let output = run_luksperm(&search_args(header.path(), "red,green,blue,sky", "2", "exit 2"));

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not found"));
    assert!(stdout.contains("Candidates tested: 12/12"));
}

#[cfg(unix)]
#[test]
fn test_inconclusive_verdicts_do_not_abort() {
    let header = fake_header();
    let output = run_luksperm(&search_args(header.path(), "red,green,blue", "2", "exit 1"));

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Candidates tested: 6/6"));
    assert!(stdout.contains("Inconclusive verdicts: 6"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("inconclusive verdict (rc:1)"));
}

#[test]
fn test_invalid_length_is_rejected() {
    let header = fake_header();
    let output = run_luksperm(&search_args(header.path(), "red,green", "3", "exit 2"));

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("permutation length k=3"));
}

#[test]
fn test_missing_header_is_rejected() {
    let output = run_luksperm(&search_args(
        Path::new("/nonexistent/save-header"),
        "red,green",
        "2",
        "exit 2",
    ));

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/save-header"));
}

#[test]
fn test_wordlist_file() {
    let mut wordlist = tempfile::NamedTempFile::new().unwrap();
    writeln!(wordlist, "# colours\nred\ngreen\nblue").unwrap();

    let output = run_luksperm(&[
        "plan",
        "--wordlist",
        wordlist.path().to_str().unwrap(),
        "-k",
        "3",
        "-j",
        "2",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("n=3, k=3, k-n-permutations:6"));
}
