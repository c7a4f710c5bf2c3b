//! Integration tests for the rangepress binary.
//!
//! These cover the offline command paths: aggregate, sources, init and
//! version. The network-facing run path is covered by pipeline tests with
//! a stand-in compiler.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Helper to get the path to the compiled binary
fn get_binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps directory
    path.push("rangepress");
    path
}

/// Run rangepress and return its output
fn run_rangepress(args: &[&str]) -> std::process::Output {
    Command::new(get_binary_path())
        .args(args)
        .output()
        .expect("Failed to execute rangepress")
}

/// Run rangepress with the given stdin content
fn run_rangepress_with_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = Command::new(get_binary_path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn rangepress");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for rangepress")
}

#[test]
fn test_version_command() {
    let output = run_rangepress(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rangepress"));
}

#[test]
fn test_version_flag() {
    let output = run_rangepress(&["--version"]);
    assert!(output.status.success());
}

#[test]
fn test_help_command() {
    let output = run_rangepress(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("aggregate"));
    assert!(stdout.contains("sources"));
}

/// Siblings merge and output is canonical, exact bytes
#[test]
fn test_aggregate_stdin_merges_siblings() {
    let output = run_rangepress_with_stdin(&["aggregate"], "10.0.0.0/25\n10.0.0.128/25\n");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "10.0.0.0/24\n");
}

/// Quiet mode keeps stdout clean even when junk lines get rejected
#[test]
fn test_aggregate_quiet_with_junk_lines() {
    let input = "192.168.0.0/24\nnot-a-prefix\n10.0.5.1/16 # host inside\n";
    let output = run_rangepress_with_stdin(&["-q", "aggregate"], input);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "10.0.0.0/16\n192.168.0.0/24\n"
    );
}

#[test]
fn test_aggregate_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "# provider a\n10.0.0.0/16\n").unwrap();
    std::fs::write(&b, "10.0.5.0/24\n192.0.2.0/24\n").unwrap();

    let output = run_rangepress(&["aggregate", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert!(output.status.success());
    // 10.0.5.0/24 is subsumed by 10.0.0.0/16
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "10.0.0.0/16\n192.0.2.0/24\n"
    );
}

#[test]
fn test_aggregate_ipv6_family() {
    let output = run_rangepress_with_stdin(
        &["aggregate", "--family", "ipv6"],
        "2001:db8::/33\n2001:db8:8000::/33\n",
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2001:db8::/32\n");
}

/// IPv6 input under the default IPv4 family leaves nothing valid
#[test]
fn test_aggregate_wrong_family_fails() {
    let output = run_rangepress_with_stdin(&["aggregate"], "2001:db8::/32\n");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no valid prefixes"));
}

#[test]
fn test_aggregate_garbage_only_fails() {
    let output = run_rangepress_with_stdin(&["-q", "aggregate"], "garbage\nmore garbage\n");
    assert!(!output.status.success());
}

#[test]
fn test_aggregate_empty_stdin_fails() {
    let output = run_rangepress_with_stdin(&["aggregate"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no valid prefixes"));
}

#[test]
fn test_aggregate_missing_file_fails() {
    let output = run_rangepress(&["aggregate", "/nonexistent/prefixes.txt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"));
}

/// Sources fall back to the built-in defaults without a config file
#[test]
fn test_sources_without_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rangepress.yaml");

    let output = run_rangepress(&["--config", config.to_str().unwrap(), "sources"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("defaults"));
    assert!(stdout.contains("amazon_ipv4"));
    assert!(stdout.contains("microsoft_ipv4"));
    assert!(stdout.contains("github_ipv4"));
}

#[test]
fn test_init_writes_config_and_sources_reads_it() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rangepress.yaml");
    let config_arg = config.to_str().unwrap();

    let output = run_rangepress(&["--config", config_arg, "init"]);
    assert!(output.status.success());
    assert!(config.exists());

    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("providers:"));
    assert!(content.contains("mihomo"));

    let output = run_rangepress(&["--config", config_arg, "sources"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("amazon_ipv4"));
    assert!(stdout.contains("3 providers, 3 enabled"));
}

#[test]
fn test_init_refuses_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rangepress.yaml");
    let config_arg = config.to_str().unwrap();

    assert!(run_rangepress(&["--config", config_arg, "init"]).status.success());

    let output = run_rangepress(&["--config", config_arg, "init"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));

    let output = run_rangepress(&["--config", config_arg, "init", "--force"]);
    assert!(output.status.success());
}

#[test]
fn test_run_missing_config_fails() {
    let output = run_rangepress(&["--config", "/nonexistent/rangepress.yaml", "run"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}

#[test]
fn test_run_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rangepress.yaml");
    std::fs::write(
        &config,
        "providers:\n  - name: bad\n    family: ipv4\n    urls: [\"http://insecure.example/v4.txt\"]\n",
    )
    .unwrap();

    let output = run_rangepress(&["--config", config.to_str().unwrap(), "run"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HTTPS"));
}

/// A run with every provider disabled is a no-op, not an error
#[test]
fn test_run_all_providers_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rangepress.yaml");
    std::fs::write(
        &config,
        concat!(
            "providers:\n",
            "  - name: off\n",
            "    family: ipv4\n",
            "    urls: [\"https://example.com/v4.txt\"]\n",
            "    enabled: false\n",
        ),
    )
    .unwrap();

    let output = run_rangepress(&["--config", config.to_str().unwrap(), "run"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to do"));
}

#[test]
fn test_invalid_command() {
    let output = run_rangepress(&["nonexistent-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_aggregate_rejects_bad_family_value() {
    let output = run_rangepress(&["aggregate", "--family", "ipv5"]);
    assert!(!output.status.success());
}
