use std::path::Path;
use std::process::{Command, Output};

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
}

fn run_matrix(root: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_laminas-ci-matrix");
    Command::new(bin)
        .args(args)
        .arg("--project-dir")
        .arg(root)
        .env_remove("GITHUB_OUTPUT")
        .env("RUST_LOG", "info")
        .output()
        .expect("run laminas-ci-matrix")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("parse matrix from stdout")
}

#[test]
fn prints_matrix_for_package_with_phpunit_and_phpcs() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let root = temp_dir.path();
    write_file(root, "composer.json", r#"{"require": {"php": "^7.3"}}"#);
    write_file(root, "composer.lock", "{}");
    write_file(root, "phpunit.xml.dist", "<phpunit/>");
    write_file(root, "phpcs.xml", "<ruleset/>");

    let output = run_matrix(root, &["--stdout"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let matrix = stdout_json(&output);
    let include = matrix["include"].as_array().expect("include array");
    assert_eq!(include.len(), 7);
    assert_eq!(
        include[6]["name"],
        "./vendor/bin/phpcs -q --report=checkstyle | cs2pr on PHP 7.4"
    );
    assert!(matrix.get("exclude").is_none());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Versions found"), "stderr: {stderr}");
}

#[test]
fn conditional_mode_reads_the_diff() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let root = temp_dir.path();
    write_file(root, "composer.json", r#"{"require": {"php": "^7.4"}}"#);
    write_file(root, "phpunit.xml.dist", "<phpunit/>");
    write_file(root, ".laminas-ci-diff", "README.md\n");

    let output = run_matrix(root, &["false", "--stdout"]);
    assert!(output.status.success());
    let matrix = stdout_json(&output);
    assert_eq!(matrix["include"][0]["name"], "No checks");
    assert_eq!(matrix["include"].as_array().map(Vec::len), Some(1));
}

#[test]
fn writes_github_output_file() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let root = temp_dir.path();
    write_file(root, "composer.json", r#"{"require": {"php": "^7.4"}}"#);
    write_file(
        root,
        ".laminas-ci.json",
        r#"{"checks": ["custom-cmd"], "exclude": [{"name": "custom-cmd on PHP 7.4"}]}"#,
    );
    let output_path = root.join("github_output");

    let bin = env!("CARGO_BIN_EXE_laminas-ci-matrix");
    let output = Command::new(bin)
        .arg("--project-dir")
        .arg(root)
        .env("GITHUB_OUTPUT", &output_path)
        .output()
        .expect("run laminas-ci-matrix");
    assert!(output.status.success());

    let text = std::fs::read_to_string(&output_path).expect("read github output");
    let value = text
        .strip_prefix("matrix=")
        .expect("matrix record")
        .trim_end();
    let matrix: serde_json::Value = serde_json::from_str(value).expect("parse matrix");
    assert_eq!(matrix["include"][0]["name"], "custom-cmd on PHP 7.4");
    assert_eq!(matrix["exclude"][0]["name"], "custom-cmd on PHP 7.4");
}

#[test]
fn falls_back_to_set_output_command() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let root = temp_dir.path();
    write_file(root, "composer.json", r#"{"require": {"php": "^7.4"}}"#);

    let output = run_matrix(root, &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("::set-output name=matrix::{\"include\":"),
        "stdout: {stdout}"
    );
}

#[test]
fn missing_composer_json_fails_with_annotation() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let output = run_matrix(temp_dir.path(), &["--stdout"]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("::error::read "), "stdout: {stdout}");
    assert!(stdout.contains("composer.json"), "stdout: {stdout}");
}

#[test]
fn malformed_config_fails_distinctly() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let root = temp_dir.path();
    write_file(root, "composer.json", r#"{"require": {"php": "^7.4"}}"#);
    write_file(root, ".laminas-ci.json", "{\"checks\": [");

    let output = run_matrix(root, &["--stdout"]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("::error::parse "), "stdout: {stdout}");
    assert!(stdout.contains(".laminas-ci.json"), "stdout: {stdout}");
}
