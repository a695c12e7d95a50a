//! CLI-level tests: config and credential handling through the `vload`
//! binary. Network-touching commands are exercised only in `--dry-run` mode.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn vload_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("vload");
    path
}

/// Minimal single-page PDF containing `text` (no parens or backslashes).
fn minimal_pdf(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET\n");
    let o4 = out.len();
    out.extend_from_slice(
        format!(
            "4 0 obj << /Length {} >> stream\n{stream}endstream endobj\n",
            stream.len()
        )
        .as_bytes(),
    );
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for off in [o1, o2, o3, o4, o5] {
        out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{xref_start}\n").as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        data_dir.join("guide.pdf"),
        minimal_pdf("Short clinical guide used for smoke testing."),
    )
    .unwrap();

    let config_content = format!(
        r#"[data]
dir = "{}/data"
include_globs = ["*.pdf"]

[chunking]
chunk_size = 500
chunk_overlap = 20
"#,
        root.display()
    );

    let config_path = root.join("vload.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_vload(config_path: &Path, args: &[&str], with_keys: bool) -> (String, String, bool) {
    let binary = vload_binary();
    let mut cmd = Command::new(&binary);
    cmd.arg("--config").arg(config_path).args(args);
    cmd.env_remove("OPENAI_API_KEY").env_remove("PINECONE_API_KEY");
    if with_keys {
        cmd.env("OPENAI_API_KEY", "test-embedding-key");
        cmd.env("PINECONE_API_KEY", "test-index-key");
    }

    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("Failed to run vload binary at {binary:?}: {e}"));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn missing_embedding_key_is_fatal() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_vload(&config_path, &["index", "--dry-run"], false);
    assert!(!success, "run must fail without credentials");
    assert!(
        stderr.contains("OPENAI_API_KEY"),
        "should name the missing variable, got: {stderr}"
    );
}

#[test]
fn missing_index_key_is_fatal() {
    let (_tmp, config_path) = setup_test_env();

    let binary = vload_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(&config_path)
        .args(["index", "--dry-run"])
        .env("OPENAI_API_KEY", "test-embedding-key")
        .env_remove("PINECONE_API_KEY")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PINECONE_API_KEY"), "got: {stderr}");
}

#[test]
fn dry_run_reports_counts_without_network() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_vload(&config_path, &["index", "--dry-run"], true);
    assert!(success, "dry-run failed: stdout={stdout}, stderr={stderr}");
    assert!(stdout.contains("(dry-run)"));
    assert!(stdout.contains("pages: 1"));
    assert!(stdout.contains("estimated chunks: 1"));
    assert!(stdout.contains("ok"));
}

#[test]
fn missing_config_file_is_fatal() {
    let (tmp, _) = setup_test_env();
    let bogus = tmp.path().join("nope.toml");

    let (_, stderr, success) = run_vload(&bogus, &["index", "--dry-run"], true);
    assert!(!success);
    assert!(stderr.contains("config"), "got: {stderr}");
}

#[test]
fn missing_data_directory_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("vload.toml");
    fs::write(
        &config_path,
        format!("[data]\ndir = \"{}/absent\"\n", tmp.path().display()),
    )
    .unwrap();

    let (_, stderr, success) = run_vload(&config_path, &["index", "--dry-run"], true);
    assert!(!success);
    assert!(stderr.contains("data directory"), "got: {stderr}");
}

#[test]
fn invalid_config_values_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("vload.toml");
    fs::write(
        &config_path,
        "[data]\ndir = \"data/\"\n[chunking]\nchunk_size = 0\n",
    )
    .unwrap();

    let (_, stderr, success) = run_vload(&config_path, &["index", "--dry-run"], true);
    assert!(!success);
    assert!(stderr.contains("chunk_size"), "got: {stderr}");
}
