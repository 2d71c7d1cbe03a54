//! `scout` binary smoke tests. None of these reach the network.

mod common;

use std::process::Command;

use common::fixtures;

fn scout() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scout"));
    cmd.env_remove("API_BASE_URL").env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_nothing_to_submit() {
    let output = scout().output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Please upload an image or add at least one ingredient."),
        "stderr was: {stderr}"
    );
}

#[test]
fn test_invalid_ingredients_are_reported_before_submit() {
    let output = scout().args(["--ingredients", "x, !!"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid ingredients: x, !!."));
    assert!(stderr.contains("Please upload an image or add at least one ingredient."));
}

#[test]
fn test_unsupported_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipe.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let output = scout().arg("--image").arg(&path).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please select an image file (JPG, PNG, WebP, or GIF)."));
}

#[test]
fn test_unknown_diet_is_a_usage_error() {
    let output = scout().args(["--diet", "paleo", "-g", "egg"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown dietary preference 'paleo'"));
}

#[test]
fn test_bad_base_url_is_rejected() {
    let png = fixtures::png(4, 4);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.png");
    std::fs::write(&path, png).unwrap();

    let output = scout()
        .args(["--api-base-url", "localhost:8000", "--image"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API base URL must start with http:// or https://"));
}
