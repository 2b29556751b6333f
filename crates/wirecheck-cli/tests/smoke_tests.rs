//! Smoke tests for the wirecheck CLI
//!
//! These tests run the built binary end to end.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the wirecheck binary
fn wirecheck() -> Command {
    Command::cargo_bin("wirecheck").expect("wirecheck binary should exist")
}

fn write_page(path: &Path, button_x: u32) {
    let mut img = RgbImage::from_pixel(160, 120, Rgb([255, 255, 255]));
    for y in 40..70 {
        for x in button_x..(button_x + 40).min(160) {
            img.put_pixel(x, y, Rgb([52, 120, 246]));
        }
    }
    img.save(path).unwrap();
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    wirecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    wirecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("ocr"));
}

#[test]
fn test_no_args_shows_help() {
    wirecheck().assert().failure();
}

#[test]
fn test_compare_missing_argument() {
    wirecheck()
        .args(["compare", "only-one.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LIVE_SITE"));
}

// ============================================================================
// Compare Tests
// ============================================================================

#[test]
fn test_compare_json_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    write_page(&dir.path().join("wireframe.png"), 120);
    write_page(&dir.path().join("live.png"), 130);
    let out = dir.path().join("out");

    let assert = wirecheck()
        .current_dir(dir.path())
        .args(["compare", "wireframe.png", "live.png", "--no-ocr", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(json["similarity_score"].as_f64().unwrap() < 1.0);
    assert!(!json["regions"].as_array().unwrap().is_empty());
    assert_eq!(json["font_style_mismatch"], false);
    assert!(out.join("annotated_overlay_combined.png").exists());
    assert!(out.join("heatmap_overlay.png").exists());
}

#[test]
fn test_compare_identical_text_report() {
    let dir = TempDir::new().unwrap();
    write_page(&dir.path().join("a.png"), 60);
    fs::copy(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();

    wirecheck()
        .current_dir(dir.path())
        .args(["compare", "a.png", "b.png", "--no-ocr", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Similarity (SSIM): 1.0000"))
        .stdout(predicate::str::contains("Regions:           0"));
}

#[test]
fn test_compare_rejects_text_upload() {
    let dir = TempDir::new().unwrap();
    write_page(&dir.path().join("a.png"), 60);
    fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

    wirecheck()
        .current_dir(dir.path())
        .args(["compare", "a.png", "notes.txt", "--no-ocr"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid file type"));
    assert!(!dir.path().join("wirecheck-output").exists());
}

#[test]
fn test_compare_rejects_corrupt_image() {
    let dir = TempDir::new().unwrap();
    write_page(&dir.path().join("a.png"), 60);
    fs::write(dir.path().join("b.png"), "not an image").unwrap();

    wirecheck()
        .current_dir(dir.path())
        .args(["compare", "a.png", "b.png", "--no-ocr"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not process images"));
}

#[test]
fn test_compare_rejects_malformed_config() {
    let dir = TempDir::new().unwrap();
    write_page(&dir.path().join("a.png"), 60);
    fs::write(dir.path().join("wirecheck.json"), "{ not json").unwrap();

    wirecheck()
        .current_dir(dir.path())
        .args(["compare", "a.png", "a.png", "--no-ocr", "--config", "wirecheck.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("wirecheck.json"));
}

// ============================================================================
// Score Tests
// ============================================================================

#[test]
fn test_score_identical_images() {
    let dir = TempDir::new().unwrap();
    write_page(&dir.path().join("a.png"), 60);

    wirecheck()
        .current_dir(dir.path())
        .args(["score", "a.png", "a.png"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1.000000"));
}

#[test]
fn test_score_missing_file() {
    let dir = TempDir::new().unwrap();
    wirecheck()
        .current_dir(dir.path())
        .args(["score", "a.png", "b.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
