//! The `pocketshot` binary.

mod common;

use common::*;
use std::process::Command;

fn pocketshot() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pocketshot"));
    cmd.env_remove("POCKETSHOT_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_convert_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "in.png", &gradient(240, 160));
    let output = dir.path().join("out.png");

    let status = pocketshot()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "gba-sp", "--scale", "2", "--grid", "smear"])
        .status()
        .unwrap();

    assert!(status.success());
    let image = assert_png(&std::fs::read(&output).unwrap());
    assert_size(&image, 480, 320);
}

#[test]
fn test_convert_rejects_unknown_mode() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "in.png", &gradient(8, 8));

    let out = pocketshot()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .args(["--mode", "vectrex"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Unknown mode: vectrex"), "{stderr}");
}

#[test]
fn test_unreadable_image_exits_with_bad_input_status() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"not a png at all").unwrap();
    let output = dir.path().join("out.png");

    let out = pocketshot()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Cannot decode image"), "{stderr}");

    let out = pocketshot().arg("detect").arg(&input).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_modes_lists_every_mode() {
    let out = pocketshot().arg("modes").output().unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    for name in panel_sim::MODE_NAMES {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
}

#[test]
fn test_detect_reports_stride() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "x3.png", &gradient(720, 480));

    let out = pocketshot().arg("detect").arg(&input).output().unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Device: GBA"), "{stdout}");
    assert!(stdout.contains("Stride: 3"), "{stdout}");
}
