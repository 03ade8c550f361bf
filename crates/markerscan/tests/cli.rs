#![cfg(feature = "cli")]

use assert_cmd::Command;
use markerscan::aruco::builtins::DICT_4X4_50;
use markerscan::{encode_png, render_marker};
use predicates::prelude::*;
use tempfile::tempdir;

fn write_marker_png(dir: &std::path::Path, id: u32) -> std::path::PathBuf {
    let img = render_marker(&DICT_4X4_50, id, 16, 2).expect("render");
    let path = dir.join(format!("marker_{id}.png"));
    std::fs::write(&path, encode_png(&img).expect("encode")).expect("write png");
    path
}

#[test]
fn prints_detection_json() {
    let dir = tempdir().expect("tempdir");
    let input = write_marker_png(dir.path(), 7);

    let output = Command::cargo_bin("markerscan")
        .expect("binary")
        .arg(&input)
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(json["total_markers"], 1);
    assert_eq!(json["detected_markers"][0]["id"], 7);
    assert_eq!(json["rejected_candidates"], 0);
}

#[test]
fn writes_annotated_png_and_honours_params() {
    let dir = tempdir().expect("tempdir");
    let input = write_marker_png(dir.path(), 30);
    let annotated = dir.path().join("annotated.png");
    let params = dir.path().join("params.json");
    std::fs::write(&params, r#"{"decoder": {"cell_px": 10}}"#).expect("write params");

    Command::cargo_bin("markerscan")
        .expect("binary")
        .arg(&input)
        .arg("--annotated")
        .arg(&annotated)
        .arg("--params")
        .arg(&params)
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_markers\": 1"));

    let img = image::open(&annotated).expect("annotated png").to_rgb8();
    assert_eq!(img.dimensions(), (160, 160));
}

#[test]
fn reports_undecodable_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"definitely not a png").expect("write");

    Command::cargo_bin("markerscan")
        .expect("binary")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not decode image"));
}

#[test]
fn rejects_malformed_params_file() {
    let dir = tempdir().expect("tempdir");
    let input = write_marker_png(dir.path(), 2);
    let params = dir.path().join("params.json");
    std::fs::write(&params, "{not json").expect("write params");

    Command::cargo_bin("markerscan")
        .expect("binary")
        .arg(&input)
        .arg("--params")
        .arg(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid detector parameters"));
}

#[test]
fn log_level_flag_is_parsed() {
    let dir = tempdir().expect("tempdir");
    let input = write_marker_png(dir.path(), 4);

    let run = Command::cargo_bin("markerscan")
        .expect("binary")
        .arg(&input)
        .args(["--log-level", "debug"])
        .assert()
        .success();
    if cfg!(not(feature = "tracing")) {
        run.stderr(predicate::str::contains("marker detector ready"));
    }

    Command::cargo_bin("markerscan")
        .expect("binary")
        .arg(&input)
        .args(["--log-level", "chatty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--log-level"));
}
