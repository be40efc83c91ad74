use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Workspace with a placeholder source file and an empty project
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("match.mp4"), b"placeholder").unwrap();
        let workspace = Self { dir };
        workspace
            .splitter(&["new", "--source", "match.mp4", "--project", "match.mp4proj"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created project"));
        workspace
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn project(&self) -> PathBuf {
        self.path().join("match.mp4proj")
    }

    fn splitter(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("splitter").unwrap();
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("SPLITTER_FFMPEG")
            .env_remove("SPLITTER_FFPROBE")
            .env_remove("SPLITTER_OUTPUT_EXT")
            .env_remove("SPLITTER_OVERWRITE")
            .env_remove("SPLITTER_LOG_LEVEL")
            .args(args);
        cmd
    }

    fn cut(&self, at: &str) {
        self.splitter(&["cut", "--project", "match.mp4proj", "--duration", "90", "--at", at])
            .assert()
            .success();
    }

    fn listing(&self) -> serde_json::Value {
        let output = self
            .splitter(&["list", "--project", "match.mp4proj", "--duration", "90", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_new_requires_existing_source() {
    let workspace = Workspace::new();
    workspace
        .splitter(&["new", "--source", "absent.mp4", "--project", "absent.mp4proj"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source file does not exist"));
}

#[test]
fn test_cuts_and_segments_are_listed() {
    let workspace = Workspace::new();
    workspace.cut("00:30");
    workspace.cut("60.5");

    let listing = workspace.listing();
    assert_eq!(listing["duration"], 90.0);
    assert_eq!(listing["cuts"].as_array().unwrap().len(), 2);

    let segments = listing["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0]["name"], "segment_1");
    assert_eq!(segments[1]["start_seconds"], 30.0);
    assert_eq!(segments[2]["end_seconds"], 90.0);
}

#[test]
fn test_text_listing() {
    let workspace = Workspace::new();
    workspace.cut("45");
    workspace
        .splitter(&["list", "--project", "match.mp4proj", "--duration", "01:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:45.000"))
        .stdout(predicate::str::contains("segment_2"));
}

#[test]
fn test_invalid_cut_is_reported() {
    let workspace = Workspace::new();
    workspace.cut("30");

    workspace
        .splitter(&["cut", "--project", "match.mp4proj", "--duration", "90", "--at", "30.0004"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot cut"));
    workspace
        .splitter(&["cut", "--project", "match.mp4proj", "--duration", "90", "--at", "95"])
        .assert()
        .failure();
    workspace
        .splitter(&["cut", "--project", "match.mp4proj", "--duration", "90", "--at", "later"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid cut position"));

    assert_eq!(workspace.listing()["cuts"].as_array().unwrap().len(), 1);
}

#[test]
fn test_toggle_and_remove() {
    let workspace = Workspace::new();
    workspace.cut("20");
    workspace.cut("40");

    workspace
        .splitter(&["toggle", "--project", "match.mp4proj", "--at", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("discard"));

    let listing = workspace.listing();
    assert_eq!(listing["cuts"][0]["tag"], "discard");
    assert_eq!(listing["segments"][0]["status"], "discard");
    assert_eq!(listing["segments"][2]["status"], "keep");

    workspace
        .splitter(&["remove", "--project", "match.mp4proj", "--index", "1"])
        .assert()
        .success();
    workspace
        .splitter(&["remove", "--project", "match.mp4proj", "--index", "5"])
        .assert()
        .failure();

    let listing = workspace.listing();
    assert_eq!(listing["cuts"].as_array().unwrap().len(), 1);
    assert_eq!(listing["cuts"][0]["seconds"], 40.0);
}

#[test]
fn test_toggle_defaults_to_most_recently_added_cut() {
    let workspace = Workspace::new();
    workspace.cut("60");
    workspace.cut("20");

    workspace
        .splitter(&["toggle", "--project", "match.mp4proj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("discard"));

    let listing = workspace.listing();
    assert_eq!(listing["cuts"][0]["seconds"], 20.0);
    assert_eq!(listing["cuts"][0]["tag"], "discard");
    assert_eq!(listing["cuts"][1]["tag"], "keep");
}

#[test]
fn test_split_every_replaces_cuts() {
    let workspace = Workspace::new();
    workspace.cut("5");
    workspace
        .splitter(&[
            "split-every",
            "--project",
            "match.mp4proj",
            "--duration",
            "90",
            "--interval",
            "20",
        ])
        .assert()
        .success();

    let seconds: Vec<f64> = workspace.listing()["cuts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|cut| cut["seconds"].as_f64().unwrap())
        .collect();
    assert_eq!(seconds, vec![20.0, 40.0, 60.0, 80.0]);
}

#[test]
fn test_first_and_last() {
    let workspace = Workspace::new();
    for (command, seconds) in [("first", "10"), ("last", "10")] {
        workspace
            .splitter(&[
                command,
                "--project",
                "match.mp4proj",
                "--duration",
                "90",
                "--seconds",
                seconds,
            ])
            .assert()
            .success();
    }

    let listing = workspace.listing();
    assert_eq!(listing["cuts"][0]["seconds"], 10.0);
    assert_eq!(listing["cuts"][1]["seconds"], 80.0);
}

#[test]
fn test_run_into_missing_directory_fails_before_extracting() {
    let workspace = Workspace::new();
    workspace.cut("30");
    workspace
        .splitter(&[
            "run",
            "--project",
            "match.mp4proj",
            "--duration",
            "90",
            "--out",
            "clips",
            "--ffmpeg",
            "/nonexistent/ffmpeg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot plan extraction"));
}

#[test]
fn test_run_with_duplicate_names_fails() {
    let workspace = Workspace::new();
    workspace.cut("30");
    fs::create_dir(workspace.path().join("clips")).unwrap();
    workspace
        .splitter(&[
            "run",
            "--project",
            "match.mp4proj",
            "--duration",
            "90",
            "--out",
            "clips",
            "--rename",
            "1=same",
            "--rename",
            "2=same",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("both resolve to"));
}

#[test]
fn test_run_reports_failing_segment() {
    let workspace = Workspace::new();
    workspace.cut("30");
    fs::create_dir(workspace.path().join("clips")).unwrap();
    workspace
        .splitter(&[
            "run",
            "--project",
            "match.mp4proj",
            "--duration",
            "90",
            "--out",
            "clips",
            "--ffmpeg",
            "/nonexistent/ffmpeg",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed on segment 1"))
        .stderr(predicate::str::contains("Segment 1 failed"));
}

#[cfg(unix)]
#[test]
fn test_run_emits_json_progress() {
    let workspace = Workspace::new();
    workspace.cut("30");
    workspace.cut("60");
    fs::create_dir(workspace.path().join("clips")).unwrap();

    // `true` ignores its arguments and exits 0
    let output = workspace
        .splitter(&[
            "run",
            "--project",
            "match.mp4proj",
            "--duration",
            "90",
            "--out",
            "clips",
            "--status",
            "2=discard",
            "--only-kept",
            "--ffmpeg",
            "true",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events[0]["event"], "start");
    assert_eq!(events[0]["total"], 2);
    assert_eq!(events.last().unwrap()["event"], "complete");

    let outputs: Vec<&str> = events
        .iter()
        .filter(|event| event["event"] == "job_start")
        .map(|event| event["output_path"].as_str().unwrap())
        .collect();
    assert_eq!(outputs.len(), 2);
    assert!(outputs[0].ends_with("match_segment_1.mp4"));
    assert!(outputs[1].ends_with("match_segment_3.mp4"));
}

#[test]
fn test_project_file_keeps_its_layout() {
    let workspace = Workspace::new();
    workspace.cut("5");

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(workspace.project()).unwrap()).unwrap();
    assert_eq!(saved["video_filename"], "match");
    assert_eq!(saved["cuts"][0], 5.0);
    assert_eq!(saved["cut_status"]["5.0"], "keep");
}

#[test]
fn test_new_defaults_project_path_to_source() {
    let workspace = Workspace::new();
    fs::write(workspace.path().join("replay.mov"), b"placeholder").unwrap();
    workspace
        .splitter(&["new", "--source", "replay.mov"])
        .assert()
        .success();
    assert!(workspace.path().join("replay.mp4proj").exists());
}
