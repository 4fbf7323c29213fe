//! Integration tests for the bmw CLI.
//!
//! Every run gets its own working directory and config directory so the
//! user's saved configuration never leaks in.
//!
//! Run with: `cargo test --package bubble-multiway-cli --test cli_integration`

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to run bmw in `dir` with an isolated config directory.
fn run_bmw_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bmw"))
        .current_dir(dir)
        .env("BMW_CONFIG_DIR", dir.join(".bmw-config"))
        .env_remove("BMW_OUTPUT_DIR")
        .env_remove("BMW_MAX_STATES")
        .env_remove("BMW_NODE_COLOR")
        .env_remove("BMW_CAUSAL_NODE_COLOR")
        .args(args)
        .output()
        .expect("Failed to execute bmw command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// Multiway Command Tests
// =============================================================================

#[test]
fn test_multiway_prints_reference_stats() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "-n", "3"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Input values: [1, 2, 3]"));
    assert!(out.contains("States:          6"));
    assert!(out.contains("Edges:           6"));
    assert!(out.contains("DAG:             yes"));
    assert!(out.contains("Max inversions:  3"));
}

#[test]
fn test_multiway_writes_default_graphml() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "-n", "3"]);
    assert!(output.status.success());

    let path = temp.path().join("bubble_multiway_n3.graphml");
    assert!(path.exists(), "default GraphML should be written");
    let xml = fs::read_to_string(path).unwrap();
    assert!(xml.contains(r#"<node id="3,2,1">"#));
    assert_eq!(xml.matches("<edge ").count(), 6);
}

#[test]
fn test_no_graphml_skips_default_file() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "-n", "2", "--no-graphml"]);
    assert!(output.status.success());
    assert!(!temp.path().join("bubble_multiway_n2.graphml").exists());
}

#[test]
fn test_multiway_values_with_super_source_and_outputs() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(
        temp.path(),
        &[
            "multiway",
            "--values",
            "3,1,1,2",
            "--super-source",
            "--graphml",
            "out/g.graphml",
            "--json",
            "out/g.json",
            "--svg",
            "out/g.svg",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("States:          12"));
    assert!(out.contains("Max inversions:  5"));
    assert!(out.contains("Input inversions: 3"));
    assert!(out.contains("Super-source:    yes"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("out/g.json")).unwrap())
            .unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 13);

    let svg = fs::read_to_string(temp.path().join("out/g.svg")).unwrap();
    assert!(svg.contains("ALL STARTS"));
    assert!(temp.path().join("out/g.graphml").exists());
    assert!(!temp.path().join("bubble_multiway_vals_3_1_1_2.graphml").exists());
}

#[test]
fn test_png_is_rasterized() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(
        temp.path(),
        &["multiway", "-n", "3", "--png", "g.png", "--scale", "0"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Image:"));

    let bytes = fs::read(temp.path().join("g.png")).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn test_unknown_image_extension_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "-n", "2", "--svg", "g.jpg"]);
    assert!(!output.status.success());
    assert!(!temp.path().join("g.jpg").exists());
}

// =============================================================================
// Causal Command Tests
// =============================================================================

#[test]
fn test_causal_prints_event_stats() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["causal", "--values", "3,2,1"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Events:          6"));
    assert!(out.contains("Causal edges:    4"));
    assert!(temp.path().join("bubble_causal_vals_3_2_1.graphml").exists());
}

#[test]
fn test_causal_graphml_carries_event_attributes() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["causal", "-n", "3", "--graphml", "c.graphml"]);
    assert!(output.status.success());

    let xml = fs::read_to_string(temp.path().join("c.graphml")).unwrap();
    for attr in [
        "source_str",
        "target_str",
        "swap_index",
        "source_inversions",
        "target_inversions",
    ] {
        assert!(xml.contains(&format!(r#"attr.name="{}""#, attr)), "missing {}", attr);
    }
}

// =============================================================================
// Input Validation Tests
// =============================================================================

#[test]
fn test_invalid_value_exits_with_input_code() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "--values", "3,x,1"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("\"x\""));
}

#[test]
fn test_missing_and_conflicting_input() {
    let temp = TempDir::new().unwrap();
    let missing = run_bmw_in_dir(temp.path(), &["causal"]);
    assert_eq!(missing.status.code(), Some(2));

    let both = run_bmw_in_dir(temp.path(), &["multiway", "-n", "3", "--values", "1,2"]);
    assert_eq!(both.status.code(), Some(2));
}

#[test]
fn test_zero_size_is_rejected() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "-n", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_negative_values_are_accepted() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["multiway", "--values", "-1,2,-3"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(temp
        .path()
        .join("bubble_multiway_vals_m1_2_m3.graphml")
        .exists());
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_set_get_reset() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let set = run_bmw_in_dir(dir, &["config", "set", "node_color", "#123456"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));

    let get = run_bmw_in_dir(dir, &["config", "get", "node_color"]);
    assert_eq!(stdout(&get).trim(), "#123456");

    let reset = run_bmw_in_dir(dir, &["config", "reset"]);
    assert!(reset.status.success());
    let get = run_bmw_in_dir(dir, &["config", "get", "node_color"]);
    assert_eq!(stdout(&get).trim(), "#9ecae1");
}

#[test]
fn test_config_output_dir_redirects_artifacts() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let set = run_bmw_in_dir(dir, &["config", "set", "output_dir", "artifacts"]);
    assert!(set.status.success());

    let output = run_bmw_in_dir(dir, &["multiway", "-n", "2"]);
    assert!(output.status.success());
    assert!(dir.join("artifacts/bubble_multiway_n2.graphml").exists());
}

#[test]
fn test_config_unknown_key_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["config", "get", "nope"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_path_points_into_config_dir() {
    let temp = TempDir::new().unwrap();
    let output = run_bmw_in_dir(temp.path(), &["config", "path"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("config.json"));
}
