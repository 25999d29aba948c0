//! End-to-end runs of the demo binary.

#[test]
fn demo_toggle_prints_a_vertical_gallery_tree() {
    let output = test_bin::get_test_bin("quadgrid")
        .args(["--steps", "toggle,frame"])
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mode=vertical"));
    assert!(stdout.contains("drag=on"));
    assert!(stdout.contains("pb=300.00%"));
}

#[test]
fn json_dump_reports_mode_gap_and_weights() {
    let output = test_bin::get_test_bin("quadgrid")
        .args(["--steps", "toggle,gap", "--json"])
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(state["mode"], "vertical");
    assert_eq!(state["gap"], "12");
    assert_eq!(state["drag"], true);
    assert_eq!(state["padding_bottom"], 306.0);
}

#[test]
fn validate_passes_without_a_config_file() {
    let output = test_bin::get_test_bin("quadgrid")
        .arg("--validate")
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Config validation passed"));
}

#[test]
fn fixture_round_trip_through_the_cli() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.ron");
    let emit = test_bin::get_test_bin("quadgrid")
        .args(["--emit-fixture", path.to_str().unwrap()])
        .output()
        .expect("binary runs");
    assert!(emit.status.success());

    let run = test_bin::get_test_bin("quadgrid")
        .args(["--fixture", path.to_str().unwrap(), "--steps", "toggle", "--json"])
        .output()
        .expect("binary runs");
    assert!(run.status.success());
    let state: serde_json::Value = serde_json::from_slice(&run.stdout).expect("valid json");
    assert_eq!(state["mode"], "vertical");
}
