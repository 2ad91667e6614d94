//! End-to-end tests for `keymapviz combos` command.

use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the keymapviz binary
fn keymapviz_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keymapviz")
}

#[test]
fn test_combos_json_with_keymap() {
    let project = TestProject::new();

    let output = Command::new(keymapviz_bin())
        .arg("--config")
        .arg(project.default_config())
        .args(["combos", "--json", "--combos"])
        .arg(project.path("config/combos.dtsi"))
        .arg("--keymap")
        .arg(project.keymap())
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    let combos = json.as_array().expect("Should be an array");

    // combo_broken has no resolvable position and is dropped
    assert_eq!(combos.len(), 2);
    assert_eq!(combos[0]["name"], "combo_esc");
    assert_eq!(combos[0]["positions"], serde_json::json!([16, 15]));
    assert_eq!(combos[0]["binding"], "ESC");
    assert_eq!(combos[0]["layers"], serde_json::json!([0]));
    assert_eq!(combos[1]["name"], "combo_tab");
    assert_eq!(combos[1]["positions"], serde_json::json!([28, 27]));
    assert_eq!(combos[1]["layers"], serde_json::json!([]));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NOPE"), "Should warn about the unknown position: {stderr}");
}

#[test]
fn test_combos_text_without_keymap() {
    let project = TestProject::new();

    let output = Command::new(keymapviz_bin())
        .arg("--config")
        .arg(project.default_config())
        .args(["combos", "--combos"])
        .arg(project.path("config/combos.dtsi"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Combos (2):"));
    assert!(stdout.contains("combo_esc: [16, 15] -> ESC"));
    // without a keymap there is no layer registry, so BASE is ignored
    assert!(!stdout.contains("(layers"));
}

#[test]
fn test_combos_macro_form() {
    let project = TestProject::new();
    let combos = project.write(
        "config/macro_combos.dtsi",
        "ZMK_COMBO(tab, &kp TAB, LM1 LM2, 0 1)\nZMK_COMBO(boot, &bootloader, LN5 RN5, 2)\n",
    );

    let output = Command::new(keymapviz_bin())
        .arg("--config")
        .arg(project.default_config())
        .args(["combos", "--json", "--combos"])
        .arg(&combos)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["positions"], serde_json::json!([28, 27]));
    assert_eq!(json[0]["binding"], "TAB");
    assert_eq!(json[0]["layers"], serde_json::json!([0, 1]));
    assert_eq!(json[1]["binding"], "&bootloader");
    assert_eq!(json[1]["positions"], serde_json::json!([0, 11]));
}

#[test]
fn test_combos_missing_file_is_empty() {
    let project = TestProject::new();

    let output = Command::new(keymapviz_bin())
        .arg("--config")
        .arg(project.default_config())
        .args(["combos", "--combos"])
        .arg(project.path("config/nope.dtsi"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No combos found"));
}
