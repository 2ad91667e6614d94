//! End-to-end tests for `keymapviz draw` command.
//!
//! The external drawer is replaced by a shell script, so these tests only
//! run on unix.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the keymapviz binary
fn keymapviz_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keymapviz")
}

/// Drawer stand-in: `parse` writes a minimal document, `draw` copies the
/// merged document to the SVG path.
const FAKE_DRAWER: &str = r#"#!/bin/sh
case "$1" in
  parse)
    printf 'layout:\n  zmk_keyboard: wrong\nlayers:\n  Base: [A, B]\ncombos:\n  - {p: [16, 15], k: OLD}\n  - {p: [1, 2], k: KEEP}\n' > "$5"
    ;;
  draw)
    cp "$2" "$4"
    ;;
esac
"#;

const FAILING_DRAWER: &str = "#!/bin/sh\necho 'drawer exploded' >&2\nexit 3\n";

fn install_drawer(project: &TestProject, script: &str) -> PathBuf {
    let path = project.write("bin/keymap", script);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    project.write(
        "keymapviz.toml",
        &format!(
            "[drawer]\ncommand = {:?}\nlayout_id = \"sofle_rgb\"\n",
            path.display().to_string()
        ),
    )
}

fn draw(project: &TestProject, config: &PathBuf, extra: &[&str]) -> std::process::Output {
    Command::new(keymapviz_bin())
        .arg("--config")
        .arg(config)
        .arg("draw")
        .arg("--keymap")
        .arg(project.keymap())
        .arg("--combos")
        .arg(project.path("config/combos.dtsi"))
        .arg("--output-dir")
        .arg(project.out_dir())
        .args(extra)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_draw_full_run() {
    let project = TestProject::new();
    let config = install_drawer(&project, FAKE_DRAWER);
    let style = project.write(
        "config/style.yaml",
        "draw_config:\n  key_h: 48\n  dark_mode: true\n",
    );

    let output = draw(&project, &config, &["--style", style.to_str().unwrap()]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "Should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(project.read_output("processed_keymap.keymap").contains("&mo 1"));
    assert!(project.read_output("keymap_layout.svg").contains("Nav Layer"));
    assert!(project.read_output("keymap_layout.html").contains("layerSelect"));

    let document: serde_yml::Value =
        serde_yml::from_str(&project.read_output("keymap.yaml")).unwrap();
    assert_eq!(document["layout"]["zmk_keyboard"].as_str(), Some("sofle_rgb"));
    assert_eq!(document["draw_config"]["key_h"].as_u64(), Some(48));
    assert_eq!(document["layers"]["Base"][0].as_str(), Some("A"));

    let combos = document["combos"].as_sequence().unwrap();
    // KEEP survives, OLD is replaced by combo_esc on the same positions
    assert_eq!(combos.len(), 3);
    assert!(combos.iter().any(|c| c["k"].as_str() == Some("KEEP")));
    assert!(!combos.iter().any(|c| c["k"].as_str() == Some("OLD")));
    let esc = combos.iter().find(|c| c["k"].as_str() == Some("ESC")).unwrap();
    // layer ids are written as the document's layer names
    assert_eq!(esc["l"][0].as_str(), Some("Base"));

    // the fake drawer copies the merged document into the SVG
    assert!(project.read_output("keymap.svg").contains("sofle_rgb"));
}

#[test]
fn test_draw_failure_keeps_earlier_outputs() {
    let project = TestProject::new();
    let config = install_drawer(&project, FAILING_DRAWER);

    let output = draw(&project, &config, &[]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Drawing stage failed"), "stderr: {stderr}");
    assert!(stderr.contains("drawer exploded"), "stderr: {stderr}");

    assert!(project.out_dir().join("processed_keymap.keymap").exists());
    assert!(project.out_dir().join("keymap_layout.svg").exists());
    assert!(project.out_dir().join("keymap_layout.html").exists());
    assert!(!project.out_dir().join("keymap.svg").exists());
}

#[test]
fn test_draw_skip_drawer() {
    let project = TestProject::new();
    let config = install_drawer(&project, FAILING_DRAWER);

    let output = draw(&project, &config, &["--skip-drawer"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(project.out_dir().join("keymap_layout.svg").exists());
    assert!(!project.out_dir().join("keymap.yaml").exists());
}

#[test]
fn test_draw_missing_drawer_program() {
    let project = TestProject::new();
    let config = project.write(
        "keymapviz.toml",
        "[drawer]\ncommand = \"/nonexistent/keymap-drawer\"\n",
    );

    let output = draw(&project, &config, &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(project.out_dir().join("processed_keymap.keymap").exists());
}
