//! End-to-end tests for `keymapviz render` command.

use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the keymapviz binary
fn keymapviz_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keymapviz")
}

fn render(project: &TestProject, extra: &[&str]) -> std::process::Output {
    Command::new(keymapviz_bin())
        .arg("--config")
        .arg(project.default_config())
        .arg("render")
        .arg("--keymap")
        .arg(project.keymap())
        .arg("--output-dir")
        .arg(project.out_dir())
        .args(extra)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_render_writes_svg_and_html() {
    let project = TestProject::new();

    let output = render(&project, &[]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "Should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Rendered 2 layers"));

    let svg = project.read_output("keymap_layout.svg");
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert_eq!(svg.matches("<g transform=").count(), 2);
    assert!(svg.contains("Base Layer"));
    assert!(svg.contains("Nav Layer"));
    // 60 bindings per layer, one &trans each
    assert_eq!(svg.matches("<rect").count(), 118);
    // thumb key 59 of the base layer at column 14, row 4
    assert!(svg.contains("<rect x=\"910\" y=\"300\""));

    let html = project.read_output("keymap_layout.html");
    assert!(html.contains("<select id=\"layerSelect\""));
    assert!(html.contains("<option value=\"layer-base\">Base</option>"));
    assert!(html.contains("<option value=\"layer-nav\">Nav</option>"));
    assert!(html.contains("class=\"key key-modifier\""));
    assert!(html.contains("Regular Keys"));
}

#[test]
fn test_render_resolved_input() {
    let project = TestProject::new();
    project.write(
        "config/test.keymap",
        r#"/ { keymap {
            only_layer { display-name = "Only"; bindings = <&kp Q &mo 1>; };
        }; };"#,
    );

    let output = render(&project, &["--resolved"]);

    assert_eq!(output.status.code(), Some(0));
    let svg = project.read_output("keymap_layout.svg");
    assert!(svg.contains("Only Layer"));
    assert_eq!(svg.matches("<rect").count(), 2);
    assert!(svg.contains("class=\"key key-layer-change\""));
}

#[test]
fn test_render_keymap_without_layers() {
    let project = TestProject::new();
    project.write("config/test.keymap", "/ { };\n");

    let output = render(&project, &[]);

    assert_eq!(output.status.code(), Some(0));
    let html = project.read_output("keymap_layout.html");
    assert!(!html.contains("<option"));
}

#[test]
fn test_render_nonexistent_keymap() {
    let project = TestProject::new();

    let output = Command::new(keymapviz_bin())
        .arg("--config")
        .arg(project.default_config())
        .args(["render", "--resolved", "--keymap", "/nonexistent/file.keymap"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
