//! End-to-end tests of the library pipeline: resolve, build layers, render.

use keymapviz::diagnostics::Diagnostics;
use keymapviz::export::{render_html, render_svg, RenderOptions};
use keymapviz::models::{GridPos, KeyCategory, LayoutProfile};
use keymapviz::parser::normalize_keymap;
use keymapviz::services::pipeline::{build_layers, load_combos, process_keymap};

mod fixtures;
use fixtures::*;

#[test]
fn test_two_full_layers() {
    let project = TestProject::new();
    let profile = LayoutProfile::sofle();

    let processed = process_keymap(&project.keymap(), None, &profile).unwrap();
    let mut diag = Diagnostics::new();
    let layers = build_layers(processed.text(), &profile, &mut diag);

    assert_eq!(layers.len(), 2);
    assert!(!diag.has_warnings());

    let base = &layers[0];
    assert_eq!(base.display_name, "Base");
    assert_eq!(base.keys.len(), 59);
    assert_eq!(base.key_at(GridPos::new(0, 0)).unwrap().primary_label(), "ESC");
    // index 6 is &trans: no key in the right half's first column
    assert!(base.key_at(GridPos::new(8, 0)).is_none());
    let thumb = base.key_at(GridPos::new(14, 4)).unwrap();
    assert_eq!(thumb.code, "&mo 1");
    assert_eq!(thumb.labels, vec!["MO", "1"]);
    assert_eq!(thumb.category, KeyCategory::LayerChange);

    let nav = &layers[1];
    let first = nav.key_at(GridPos::new(0, 0)).unwrap();
    assert_eq!(first.labels, vec!["A", "HM\nLGUI"]);
    assert_eq!(first.category, KeyCategory::Modifier);
    assert_eq!(nav.key_at(GridPos::new(14, 4)).unwrap().code, "&tog 0");

    let options = RenderOptions::default();
    let svg = render_svg(&layers, &profile, &options);
    let html = render_html(&layers, &profile, &options);
    assert_eq!(svg.matches("<rect").count(), 118);
    assert_eq!(html.matches("<div class=\"key ").count(), 118);
}

#[test]
fn test_combos_resolve_against_keymap_tables() {
    let project = TestProject::new();
    let profile = LayoutProfile::sofle();
    let processed = process_keymap(&project.keymap(), None, &profile).unwrap();

    let mut diag = Diagnostics::new();
    let combos = load_combos(
        &project.path("config/combos.dtsi"),
        &processed.positions,
        Some(&processed.layers),
        &mut diag,
    );

    assert_eq!(combos.len(), 2);
    assert_eq!(combos[0].positions, vec![16, 15]);
    assert_eq!(combos[0].layers, vec![0]);
    assert!(diag.warnings().any(|e| e.message.contains("NOPE")));
}

#[test]
fn test_diamond_includes_resolve_once() {
    let project = TestProject::new();
    project.write(
        "config/test.keymap",
        "#include \"left.h\"\n#include \"right.h\"\n/ { };\n",
    );
    project.write("config/left.h", "#include \"common.h\"\n#define LEFT 1\n");
    project.write("config/right.h", "#include \"common.h\"\n#define RIGHT 2\n");
    project.write("config/common.h", "#include \"left.h\"\n#define COMMON 3\n");

    let processed = process_keymap(&project.keymap(), None, &LayoutProfile::sofle()).unwrap();

    assert_eq!(processed.sources.len(), 4);
    assert_eq!(processed.symbols.get("COMMON"), Some("3"));
    assert_eq!(processed.layer_report().len(), 3);
}

#[test]
fn test_included_position_names() {
    let project = TestProject::new();
    project.write(
        "config/test.keymap",
        "#include \"positions.h\"\n/ { combos { c { key-positions = <LT1 RH4 7>; bindings = <&kp A>; }; }; };\n",
    );
    project.write(
        "config/positions.h",
        "#define LT1 3 // custom\n#define RH4 42\n",
    );

    let processed = process_keymap(&project.keymap(), None, &LayoutProfile::sofle()).unwrap();

    assert!(!processed.positions.is_fallback());
    assert!(processed.text().contains("key-positions = <3 42 7>;"));
}

#[test]
fn test_normalizer_idempotent_on_fixture() {
    let once = normalize_keymap(&test_keymap());
    assert_eq!(normalize_keymap(&once), once);
}

#[test]
fn test_layers_file_contributes_definitions() {
    let project = TestProject::new();
    project.write("config/test.keymap", "/ { x { bindings = <&mo EXTRA>; }; };\n");
    let layers_file = project.write("extra/layers.keymap", "#define EXTRA 4\n");

    let processed =
        process_keymap(&project.keymap(), Some(&layers_file), &LayoutProfile::sofle()).unwrap();

    assert!(processed.text().contains("&mo 4"));
    assert_eq!(processed.layer_report(), vec![(4, "EXTRA".to_string())]);
}
