//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bindings for one 60-key Sofle layer, row by row.
///
/// `first` replaces the binding at index 0, `thumb` the one at index 59.
pub fn layer_bindings(first: &str, thumb: &str) -> String {
    let mut bindings: Vec<String> = (0..60).map(|i| format!("&kp N{}", i % 10)).collect();
    bindings[0] = first.to_string();
    bindings[6] = "&trans".to_string();
    bindings[59] = thumb.to_string();

    bindings
        .chunks(12)
        .map(|row| format!("                {}", row.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Root keymap with two layers that reference layer names from `layers.h`.
pub fn test_keymap() -> String {
    format!(
        r#"#include <behaviors.dtsi>
#include <dt-bindings/zmk/keys.h>
#include "layers.h"

// Sofle test keymap
/ {{
    keymap {{
        compatible = "zmk,keymap";

        base_layer {{
            display-name = "Base";
            bindings = <
{}
            >;
        }};

        nav_layer {{
            display-name = "Nav";
            bindings = <
{}
            >;
        }};
    }};
}};
"#,
        layer_bindings("&kp ESC", "&mo NAV"),
        layer_bindings("&hm_LGUI_A", "&tog BASE"),
    )
}

/// Layer name definitions.
pub const LAYERS_H: &str = "#define BASE 0\n#define NAV 1\n";

/// Combo definitions using position names and layer names.
pub const COMBOS_DTSI: &str = r#"/ {
    combos {
        compatible = "zmk,combos";
        combo_esc {
            key-positions = <LT1 LT2>;
            bindings = <&kp ESC>;
            layers = <BASE>;
        };
        combo_broken {
            key-positions = <NOPE>;
            bindings = <&kp X>;
        };
        combo_tab {
            key-positions = <LM1 LM2>;
            bindings = <&kp TAB>;
        };
    };
};
"#;

/// A project directory laid out as `<root>/config/*`.
pub struct TestProject {
    /// Keeps the directory alive for the duration of the test
    pub dir: TempDir,
}

impl TestProject {
    /// Creates a project with the test keymap, layer names and combos.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let project = Self { dir };
        project.write("config/test.keymap", &test_keymap());
        project.write("config/layers.h", LAYERS_H);
        project.write("config/combos.dtsi", COMBOS_DTSI);
        project
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a project file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Writes a project file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().expect("path has a parent"))
            .expect("Failed to create fixture dir");
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    /// Root keymap path.
    pub fn keymap(&self) -> PathBuf {
        self.path("config/test.keymap")
    }

    /// Output directory used by the tests.
    pub fn out_dir(&self) -> PathBuf {
        self.path("out")
    }

    /// Path of a config file that does not exist, so defaults apply.
    pub fn default_config(&self) -> PathBuf {
        self.path("no-config.toml")
    }

    /// Reads a file from the output directory.
    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.out_dir().join(name))
            .unwrap_or_else(|e| panic!("Failed to read output {name}: {e}"))
    }
}
