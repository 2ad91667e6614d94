//! Interactive HTML page with a layer selector.

use std::fmt::Write as _;

use crate::export::color_legend::{category_class, generate_color_legend, html_category_rules};
use crate::export::{escape, generated_stamp, KeyGrid, RenderOptions};
use crate::models::{Key, Layer, LayoutProfile};

const PAGE_STYLE: &str = "    body { font-family: Arial, sans-serif; margin: 20px; background: #f5f5f5; }
    .container { max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
    .controls { margin-bottom: 20px; }
    .layer { display: none; margin-bottom: 40px; }
    .layer.active { display: block; }
    .keyboard { display: grid; padding: 20px; background: #eee; border-radius: 10px; }
    .key { border: 1px solid #666; border-radius: 5px; display: flex; flex-direction: column; align-items: center; justify-content: center; font-family: monospace; font-size: 12px; white-space: pre; }
    .key-label { font-weight: bold; }
    .key-sublabel { font-size: 10px; color: #666; }
    .legend { margin-top: 20px; padding: 10px; border-top: 1px solid #eee; }
    .legend-item { display: inline-block; margin-right: 20px; font-size: 14px; }
    .color-box { display: inline-block; width: 20px; height: 20px; margin-right: 5px; vertical-align: middle; border: 1px solid #666; border-radius: 3px; }
    select { padding: 8px; border-radius: 5px; border: 1px solid #ccc; font-size: 16px; }
";

const SCRIPT: &str = "<script>
function showLayer(layerId) {
  document.querySelectorAll('.layer').forEach(function (layer) {
    layer.classList.toggle('active', layer.id === layerId);
  });
  document.getElementById('layerSelect').value = layerId;
}
window.onload = function () {
  var first = document.querySelector('.layer');
  if (first) { showLayer(first.id); }
};
</script>
";

/// Element id of a layer's container.
fn layer_id(layer: &Layer) -> String {
    format!("layer-{}", layer.name)
}

/// Renders every layer into one HTML page.
///
/// All layers are present in the document; the first is shown and a
/// `<select>` switches between them without reloading.
#[must_use]
pub fn render_html(layers: &[Layer], profile: &LayoutProfile, options: &RenderOptions) -> String {
    let size = options.key_size;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(out, "<!-- {} -->", generated_stamp());
    out.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(&options.title));
    out.push_str("<style>\n");
    out.push_str(PAGE_STYLE);
    let _ = writeln!(out, "    .key, .blank {{ width: {size}px; height: {size}px; }}");
    out.push_str(&html_category_rules(&options.palette));
    out.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape(&options.title));

    out.push_str("<div class=\"controls\">\n<label for=\"layerSelect\">Select Layer: </label>\n");
    out.push_str("<select id=\"layerSelect\" onchange=\"showLayer(this.value)\">\n");
    for layer in layers {
        let _ = writeln!(
            out,
            "  <option value=\"{}\">{}</option>",
            escape(&layer_id(layer)),
            escape(&layer.display_name)
        );
    }
    out.push_str("</select>\n</div>\n");

    for (idx, layer) in layers.iter().enumerate() {
        let active = if idx == 0 { " active" } else { "" };
        let _ = writeln!(
            out,
            "<div id=\"{}\" class=\"layer{active}\">",
            escape(&layer_id(layer))
        );
        let _ = writeln!(out, "<h2>{} Layer</h2>", escape(&layer.display_name));

        let grid = KeyGrid::new(layer, profile);
        let _ = writeln!(
            out,
            "<div class=\"keyboard\" style=\"grid-template-columns: repeat({}, {size}px); grid-gap: {}px;\">",
            grid.columns(),
            options.gap
        );
        for (_, key) in grid.cells() {
            match key {
                Some(key) => render_key(&mut out, key),
                None => out.push_str("  <div class=\"blank\"></div>\n"),
            }
        }
        out.push_str("</div>\n</div>\n");
    }

    out.push_str(&generate_color_legend(&options.palette));
    out.push_str("</div>\n");
    out.push_str(SCRIPT);
    out.push_str("</body>\n</html>\n");
    out
}

fn render_key(out: &mut String, key: &Key) {
    let _ = write!(
        out,
        "  <div class=\"key {}\" title=\"{}\">",
        category_class(key.category),
        escape(&key.code)
    );
    for (i, label) in key.labels.iter().enumerate() {
        let class = if i == 0 { "key-label" } else { "key-sublabel" };
        let _ = write!(out, "<div class=\"{class}\">{}</div>", escape(label));
    }
    out.push_str("</div>\n");
}
