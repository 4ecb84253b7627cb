//! Generate an HTML/SVG diagram of the two-layer keymap.
//! One key per input line; the gesture line is highlighted.

use gpio_keyboard::{Channel, KeyMap, Layer, Timing};
use gpio_keyboard_keymap::{NUM_CHANNELS, NUM_LAYERS};

/// Key unit size in SVG pixels.
const U: f64 = 64.0;
/// Gap between keys.
const GAP: f64 = 8.0;
/// Step: key + gap.
const S: f64 = U + GAP;
/// Key corner radius.
const R: f64 = 6.0;
/// Margin around the SVG content.
const MARGIN: f64 = 20.0;
/// Vertical space taken by one layer, including its title.
const LAYER_HEIGHT: f64 = U + 60.0;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a single layer as an SVG group.
fn render_layer(keymap: &KeyMap, layer: Layer, y_offset: f64) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<g transform="translate({MARGIN}, {y_offset})">"#
    ));
    svg.push_str(&format!(
        r#"<text x="0" y="-10" class="layer-title">Layer {} ({})</text>"#,
        layer.index(),
        layer
    ));

    for channel in Channel::all() {
        let kc = keymap.lookup(layer, channel);
        let x = channel.index() as f64 * S;
        let key_class = if channel.is_gesture() {
            "key gesture"
        } else {
            "key"
        };

        svg.push_str(&format!(
            r#"<rect x="{x}" y="0" width="{U}" height="{U}" rx="{R}" class="{key_class}"/>"#
        ));

        let label = kc.display_name();
        let font_class = if label.len() > 3 { " small" } else { "" };
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label{font_class}">{}</text>"#,
            x + U / 2.0,
            U / 2.0 + 1.0,
            html_escape(label),
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="channel">ch {}</text>"#,
            x + U / 2.0,
            U + 14.0,
            channel,
        ));
    }

    svg.push_str("</g>");
    svg
}

/// Generate the complete HTML document with inline SVG.
pub fn generate_html(keymap: &KeyMap, timing: &Timing) -> String {
    let total_width = NUM_CHANNELS as f64 * S - GAP + 2.0 * MARGIN;
    let total_height = NUM_LAYERS as f64 * LAYER_HEIGHT + 2.0 * MARGIN;

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>GPIO Keyboard Layout</title>
<style>
  body {{
    background: #1a1a2e;
    color: #eee;
    font-family: system-ui, -apple-system, sans-serif;
    display: flex;
    flex-direction: column;
    align-items: center;
    padding: 2em;
  }}
  .key {{
    fill: #16213e;
    stroke: #0f3460;
    stroke-width: 1.5;
  }}
  .key.gesture {{
    fill: #2d1b4e;
    stroke: #e94560;
    stroke-width: 2;
  }}
  .label {{
    fill: #eee;
    font-family: "JetBrains Mono", "Fira Code", monospace;
    font-size: 14px;
    text-anchor: middle;
    dominant-baseline: middle;
  }}
  .label.small {{
    font-size: 10px;
  }}
  .channel {{
    fill: #888;
    font-size: 10px;
    text-anchor: middle;
  }}
  .layer-title {{
    fill: #e94560;
    font-size: 16px;
    font-weight: bold;
  }}
</style>
</head>
<body>
<svg width="{total_width}" height="{total_height}" xmlns="http://www.w3.org/2000/svg">
"#
    );

    for layer in Layer::all() {
        let y_offset = MARGIN + layer.index() as f64 * LAYER_HEIGHT + 30.0;
        html.push_str(&render_layer(keymap, layer, y_offset));
        html.push('\n');
    }

    html.push_str("</svg>\n");
    html.push_str(&format!(
        "<p>Tap channel {} more than {} times in a row, each within {}ms of the last, to switch layers.</p>\n",
        Channel::GESTURE,
        timing.toggle_after_repeats + 1,
        timing.burst_window_ms,
    ));
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_is_labelled() {
        let html = generate_html(&KeyMap::DEFAULT, &Timing::default());
        for name in ["A", "B", "C", "ENTER", "X", "Y", "Z", "SPACE"] {
            assert!(html.contains(&format!(">{}</text>", name)), "missing {}", name);
        }
        assert_eq!(html.matches("class=\"key gesture\"").count(), NUM_LAYERS);
        assert!(html.contains("Layer 1 (alternate)"));
    }
}
