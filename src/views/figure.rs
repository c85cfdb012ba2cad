//! Plotly figure descriptions
//!
//! Figures are plain JSON (`{"data": [...], "layout": {...}}`) handed to
//! `Plotly.react` in the browser. All charts share the dark theme built by
//! [`themed_layout`].

use serde_json::{Map, Value, json};

pub const BACKGROUND: &str = "black";
pub const ACCENT: &str = "fuchsia";
pub const FOREGROUND: &str = "white";

/// URL the choropleth loads its boundaries from
pub const BOUNDARIES_URL: &str = "/api/boundaries";

/// Layout with the dashboard theme, extended by the keys of `extra`
#[must_use]
pub fn themed_layout(title: &str, title_size: u32, extra: Value) -> Value {
    let mut layout = json!({
        "title": { "text": title, "font": { "color": ACCENT, "size": title_size } },
        "paper_bgcolor": BACKGROUND,
        "plot_bgcolor": BACKGROUND,
        "font": { "color": FOREGROUND },
    });
    merge(&mut layout, extra);
    layout
}

/// A figure from its traces and layout
#[must_use]
pub fn figure(data: Vec<Value>, layout: Value) -> Value {
    json!({ "data": data, "layout": layout })
}

/// Continuous colour scale spreading the colours evenly over 0..=1
#[must_use]
pub fn color_scale(colors: &[&str]) -> Value {
    let steps = colors.len().saturating_sub(1).max(1) as f64;
    Value::Array(
        colors
            .iter()
            .enumerate()
            .map(|(i, color)| json!([i as f64 / steps, color]))
            .collect(),
    )
}

/// Shallow merge of object keys; non-objects are ignored
fn merge(target: &mut Value, extra: Value) {
    if let (Some(target), Value::Object(extra)) = (target.as_object_mut(), extra) {
        let extra: Map<String, Value> = extra;
        target.extend(extra);
    }
}
