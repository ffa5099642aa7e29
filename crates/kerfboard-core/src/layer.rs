//! Named layers with display metadata.

use serde::{Deserialize, Serialize};

/// A named visibility grouping with display styling.
///
/// Layers are metadata only: hiding a layer never removes elements from the
/// document, it just tells the renderer to skip them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    /// Stroke color used when rendering this layer.
    pub color: String,
    /// SVG dash pattern, empty for solid strokes.
    pub stroke_dash: String,
    pub visible: bool,
}

impl Layer {
    pub fn new(name: &str, color: &str, stroke_dash: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            stroke_dash: stroke_dash.to_string(),
            visible: true,
        }
    }
}

/// The initial layer registry for a new document.
pub fn default_layers() -> Vec<Layer> {
    vec![
        Layer::new("CUT_OUTSIDE", "#e74c3c", ""),
        Layer::new("CUT_INSIDE", "#e74c3c", "6 3"),
        Layer::new("ENGRAVE", "#3498db", ""),
        Layer::new("NOTES", "#2ecc71", ""),
    ]
}
