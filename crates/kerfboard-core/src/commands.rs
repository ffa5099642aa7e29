//! The command interface: discrete edit operations against the shared
//! canvas.
//!
//! Every operation is a single synchronous transaction returning a
//! structured JSON result, so any command/response transport (an MCP tool
//! host, an HTTP route, a test) can drive it through [`dispatch`]. Errors
//! come back as `{"error": ...}` payloads, never as panics.

use crate::element::{AttrMap, DEFAULT_LAYER, LAYER_ATTR};
use crate::state::CanvasState;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

/// How long `take_screenshot` waits for the browser before giving up.
pub const SCREENSHOT_DEADLINE: Duration = Duration::from_secs(10);

/// Command failures reported to the caller. No variant mutates state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid JSON in attrs: {0}")]
    MalformedAttrs(String),
    #[error("Element '{0}' not found")]
    ElementNotFound(String),
    #[error("Layer '{0}' not found")]
    LayerNotFound(String),
    #[error("Timeout waiting for browser to capture screenshot. Is the browser connected?")]
    ScreenshotTimeout,
}

/// A named edit operation, tagged for transport as `{"op": ..., ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    ListElements,
    AddElement {
        tag: String,
        /// JSON object of SVG attributes, as text.
        attrs: String,
        #[serde(default)]
        text_content: String,
        #[serde(default = "default_layer_name")]
        layer: String,
    },
    UpdateElement {
        element_id: String,
        attrs: String,
    },
    RemoveElement {
        element_id: String,
    },
    GetSvg,
    SetCanvasSize {
        width: u32,
        height: u32,
    },
    TakeScreenshot,
    ListLayers,
    SetLayerVisibility {
        layer_name: String,
        visible: bool,
    },
    SetElementLayer {
        element_id: String,
        layer_name: String,
    },
}

fn default_layer_name() -> String {
    DEFAULT_LAYER.to_string()
}

/// Run one command, folding errors into an `{"error": ...}` payload.
pub fn dispatch(state: &CanvasState, command: Command) -> Value {
    let result = match command {
        Command::ListElements => Ok(list_elements(state)),
        Command::AddElement {
            tag,
            attrs,
            text_content,
            layer,
        } => add_element(state, &tag, &attrs, &text_content, &layer),
        Command::UpdateElement { element_id, attrs } => update_element(state, &element_id, &attrs),
        Command::RemoveElement { element_id } => remove_element(state, &element_id),
        Command::GetSvg => Ok(get_svg(state)),
        Command::SetCanvasSize { width, height } => Ok(set_canvas_size(state, width, height)),
        Command::TakeScreenshot => take_screenshot(state),
        Command::ListLayers => Ok(list_layers(state)),
        Command::SetLayerVisibility {
            layer_name,
            visible,
        } => set_layer_visibility(state, &layer_name, visible),
        Command::SetElementLayer {
            element_id,
            layer_name,
        } => set_element_layer(state, &element_id, &layer_name),
    };
    result.unwrap_or_else(|err| json!({ "error": err.to_string() }))
}

/// Full element list plus canvas size.
pub fn list_elements(state: &CanvasState) -> Value {
    let doc = state.document();
    let elements: Vec<Value> = doc
        .list_elements()
        .map(|el| {
            json!({
                "id": el.id,
                "tag": el.tag,
                "attrs": el.attrs,
                "text_content": el.text_content,
                "layer": el.layer(),
            })
        })
        .collect();
    json!({
        "canvas": { "width": doc.width(), "height": doc.height() },
        "elements": elements,
    })
}

/// Add an element, stamping the requested layer into its attributes.
///
/// The layer name is written without checking the registry; only
/// [`set_element_layer`] validates it. That asymmetry matches the observed
/// editing flow and is kept as-is pending a product decision.
pub fn add_element(
    state: &CanvasState,
    tag: &str,
    attrs: &str,
    text_content: &str,
    layer: &str,
) -> Result<Value, CommandError> {
    let mut parsed = parse_attrs(attrs)?;
    parsed.insert(LAYER_ATTR, layer);

    let mut doc = state.document();
    let el = doc.add_element(tag, parsed, text_content);
    Ok(json!({ "id": el.id, "tag": el.tag, "attrs": el.attrs, "layer": layer }))
}

/// Merge attributes into an existing element.
pub fn update_element(
    state: &CanvasState,
    element_id: &str,
    attrs: &str,
) -> Result<Value, CommandError> {
    let parsed = parse_attrs(attrs)?;

    let mut doc = state.document();
    match doc.update_element(element_id, &parsed) {
        Some(el) => Ok(json!({ "id": el.id, "tag": el.tag, "attrs": el.attrs })),
        None => Err(CommandError::ElementNotFound(element_id.to_string())),
    }
}

pub fn remove_element(state: &CanvasState, element_id: &str) -> Result<Value, CommandError> {
    if state.document().remove_element(element_id) {
        Ok(json!({ "removed": true, "id": element_id }))
    } else {
        Err(CommandError::ElementNotFound(element_id.to_string()))
    }
}

/// The full document as raw SVG markup (a JSON string at the dispatch
/// seam).
pub fn get_svg(state: &CanvasState) -> Value {
    Value::String(state.document().to_svg())
}

pub fn set_canvas_size(state: &CanvasState, width: u32, height: u32) -> Value {
    state.document().set_canvas_size(width, height);
    json!({ "width": width, "height": height })
}

/// Ask the browser for a capture and wait for it with the default deadline.
pub fn take_screenshot(state: &CanvasState) -> Result<Value, CommandError> {
    take_screenshot_with(state, SCREENSHOT_DEADLINE)
}

/// [`take_screenshot`] with an explicit deadline. The wait holds only the
/// rendezvous slot, never the document lock.
pub fn take_screenshot_with(
    state: &CanvasState,
    deadline: Duration,
) -> Result<Value, CommandError> {
    match state.screenshot().request(deadline) {
        Some(data) => Ok(json!({ "screenshot": data })),
        None => Err(CommandError::ScreenshotTimeout),
    }
}

pub fn list_layers(state: &CanvasState) -> Value {
    json!({ "layers": state.document().layers() })
}

pub fn set_layer_visibility(
    state: &CanvasState,
    layer_name: &str,
    visible: bool,
) -> Result<Value, CommandError> {
    if state.document().set_layer_visibility(layer_name, visible) {
        Ok(json!({ "layer": layer_name, "visible": visible }))
    } else {
        Err(CommandError::LayerNotFound(layer_name.to_string()))
    }
}

/// Move an element to a layer, validating both sides against live state.
pub fn set_element_layer(
    state: &CanvasState,
    element_id: &str,
    layer_name: &str,
) -> Result<Value, CommandError> {
    let mut doc = state.document();
    if doc.get_element(element_id).is_none() {
        return Err(CommandError::ElementNotFound(element_id.to_string()));
    }
    if !doc.has_layer(layer_name) {
        return Err(CommandError::LayerNotFound(layer_name.to_string()));
    }
    doc.assign_element_layer(element_id, layer_name);
    Ok(json!({ "id": element_id, "layer": layer_name }))
}

fn parse_attrs(attrs: &str) -> Result<AttrMap, CommandError> {
    AttrMap::from_json(attrs).map_err(|e| CommandError::MalformedAttrs(e.to_string()))
}
