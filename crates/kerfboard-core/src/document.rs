//! The shared SVG document: elements, z-order, layers, and versioning.

use crate::element::{AttrMap, LAYER_ATTR, SvgElement};
use crate::layer::{Layer, default_layers};
use std::collections::HashMap;

/// Default canvas width in millimetres.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default canvas height in millimetres.
pub const DEFAULT_HEIGHT: u32 = 600;

/// The single source of truth for the drawing.
///
/// Holds the element map plus a separate z-order sequence (map iteration
/// order is meaningless for rendering), the layer registry, canvas size in
/// millimetres, and a version counter that advances by exactly one on every
/// successful mutation. Pollers compare versions to detect change.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) elements: HashMap<String, SvgElement>,
    pub(crate) order: Vec<String>,
    pub(crate) next_id: u64,
    pub(crate) version: u64,
    pub(crate) layers: Vec<Layer>,
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgDocument {
    /// Create an empty document with the default canvas and layers.
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            elements: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            version: 0,
            layers: default_layers(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current mutation generation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn allocate_id(&mut self) -> String {
        let id = format!("el-{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an element with a freshly allocated ID. Always succeeds.
    pub fn add_element(&mut self, tag: &str, attrs: AttrMap, text_content: &str) -> &SvgElement {
        let id = self.allocate_id();
        let element = SvgElement {
            id: id.clone(),
            tag: tag.to_string(),
            attrs,
            text_content: text_content.to_string(),
        };
        self.order.push(id.clone());
        self.bump();
        self.elements.entry(id).or_insert(element)
    }

    /// Merge attributes into an existing element.
    ///
    /// Unlisted keys are left untouched; conflicting keys are overwritten.
    /// Returns `None` without mutating anything if the ID is unknown.
    pub fn update_element(&mut self, element_id: &str, attrs: &AttrMap) -> Option<&SvgElement> {
        let element = self.elements.get_mut(element_id)?;
        element.attrs.merge(attrs);
        self.bump();
        self.elements.get(element_id)
    }

    /// Remove an element from both the map and the z-order.
    ///
    /// Returns whether the element existed; the version only advances when
    /// it did.
    pub fn remove_element(&mut self, element_id: &str) -> bool {
        if self.elements.remove(element_id).is_none() {
            return false;
        }
        self.order.retain(|id| id != element_id);
        self.bump();
        true
    }

    pub fn get_element(&self, element_id: &str) -> Option<&SvgElement> {
        self.elements.get(element_id)
    }

    /// Elements in z-order (back to front), skipping any dangling order
    /// entries.
    pub fn list_elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Set canvas dimensions in millimetres. Always succeeds.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.bump();
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    /// Show or hide a layer. Unknown names return false with no version
    /// bump.
    pub fn set_layer_visibility(&mut self, name: &str, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                layer.visible = visible;
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Write an element's reserved layer attribute.
    ///
    /// Layer-name validation is the caller's job (the command layer checks
    /// the registry); this only fails when the element is unknown.
    pub fn assign_element_layer(&mut self, element_id: &str, layer_name: &str) -> bool {
        match self.elements.get_mut(element_id) {
            Some(element) => {
                element.attrs.insert(LAYER_ATTR, layer_name);
                self.bump();
                true
            }
            None => false,
        }
    }
}
