//! SVG markup codec: deterministic export and defensive bulk import.
//!
//! Export writes attribute values verbatim with plain quoting. Callers must
//! not put structurally significant characters (`"`, `<`, `&`) in values;
//! that is the documented contract of this best-effort sync channel, not
//! something the codec sanitizes.

use crate::document::SvgDocument;
use crate::element::{AttrMap, SvgElement, is_shape_tag};
use std::collections::HashMap;

/// Namespace written on the exported root element.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// ID the browser uses for its selection-highlight overlay. Never persisted.
pub const SELECTION_ID: &str = "_sel";

const ID_PREFIX: &str = "el-";

impl SvgDocument {
    /// Serialize the document as SVG markup.
    ///
    /// One line per element in z-order, `id` first and then attributes in
    /// insertion order; `text` elements carry their payload as content,
    /// everything else is self-closing.
    pub fn to_svg(&self) -> String {
        let mut parts = vec![format!(
            "<svg xmlns=\"{}\" width=\"{}\" height=\"{}\">",
            SVG_NS, self.width, self.height
        )];
        for el in self.list_elements() {
            let attr_str = el
                .attrs
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            if el.tag == "text" {
                parts.push(format!(
                    "  <text id=\"{}\" {}>{}</text>",
                    el.id, attr_str, el.text_content
                ));
            } else {
                parts.push(format!("  <{} id=\"{}\" {}/>", el.tag, el.id, attr_str));
            }
        }
        parts.push("</svg>".to_string());
        parts.join("\n")
    }

    /// Replace the element set from external SVG markup.
    ///
    /// This is a full replace, never a merge: anything not re-declared in
    /// the markup is dropped. Canvas size is taken from the root when its
    /// `width`/`height` attributes parse as numbers, otherwise left alone.
    /// Children outside the shape vocabulary and the browser's selection
    /// overlay are skipped; missing IDs are reassigned. The ID counter ends
    /// strictly above every suffix seen, and the version advances exactly
    /// once for the whole import.
    ///
    /// Structurally invalid markup makes the import a silent no-op. The
    /// browser pushes partial in-progress DOM states, so this channel is
    /// deliberately tolerant.
    pub fn apply_svg(&mut self, markup: &str) {
        let tree = match roxmltree::Document::parse(markup) {
            Ok(tree) => tree,
            Err(err) => {
                log::debug!("ignoring unparseable svg push: {}", err);
                return;
            }
        };
        let root = tree.root_element();

        if let Some(width) = plain_attribute(&root, "width").and_then(parse_dimension) {
            self.width = width;
        }
        if let Some(height) = plain_attribute(&root, "height").and_then(parse_dimension) {
            self.height = height;
        }

        self.elements = HashMap::new();
        self.order = Vec::new();

        let mut max_id: u64 = 0;
        for child in root.children().filter(|n| n.is_element()) {
            // Local name: namespace qualifiers from the live DOM are noise.
            let tag = child.tag_name().name();
            if !is_shape_tag(tag) {
                continue;
            }

            let mut id = plain_attribute(&child, "id").unwrap_or("").to_string();
            if id == SELECTION_ID {
                continue;
            }
            if let Some(n) = id.strip_prefix(ID_PREFIX).and_then(|s| s.parse().ok()) {
                max_id = max_id.max(n);
            }

            let attrs: AttrMap = child
                .attributes()
                .filter(|a| !(a.namespace().is_none() && a.name() == "id"))
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect();

            let text_content = if tag == "text" {
                child.text().unwrap_or("").to_string()
            } else {
                String::new()
            };

            if id.is_empty() {
                max_id += 1;
                id = format!("{}{}", ID_PREFIX, max_id);
            }

            let element = SvgElement {
                id: id.clone(),
                tag: tag.to_string(),
                attrs,
                text_content,
            };
            if self.elements.insert(id.clone(), element).is_none() {
                self.order.push(id);
            }
        }

        self.next_id = max_id + 1;
        self.version += 1;
    }
}

/// Attribute lookup ignoring namespaced variants, matching how the live DOM
/// is read.
fn plain_attribute<'a>(node: &roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.namespace().is_none() && a.name() == name)
        .map(|a| a.value())
}

/// Dimensions arrive as CSS-ish numbers ("800", "800.5"); truncate to whole
/// millimetres, reject anything non-numeric.
fn parse_dimension(value: &str) -> Option<u32> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u32)
}
