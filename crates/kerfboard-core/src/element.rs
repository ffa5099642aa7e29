//! Drawing elements and their attribute maps.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Tags a shape element may carry. Anything else is dropped on import.
pub const SHAPE_TAGS: [&str; 8] = [
    "line", "rect", "circle", "ellipse", "text", "path", "polygon", "polyline",
];

/// Reserved attribute key holding an element's layer assignment.
pub const LAYER_ATTR: &str = "data-layer";

/// Layer assigned to new elements when none is given.
pub const DEFAULT_LAYER: &str = "CUT_OUTSIDE";

/// Check a tag against the shape vocabulary.
pub fn is_shape_tag(tag: &str) -> bool {
    SHAPE_TAGS.contains(&tag)
}

/// String-keyed attribute map preserving insertion order.
///
/// SVG attribute vocabulary is open-ended per tag, so attributes are kept as
/// an ordered list of string pairs rather than a fixed struct. Writing an
/// existing key replaces its value in place; new keys append. Serializes as
/// a JSON object whose key order matches insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap(Vec<(String, String)>);

impl AttrMap {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Parse an attribute map from JSON text (an object of string values).
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Set a key, replacing in place if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Merge another map into this one, overwriting on key conflicts.
    pub fn merge(&mut self, other: &AttrMap) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut attrs = AttrMap::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for AttrMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct AttrMapVisitor;

impl<'de> Visitor<'de> for AttrMapVisitor {
    type Value = AttrMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut attrs = AttrMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            attrs.insert(key, value);
        }
        Ok(attrs)
    }
}

impl<'de> Deserialize<'de> for AttrMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttrMapVisitor)
    }
}

/// One drawable element: an SVG shape or text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgElement {
    /// Document-unique ID of the form `el-<N>`.
    pub id: String,
    /// SVG tag name (see [`SHAPE_TAGS`]).
    pub tag: String,
    /// Attributes in insertion order. The layer assignment lives here
    /// under [`LAYER_ATTR`], not in a separate field.
    pub attrs: AttrMap,
    /// Text payload, meaningful only for `text` elements.
    #[serde(default)]
    pub text_content: String,
}

impl SvgElement {
    /// The element's layer name, falling back to the default layer.
    pub fn layer(&self) -> &str {
        self.attrs.get(LAYER_ATTR).unwrap_or(DEFAULT_LAYER)
    }
}
