//! Kerfboard Core Library
//!
//! Transport-agnostic document model and sync logic for the Kerfboard SVG
//! editor: the shared canvas document, its SVG markup codec, the command
//! interface, and the screenshot rendezvous.

pub mod commands;
pub mod document;
pub mod element;
pub mod layer;
pub mod markup;
pub mod screenshot;
pub mod state;

pub use commands::{Command, CommandError, SCREENSHOT_DEADLINE, dispatch};
pub use document::SvgDocument;
pub use element::{AttrMap, DEFAULT_LAYER, LAYER_ATTR, SHAPE_TAGS, SvgElement};
pub use layer::{Layer, default_layers};
pub use markup::{SELECTION_ID, SVG_NS};
pub use screenshot::ScreenshotSlot;
pub use state::{CanvasState, StateSnapshot};
