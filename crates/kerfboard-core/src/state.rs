//! Shared canvas state handed to both the command and bridge entry points.

use crate::document::SvgDocument;
use crate::element::SvgElement;
use crate::layer::Layer;
use crate::screenshot::ScreenshotSlot;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The process-lifetime canvas: one document behind a mutex plus the
/// screenshot rendezvous slot.
///
/// Every document operation runs under a single lock acquisition, so
/// concurrent readers observe either the fully-old or fully-new state —
/// never a half-applied import. The screenshot slot is guarded separately
/// because its wait spans wall-clock time.
#[derive(Debug, Default)]
pub struct CanvasState {
    document: Mutex<SvgDocument>,
    screenshot: ScreenshotSlot,
}

/// What a poller sees: the whole document plus the pending-capture flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: u64,
    pub width: u32,
    pub height: u32,
    pub elements: Vec<SvgElement>,
    pub layers: Vec<Layer>,
    pub screenshot_requested: bool,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the document for a synchronous transaction.
    pub fn document(&self) -> MutexGuard<'_, SvgDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn screenshot(&self) -> &ScreenshotSlot {
        &self.screenshot
    }

    /// Capture a consistent read-only snapshot for the poll response.
    pub fn snapshot(&self) -> StateSnapshot {
        let doc = self.document();
        StateSnapshot {
            version: doc.version(),
            width: doc.width(),
            height: doc.height(),
            elements: doc.list_elements().cloned().collect(),
            layers: doc.layers().to_vec(),
            screenshot_requested: self.screenshot.is_requested(),
        }
    }
}
