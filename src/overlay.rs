//! The single dimming backdrop shared by all containers.

use crate::document::Document;

#[derive(Debug, Clone)]
pub struct OverlayController {
    class: String,
    visible: bool,
}

impl OverlayController {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            visible: false,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show the backdrop, mounting it on first use. Returns whether the
    /// visibility changed.
    pub fn show<D: Document>(&mut self, document: &mut D) -> bool {
        if self.visible {
            return false;
        }
        document.mount_overlay(&self.class);
        document.set_overlay_visible(true);
        self.visible = true;
        true
    }

    /// Hide the backdrop. Safe to call when it is already hidden.
    pub fn hide<D: Document>(&mut self, document: &mut D) -> bool {
        if !self.visible {
            return false;
        }
        document.set_overlay_visible(false);
        self.visible = false;
        true
    }
}
