//! The host document the modal engine writes into.
//!
//! The engine never queries the document to learn its own state; the
//! registry and the lifecycle controller own that. The document only
//! materializes what they decide: container nodes, their content, their
//! transient flags and applied layout, and the shared overlay element.

mod memory;

pub use memory::{ContainerBody, ContainerNode, MemoryDocument, OverlayNode};

use crate::identifier::ModalId;
use crate::layout::{ModalLayout, NaturalSize, Viewport};

/// Handle of a container node owned by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The close affordance appended to a container once its load resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseAffordance {
    pub class: String,
    pub icon: String,
    pub tooltip: String,
}

impl CloseAffordance {
    /// Label as drawn in a text host.
    pub fn label(&self) -> String {
        format!("[{} {}]", self.icon, self.tooltip)
    }
}

pub trait Document {
    /// Current viewport size. Read fresh for every layout computation.
    fn viewport(&self) -> Viewport;

    /// Append a new, empty container to the mount point.
    fn mount_container(&mut self, id: &ModalId, class: &str) -> NodeId;

    /// Insert loaded HTML into a container.
    fn insert_content(&mut self, node: NodeId, html: &str);

    /// Insert the visible error indicator instead of content.
    fn insert_error(&mut self, node: NodeId, class: &str, text: &str);

    fn append_close(&mut self, node: NodeId, close: &CloseAffordance);

    /// Toggle the transient open / loaded-visible flags.
    fn set_open(&mut self, node: NodeId, open: bool);

    /// Size of the container's content with no layout applied.
    fn natural_size(&self, node: NodeId) -> NaturalSize;

    /// Apply a layout, or clear it with `None`.
    fn apply_layout(&mut self, node: NodeId, layout: Option<ModalLayout>);

    /// Create the shared overlay element if it does not exist yet.
    fn mount_overlay(&mut self, class: &str);

    fn set_overlay_visible(&mut self, visible: bool);
}
