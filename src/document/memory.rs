use ratatui::text::Line;

use super::{CloseAffordance, Document, NodeId};
use crate::html_text::html_to_lines;
use crate::identifier::ModalId;
use crate::layout::{ModalLayout, NaturalSize, Viewport};

/// What a container currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContainerBody {
    #[default]
    Empty,
    Content(String),
    Error {
        class: String,
        text: String,
    },
}

#[derive(Debug, Clone)]
pub struct ContainerNode {
    /// Element id: the container identifier.
    pub element_id: String,
    pub class: String,
    pub body: ContainerBody,
    pub close: Option<CloseAffordance>,
    pub open: bool,
    pub loaded_visible: bool,
    pub layout: Option<ModalLayout>,
    lines: Vec<Line<'static>>,
}

impl ContainerNode {
    fn new(id: &ModalId, class: &str) -> Self {
        Self {
            element_id: id.as_str().to_string(),
            class: class.to_string(),
            body: ContainerBody::Empty,
            close: None,
            open: false,
            loaded_visible: false,
            layout: None,
            lines: Vec::new(),
        }
    }

    /// Rendered lines of the body.
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn has_error(&self) -> bool {
        matches!(self.body, ContainerBody::Error { .. })
    }

    pub fn has_content(&self) -> bool {
        matches!(self.body, ContainerBody::Content(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayNode {
    pub class: String,
    pub visible: bool,
}

/// Document held in memory and drawn by the terminal front-end.
///
/// One layout unit is one terminal cell. A container's natural size is its
/// longest unwrapped line and its line count, plus one cell of border on
/// every side.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    viewport: Viewport,
    containers: Vec<ContainerNode>,
    overlay: Option<OverlayNode>,
}

impl MemoryDocument {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn container(&self, node: NodeId) -> Option<&ContainerNode> {
        self.containers.get(node.0)
    }

    pub fn containers(&self) -> &[ContainerNode] {
        &self.containers
    }

    /// Look a container up by its element id.
    pub fn find(&self, element_id: &str) -> Option<&ContainerNode> {
        self.containers.iter().find(|c| c.element_id == element_id)
    }

    pub fn overlay(&self) -> Option<&OverlayNode> {
        self.overlay.as_ref()
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut ContainerNode> {
        self.containers.get_mut(node.0)
    }
}

impl Document for MemoryDocument {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn mount_container(&mut self, id: &ModalId, class: &str) -> NodeId {
        self.containers.push(ContainerNode::new(id, class));
        NodeId(self.containers.len() - 1)
    }

    fn insert_content(&mut self, node: NodeId, html: &str) {
        if let Some(c) = self.node_mut(node) {
            c.lines = html_to_lines(html);
            c.body = ContainerBody::Content(html.to_string());
        }
    }

    fn insert_error(&mut self, node: NodeId, class: &str, text: &str) {
        if let Some(c) = self.node_mut(node) {
            c.lines = vec![Line::from(text.to_string())];
            c.body = ContainerBody::Error {
                class: class.to_string(),
                text: text.to_string(),
            };
        }
    }

    fn append_close(&mut self, node: NodeId, close: &CloseAffordance) {
        if let Some(c) = self.node_mut(node) {
            c.close = Some(close.clone());
        }
    }

    fn set_open(&mut self, node: NodeId, open: bool) {
        if let Some(c) = self.node_mut(node) {
            c.open = open;
            c.loaded_visible = open;
        }
    }

    fn natural_size(&self, node: NodeId) -> NaturalSize {
        let Some(c) = self.container(node) else {
            return NaturalSize::default();
        };
        let text_width = c.lines.iter().map(Line::width).max().unwrap_or(0);
        let close_width = c
            .close
            .as_ref()
            .map(|close| close.label().chars().count() + 2)
            .unwrap_or(0);
        let width = text_width.max(close_width).saturating_add(2);
        let height = c.lines.len().saturating_add(2);
        NaturalSize::new(
            width.min(u16::MAX as usize) as u16,
            height.min(u16::MAX as usize) as u16,
        )
    }

    fn apply_layout(&mut self, node: NodeId, layout: Option<ModalLayout>) {
        if let Some(c) = self.node_mut(node) {
            c.layout = layout;
        }
    }

    fn mount_overlay(&mut self, class: &str) {
        if self.overlay.is_none() {
            self.overlay = Some(OverlayNode {
                class: class.to_string(),
                visible: false,
            });
        }
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.visible = visible;
        }
    }
}
