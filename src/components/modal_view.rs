use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::document::{ContainerNode, MemoryDocument};
use crate::ui::{UiFrame, safe_set_string};

/// Where a click landed relative to the open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    CloseButton,
    Container,
    Overlay,
}

/// Draws the open container of a [`MemoryDocument`] over the page.
///
/// The view holds no modal state of its own beyond the scroll position and
/// the rectangles it last drew, which mouse hit-testing reads back.
#[derive(Debug, Default)]
pub struct ModalView {
    scroll: usize,
    shown: Option<String>,
    container: Option<Rect>,
    close: Option<Rect>,
    total_lines: usize,
    view_lines: usize,
}

impl ModalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn container_rect(&self) -> Option<Rect> {
        self.container
    }

    pub fn close_rect(&self) -> Option<Rect> {
        self.close
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.total_lines.saturating_sub(self.view_lines);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn page(&self) -> isize {
        self.view_lines.max(1) as isize
    }

    pub fn scroll_home(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_end(&mut self) {
        self.scroll = self.total_lines.saturating_sub(self.view_lines);
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<ModalHit> {
        let container = self.container?;
        let at = Position::new(column, row);
        if self.close.is_some_and(|close| close.contains(at)) {
            Some(ModalHit::CloseButton)
        } else if container.contains(at) {
            Some(ModalHit::Container)
        } else {
            Some(ModalHit::Overlay)
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, document: &MemoryDocument) {
        self.container = None;
        self.close = None;
        if document.overlay().is_some_and(|o| o.visible) {
            frame.dim(area);
        }
        let Some(node) = document.containers().iter().find(|c| c.open) else {
            self.shown = None;
            return;
        };
        let Some(layout) = node.layout else {
            return;
        };
        if self.shown.as_deref() != Some(node.element_id.as_str()) {
            self.shown = Some(node.element_id.clone());
            self.scroll = 0;
        }

        let rect = layout.rect_in(area).intersection(area);
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(crate::theme::modal_border()))
            .style(
                Style::default()
                    .bg(crate::theme::modal_bg())
                    .fg(crate::theme::modal_fg()),
            );
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        self.container = Some(rect);

        self.total_lines = node.lines().len();
        self.view_lines = inner.height as usize;
        self.scroll = self.scroll.min(self.total_lines.saturating_sub(self.view_lines));
        frame.render_widget(self.body(node), inner);

        if let Some(close) = &node.close {
            self.draw_close(frame, rect, &close.label());
        }
    }

    fn body(&self, node: &ContainerNode) -> Paragraph<'static> {
        let mut paragraph = Paragraph::new(node.lines().to_vec())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll.min(u16::MAX as usize) as u16, 0));
        if node.has_error() {
            paragraph = paragraph.style(Style::default().fg(crate::theme::error_fg()));
        }
        paragraph
    }

    /// The close affordance sits in the top border, right-aligned.
    fn draw_close(&mut self, frame: &mut UiFrame<'_>, rect: Rect, label: &str) {
        let width = label.width() as u16;
        let x = rect
            .right()
            .saturating_sub(width.saturating_add(2))
            .max(rect.x.saturating_add(1));
        safe_set_string(
            frame.buffer_mut(),
            rect,
            x,
            rect.y,
            label,
            crate::theme::close_button(),
        );
        let visible = width.min(rect.right().saturating_sub(x));
        if visible > 0 {
            self.close = Some(Rect::new(x, rect.y, visible, 1));
        }
    }
}
