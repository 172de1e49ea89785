use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::components::Component;
use crate::trigger::{ModalRequest, Trigger};
use crate::ui::UiFrame;

/// The page underneath the modal: its title and the triggers found on it.
pub struct PageComponent {
    title: String,
    triggers: Vec<Trigger>,
    selected: usize,
    offset: usize,
    list_area: Rect,
}

impl PageComponent {
    pub fn new(title: impl Into<String>, triggers: Vec<Trigger>) -> Self {
        Self {
            title: title.into(),
            triggers,
            selected: 0,
            offset: 0,
            list_area: Rect::default(),
        }
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn requests(&self) -> Vec<ModalRequest> {
        self.triggers.iter().map(|t| t.request.clone()).collect()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_request(&self) -> Option<&ModalRequest> {
        self.triggers.get(self.selected).map(|t| &t.request)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.triggers.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = self
            .selected
            .saturating_add_signed(delta)
            .min(self.triggers.len() - 1);
    }

    /// Select the trigger drawn at (`column`, `row`), if any, and return it.
    pub fn select_at(&mut self, column: u16, row: u16) -> Option<&ModalRequest> {
        let area = self.list_area;
        if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
            return None;
        }
        let index = self.offset + (row - area.y) as usize;
        if index >= self.triggers.len() {
            return None;
        }
        self.selected = index;
        Some(&self.triggers[index].request)
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 || self.triggers.is_empty() {
            self.offset = 0;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }
}

impl Component for PageComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        let border = if focused {
            crate::theme::accent()
        } else {
            crate::theme::page_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.list_area = inner;
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let view = inner.height as usize;
        self.keep_selected_in_view(view);

        let items = self
            .triggers
            .iter()
            .skip(self.offset)
            .take(view)
            .map(|trigger| {
                ListItem::new(Line::from(vec![
                    Span::raw(trigger.label.clone()),
                    Span::styled(
                        format!("  {}", trigger.request.source_reference),
                        Style::default().fg(crate::theme::page_border()),
                    ),
                ]))
            })
            .collect::<Vec<_>>();

        let mut state = ListState::default();
        if !self.triggers.is_empty() {
            state.select(Some(self.selected - self.offset));
        }
        let list = List::new(items).highlight_style(crate::theme::page_selected());
        frame.render_stateful_widget(list, inner, &mut state);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::PageUp => {
                    self.move_selection(-5);
                    true
                }
                KeyCode::PageDown => {
                    self.move_selection(5);
                    true
                }
                KeyCode::Home => {
                    self.selected = 0;
                    true
                }
                KeyCode::End => {
                    self.selected = self.triggers.len().saturating_sub(1);
                    true
                }
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.move_selection(-1);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.move_selection(1);
                    true
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    self.select_at(mouse.column, mouse.row).is_some()
                }
                _ => false,
            },
            _ => false,
        }
    }
}
