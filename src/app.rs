//! The terminal front-end: a page of triggers with the modal engine on top.

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::components::{Component, DebugLogComponent, ModalHit, ModalView, PageComponent};
use crate::document::{Document, MemoryDocument};
use crate::event_loop::ControlFlow;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::Viewport;
use crate::lifecycle::{DismissSource, LifecycleController, ModalEvent, Phase};
use crate::ui::UiFrame;

const DEBUG_PANEL_HEIGHT: u16 = 8;

pub struct App {
    controller: LifecycleController<MemoryDocument>,
    page: PageComponent,
    modal: ModalView,
    debug_log: Option<DebugLogComponent>,
    bindings: KeyBindings,
}

impl App {
    pub fn new(controller: LifecycleController<MemoryDocument>, page: PageComponent) -> Self {
        Self {
            controller,
            page,
            modal: ModalView::new(),
            debug_log: None,
            bindings: KeyBindings::default(),
        }
    }

    pub fn with_debug_log(mut self, debug_log: DebugLogComponent) -> Self {
        self.debug_log = Some(debug_log);
        self
    }

    pub fn controller(&self) -> &LifecycleController<MemoryDocument> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LifecycleController<MemoryDocument> {
        &mut self.controller
    }

    pub fn page(&self) -> &PageComponent {
        &self.page
    }

    /// Apply finished loads. Called once per event-loop tick.
    pub fn tick(&mut self) -> usize {
        self.controller.pump()
    }

    /// Split the terminal into the page viewport and the optional debug panel.
    pub fn areas(&self, area: Rect) -> (Rect, Option<Rect>) {
        if self.debug_log.is_none() || area.height <= DEBUG_PANEL_HEIGHT * 2 {
            return (area, None);
        }
        let [main, log] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(DEBUG_PANEL_HEIGHT)])
                .areas(area);
        (main, Some(log))
    }

    /// Report the page viewport to the document, relaying out on change.
    pub fn sync_viewport(&mut self, main: Rect) {
        let viewport = Viewport::from(main);
        if self.controller.document().viewport() != viewport {
            self.controller.document_mut().set_viewport(viewport);
            self.controller.handle(ModalEvent::Resize);
        }
    }

    fn modal_open(&self) -> bool {
        self.controller.open_identifier().is_some()
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                ControlFlow::Continue
            }
            Event::Resize(width, height) => {
                let (main, _) = self.areas(Rect::new(0, 0, *width, *height));
                self.sync_viewport(main);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        let kb = &self.bindings;
        if self.modal_open() {
            if kb.matches(Action::Dismiss, key) {
                self.controller
                    .handle(ModalEvent::Dismiss(DismissSource::EscapeKey));
            } else if kb.matches(Action::Quit, key) {
                return ControlFlow::Quit;
            } else if kb.matches(Action::ScrollUp, key) {
                self.modal.scroll_by(-1);
            } else if kb.matches(Action::ScrollDown, key) {
                self.modal.scroll_by(1);
            } else if kb.matches(Action::ScrollPageUp, key) {
                self.modal.scroll_by(-self.modal.page());
            } else if kb.matches(Action::ScrollPageDown, key) {
                self.modal.scroll_by(self.modal.page());
            } else if kb.matches(Action::ScrollHome, key) {
                self.modal.scroll_home();
            } else if kb.matches(Action::ScrollEnd, key) {
                self.modal.scroll_end();
            }
            return ControlFlow::Continue;
        }

        if kb.matches(Action::Quit, key) {
            return ControlFlow::Quit;
        }
        if kb.matches(Action::Dismiss, key) {
            // Nothing is open; this only cancels a pending open.
            self.controller
                .handle(ModalEvent::Dismiss(DismissSource::EscapeKey));
        } else if kb.matches(Action::SelectUp, key) {
            self.page.move_selection(-1);
        } else if kb.matches(Action::SelectDown, key) {
            self.page.move_selection(1);
        } else if kb.matches(Action::Trigger, key) {
            if let Some(request) = self.page.selected_request().cloned() {
                self.controller.handle(ModalEvent::Trigger(request));
            }
        } else if !self.page.handle_event(&Event::Key(*key))
            && let Some(log) = self.debug_log.as_mut()
        {
            log.handle_event(&Event::Key(*key));
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if self.modal_open() {
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    match self.modal.hit(mouse.column, mouse.row) {
                        Some(ModalHit::CloseButton) => self
                            .controller
                            .handle(ModalEvent::Dismiss(DismissSource::CloseButton)),
                        Some(ModalHit::Overlay) => self
                            .controller
                            .handle(ModalEvent::Dismiss(DismissSource::Overlay)),
                        Some(ModalHit::Container) | None => {}
                    }
                }
                MouseEventKind::ScrollUp => self.modal.scroll_by(-3),
                MouseEventKind::ScrollDown => self.modal.scroll_by(3),
                _ => {}
            }
            return;
        }

        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(request) = self.page.select_at(mouse.column, mouse.row).cloned() {
                self.controller.handle(ModalEvent::Trigger(request));
            }
            return;
        }
        let event = Event::Mouse(*mouse);
        if !self.page.handle_event(&event)
            && let Some(log) = self.debug_log.as_mut()
        {
            log.handle_event(&event);
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let (main, log_area) = self.areas(frame.area());
        self.sync_viewport(main);

        let [page_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(main);
        let focused = !self.modal_open();
        self.page.render(frame, page_area, focused);
        let status = Paragraph::new(Line::from(self.status_line())).style(
            Style::default()
                .bg(crate::theme::status_bg())
                .fg(crate::theme::status_fg()),
        );
        frame.render_widget(status, status_area);

        self.modal.render(frame, main, self.controller.document());

        if let (Some(log), Some(area)) = (self.debug_log.as_mut(), log_area) {
            log.render(frame, area, false);
        }
    }

    fn status_line(&self) -> String {
        let hint = |action: Action| self.bindings.hint(action).unwrap_or_default();
        if self.modal_open() {
            return format!(
                " {} close  {}/{} scroll  {} quit",
                hint(Action::Dismiss),
                hint(Action::ScrollUp),
                hint(Action::ScrollDown),
                hint(Action::Quit),
            );
        }
        let loading = self
            .page
            .selected_request()
            .map(|r| self.controller.phase(&r.identifier()) == Phase::Opening)
            .unwrap_or(false);
        format!(
            " {} open  {}/{} select  {} quit{}",
            hint(Action::Trigger),
            hint(Action::SelectUp),
            hint(Action::SelectDown),
            hint(Action::Quit),
            if loading { "  loading..." } else { "" },
        )
    }
}
