//! Bounded in-memory log that backs the debug panel.
//!
//! The tracing subscriber writes here through [`DebugLogWriter`] once a
//! handle is registered with [`set_global_debug_log`]; while the terminal is
//! in the alternate screen, stderr is not visible.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::components::Component;
use crate::constants::DEBUG_LOG_MAX_LINES;
use crate::ui::UiFrame;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();

pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct DebugLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl DebugLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<DebugLogBuffer>>,
}

impl DebugLogHandle {
    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter::new(self.clone())
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|buffer| buffer.lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// `io::Write` adapter that splits formatted output into log lines.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn push_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.handle.push(line.to_string());
            }
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).to_string();
            self.pending.clear();
            self.handle.push(rest);
        }
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Bottom panel showing the tail of the log. Scrolling up pins the view until
/// it is scrolled back to the bottom.
#[derive(Debug)]
pub struct DebugLogComponent {
    handle: DebugLogHandle,
    offset: usize,
    follow_tail: bool,
    last_total: usize,
    last_view: usize,
}

impl DebugLogComponent {
    pub fn new(max_lines: usize) -> (Self, DebugLogHandle) {
        let handle = DebugLogHandle {
            inner: Arc::new(Mutex::new(DebugLogBuffer::new(max_lines))),
        };
        (
            Self {
                handle: handle.clone(),
                offset: 0,
                follow_tail: true,
                last_total: 0,
                last_view: 0,
            },
            handle,
        )
    }

    pub fn new_default() -> (Self, DebugLogHandle) {
        Self::new(DEBUG_LOG_MAX_LINES)
    }

    fn max_offset(&self) -> usize {
        self.last_total.saturating_sub(self.last_view)
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.max_offset();
        self.offset = self.offset.saturating_add_signed(delta).min(max);
        self.follow_tail = self.offset >= max;
    }
}

impl Component for DebugLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);
        let block = Block::default().borders(Borders::TOP).title("debug log");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = self.handle.snapshot();
        self.last_total = lines.len();
        self.last_view = inner.height as usize;
        if self.follow_tail {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }

        let text = Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>());
        let scroll_top = self.offset.min(u16::MAX as usize) as u16;
        let mut paragraph = Paragraph::new(text).scroll((scroll_top, 0));
        if focused {
            paragraph = paragraph.style(Style::default().fg(crate::theme::debug_highlight()));
        }
        frame.render_widget(paragraph, inner);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::PageUp => {
                    self.scroll_by(-(self.last_view.max(1) as isize));
                    true
                }
                KeyCode::PageDown => {
                    self.scroll_by(self.last_view.max(1) as isize);
                    true
                }
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll_by(-3);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.scroll_by(3);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    #[test]
    fn buffer_is_capped() {
        let (_comp, handle) = DebugLogComponent::new(3);
        for line in ["one", "two", "three", "four"] {
            handle.push(line);
        }
        assert_eq!(handle.snapshot(), vec!["two", "three", "four"]);
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial() {
        let (_comp, handle) = DebugLogComponent::new(10);
        let mut writer = handle.writer();
        writer.write_all(b"first line\nsecond line\npartial").unwrap();
        assert_eq!(handle.snapshot(), vec!["first line", "second line"]);
        writer.flush().unwrap();
        assert_eq!(handle.snapshot().last().map(String::as_str), Some("partial"));
    }

    #[test]
    fn page_up_unpins_the_tail() {
        let (mut comp, handle) = DebugLogComponent::new(50);
        for i in 0..20 {
            handle.push(format!("line{i}"));
        }
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        comp.render(&mut UiFrame::from_parts(area, &mut buf), area, false);
        assert_eq!(comp.offset, 15);

        let page_up = Event::Key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE));
        assert!(comp.handle_event(&page_up));
        assert_eq!(comp.offset, 10);
        assert!(!comp.follow_tail);

        handle.push("late");
        comp.render(&mut UiFrame::from_parts(area, &mut buf), area, false);
        assert_eq!(comp.offset, 10);
    }
}
