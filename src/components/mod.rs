use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod debug_log;
pub mod modal_view;
pub mod page;

pub use debug_log::DebugLogComponent;
pub use modal_view::{ModalHit, ModalView};
pub use page::PageComponent;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}
