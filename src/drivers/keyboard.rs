use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over platform differences in crossterm key reporting.
///
/// Release events are dropped everywhere. On Windows, repeats are dropped
/// too and a held Esc is reported once, so a single press never dismisses a
/// modal and then immediately acts on the page underneath.
#[derive(Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(mut key) = evt else {
            return Some(evt);
        };
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        if cfg!(windows) {
            match key.kind {
                KeyEventKind::Release => {
                    if key.code == KeyCode::Esc {
                        self.esc_down = false;
                    }
                    return None;
                }
                KeyEventKind::Repeat => return None,
                KeyEventKind::Press => {}
            }
            if key.code == KeyCode::Esc {
                if self.esc_down {
                    return None;
                }
                self.esc_down = true;
            } else {
                self.esc_down = false;
            }
        } else if key.kind == KeyEventKind::Release {
            return None;
        }
        Some(Event::Key(key))
    }
}
