use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Page
    SelectUp,
    SelectDown,
    Trigger,
    // Open modal
    Dismiss,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollHome,
    ScrollEnd,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::SelectUp => "Previous link",
            Action::SelectDown => "Next link",
            Action::Trigger => "Open",
            Action::Dismiss => "Close",
            Action::ScrollUp => "Scroll up",
            Action::ScrollDown => "Scroll down",
            Action::ScrollPageUp => "Scroll page up",
            Action::ScrollPageDown => "Scroll page down",
            Action::ScrollHome => "Scroll to top",
            Action::ScrollEnd => "Scroll to end",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) if self.mods.contains(KeyModifiers::CONTROL) => {
                c.to_ascii_uppercase().to_string()
            }
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            other => format!("{other:?}"),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Several actions share a key (Up selects on the page and scrolls in a
/// modal), so callers ask about one action at a time with [`matches`]
/// rather than mapping a key back to an action.
///
/// [`matches`]: KeyBindings::matches
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(Quit, KeyCombo::plain(KeyCode::Char('q')));
        kb.add(SelectUp, KeyCombo::plain(KeyCode::Up));
        kb.add(SelectUp, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(SelectDown, KeyCombo::plain(KeyCode::Down));
        kb.add(SelectDown, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(Trigger, KeyCombo::plain(KeyCode::Enter));
        kb.add(Dismiss, KeyCombo::plain(KeyCode::Esc));
        kb.add(Dismiss, KeyCombo::plain(KeyCode::Char('q')));
        kb.add(ScrollUp, KeyCombo::plain(KeyCode::Up));
        kb.add(ScrollUp, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(ScrollDown, KeyCombo::plain(KeyCode::Down));
        kb.add(ScrollDown, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(ScrollPageUp, KeyCombo::plain(KeyCode::PageUp));
        kb.add(ScrollPageDown, KeyCombo::plain(KeyCode::PageDown));
        kb.add(ScrollHome, KeyCombo::plain(KeyCode::Home));
        kb.add(ScrollEnd, KeyCombo::plain(KeyCode::End));
        kb
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    /// First combo for `action`, formatted for a hint line.
    pub fn hint(&self, action: Action) -> Option<String> {
        self.map
            .get(&action)
            .and_then(|list| list.first())
            .map(KeyCombo::display)
    }
}
