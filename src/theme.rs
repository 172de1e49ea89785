use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors. Components call these helpers rather than
// naming colors inline.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

pub fn accent_alt() -> Color {
    Color::Rgb(ACCENT_ALT_RGB.0, ACCENT_ALT_RGB.1, ACCENT_ALT_RGB.2)
}

// Page / trigger list
pub fn page_border() -> Color {
    Color::DarkGray
}
pub fn page_selected() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

// Status line
pub fn status_bg() -> Color {
    Color::DarkGray
}
pub fn status_fg() -> Color {
    Color::White
}

// Modal container
pub fn modal_bg() -> Color {
    Color::Black
}
pub fn modal_fg() -> Color {
    Color::White
}
pub fn modal_border() -> Color {
    accent()
}
pub fn close_button() -> Style {
    Style::default().fg(Color::Black).bg(accent_alt())
}
pub fn error_fg() -> Color {
    Color::Red
}

// Debug log highlight
pub fn debug_highlight() -> Color {
    accent_alt()
}
