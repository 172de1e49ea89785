//! Viewport-fit positioning of the open container.

use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl From<Rect> for Viewport {
    fn from(area: Rect) -> Self {
        Self::new(area.width, area.height)
    }
}

/// Unconstrained rendered size of a container's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalSize {
    pub width: u16,
    pub height: u16,
}

impl NaturalSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Size and offset applied to the open container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalLayout {
    pub width: u16,
    pub height: u16,
    pub top: u16,
    pub left: u16,
}

impl ModalLayout {
    /// The layout as a rectangle relative to a viewport origin.
    pub fn rect_in(&self, origin: Rect) -> Rect {
        Rect {
            x: origin.x.saturating_add(self.left),
            y: origin.y.saturating_add(self.top),
            width: self.width,
            height: self.height,
        }
    }
}

/// Clamp the natural size to the viewport minus `margin` and center it.
///
/// A dimension is clamped when it reaches the viewport or eats into the
/// margin, so the result always satisfies `width <= viewport.width - margin`
/// (saturating at zero).
pub fn compute_layout(viewport: Viewport, natural: NaturalSize, margin: u16) -> ModalLayout {
    let width = clamp_axis(natural.width, viewport.width, margin);
    let height = clamp_axis(natural.height, viewport.height, margin);
    ModalLayout {
        width,
        height,
        top: viewport.height.saturating_sub(height) / 2,
        left: viewport.width.saturating_sub(width) / 2,
    }
}

fn clamp_axis(natural: u16, available: u16, margin: u16) -> u16 {
    let max = available.saturating_sub(margin);
    if natural >= available || natural > max {
        max
    } else {
        natural
    }
}
