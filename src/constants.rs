//! Shared crate-wide constants.

/// Namespace prefixed to every container identifier. Also the default
/// prefix of the container element id.
pub const ID_NAMESPACE: &str = "modal-load-content-";

/// Space kept free between a clamped container and the viewport edges.
///
/// Units: layout units of the host document. A container whose natural size
/// does not fit the viewport is shrunk to `viewport - VIEWPORT_MARGIN` on that
/// axis and then centered, leaving half of the margin on each side.
pub const DEFAULT_VIEWPORT_MARGIN: u16 = 30;

/// Margin used by the terminal front-end, where one layout unit is one cell.
pub const TERMINAL_VIEWPORT_MARGIN: u16 = 4;

/// Seconds before an outstanding fetch is reported as timed out.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_OVERLAY_CLASS: &str = "modal-load-content-overlay";
pub const DEFAULT_CONTAINER_CLASS: &str = "modal-load-content-container";
pub const DEFAULT_CLOSE_BUTTON_CLASS: &str = "modal-load-content-close";
pub const DEFAULT_CLOSE_BUTTON_ICON: &str = "×";
pub const DEFAULT_CLOSE_BUTTON_TEXT: &str = "Close";
pub const DEFAULT_ERROR_CLASS: &str = "modal-load-content-error";
pub const DEFAULT_ERROR_TEXT: &str = "The requested page could not be loaded.";

/// Selector used to find triggers in a page when none is configured.
pub const DEFAULT_TRIGGER_SELECTOR: &str = "a[href]";

/// Lines retained by the in-app debug log before the oldest are dropped.
pub const DEBUG_LOG_MAX_LINES: usize = 2000;
