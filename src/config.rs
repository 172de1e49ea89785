//! Typed configuration for the modal engine.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides. A file is a layer: it is applied on top of a base
//! configuration (the library defaults, or the terminal preset) and the
//! result is validated once, when it is loaded or handed to the lifecycle
//! controller.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfig {
    /// Emit a diagnostic trace of each lifecycle step.
    pub debug_mode: bool,
    pub overlay_class: String,
    pub container_class: String,
    pub close_button_class: String,
    /// Label of the close affordance.
    pub close_button_icon: String,
    /// Tooltip of the close affordance.
    pub close_button_text: String,
    pub error_class: String,
    pub error_text: String,
    pub viewport_margin: u16,
    pub request_timeout_secs: u64,
    /// Appended to every fetch URL, e.g. `modal=1`.
    pub query_suffix: Option<String>,
    /// Fragment hint used for triggers that do not name one.
    pub default_target: Option<String>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            overlay_class: DEFAULT_OVERLAY_CLASS.to_string(),
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            close_button_class: DEFAULT_CLOSE_BUTTON_CLASS.to_string(),
            close_button_icon: DEFAULT_CLOSE_BUTTON_ICON.to_string(),
            close_button_text: DEFAULT_CLOSE_BUTTON_TEXT.to_string(),
            error_class: DEFAULT_ERROR_CLASS.to_string(),
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            viewport_margin: DEFAULT_VIEWPORT_MARGIN,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            query_suffix: None,
            default_target: None,
        }
    }
}

impl ModalConfig {
    /// Defaults tuned for a terminal host, where a layout unit is one cell.
    pub fn for_terminal() -> Self {
        Self {
            viewport_margin: TERMINAL_VIEWPORT_MARGIN,
            ..Self::default()
        }
    }

    /// Library defaults overridden by `raw`.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::default().with_toml_str(raw)
    }

    /// Library defaults overridden by the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::default().with_file(path)
    }

    /// Apply the keys present in `raw` on top of `self`.
    pub fn with_toml_str(self, raw: &str) -> Result<Self, ConfigError> {
        let layer: ConfigLayer = toml::from_str(raw)?;
        let config = layer.apply(self);
        config.validate()?;
        Ok(config)
    }

    /// Apply the keys present in the file at `path` on top of `self`.
    pub fn with_file(self, path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.with_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let classes = [
            ("overlay_class", &self.overlay_class),
            ("container_class", &self.container_class),
            ("close_button_class", &self.close_button_class),
            ("error_class", &self.error_class),
        ];
        for (name, value) in classes {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a single non-empty class name, got {value:?}"
                )));
            }
        }
        if self.error_text.trim().is_empty() {
            return Err(ConfigError::Invalid("error_text must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// The keys a config file may set. Absent keys leave the base untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(alias = "debugMode")]
    debug_mode: Option<bool>,
    #[serde(alias = "overlayClass")]
    overlay_class: Option<String>,
    #[serde(alias = "containerClass")]
    container_class: Option<String>,
    #[serde(alias = "closeButtonClass")]
    close_button_class: Option<String>,
    #[serde(alias = "closeButtonIcon")]
    close_button_icon: Option<String>,
    #[serde(alias = "closeButtonText")]
    close_button_text: Option<String>,
    #[serde(alias = "errorClass")]
    error_class: Option<String>,
    #[serde(alias = "errorText")]
    error_text: Option<String>,
    viewport_margin: Option<u16>,
    request_timeout_secs: Option<u64>,
    query_suffix: Option<String>,
    default_target: Option<String>,
}

impl ConfigLayer {
    fn apply(self, base: ModalConfig) -> ModalConfig {
        ModalConfig {
            debug_mode: self.debug_mode.unwrap_or(base.debug_mode),
            overlay_class: self.overlay_class.unwrap_or(base.overlay_class),
            container_class: self.container_class.unwrap_or(base.container_class),
            close_button_class: self.close_button_class.unwrap_or(base.close_button_class),
            close_button_icon: self.close_button_icon.unwrap_or(base.close_button_icon),
            close_button_text: self.close_button_text.unwrap_or(base.close_button_text),
            error_class: self.error_class.unwrap_or(base.error_class),
            error_text: self.error_text.unwrap_or(base.error_text),
            viewport_margin: self.viewport_margin.unwrap_or(base.viewport_margin),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(base.request_timeout_secs),
            query_suffix: self.query_suffix.or(base.query_suffix),
            default_target: self.default_target.or(base.default_target),
        }
    }
}
