//! Load remote HTML fragments into modal containers and manage their
//! open/close lifecycle, with a terminal front-end built on ratatui.
//!
//! The engine (`identifier` through `lifecycle`) is host-agnostic: it talks
//! to the page through the [`document::Document`] trait. The remaining
//! modules draw a [`document::MemoryDocument`] in the terminal.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod constants;
pub mod document;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod fragment;
pub mod html_text;
pub mod identifier;
pub mod keybindings;
pub mod layout;
pub mod lifecycle;
pub mod loader;
pub mod overlay;
pub mod registry;
pub mod theme;
pub mod tracing_sub;
pub mod trigger;
pub mod ui;

pub use config::ModalConfig;
pub use document::{Document, MemoryDocument};
pub use error::{ConfigError, LoadError};
pub use identifier::{ModalId, resolve};
pub use lifecycle::{DismissSource, LifecycleController, ModalEvent, Phase};
pub use loader::{ContentLoader, Dispatch, Fetch, WebFetcher};
pub use trigger::ModalRequest;
