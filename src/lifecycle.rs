//! The modal state machine.
//!
//! Every identifier cycles `Closed -> Opening -> Open -> Closed`. At most one
//! container is open at a time and the controller holds it as a single
//! optional identifier; opening another container closes the previous one
//! first. A pending open (`Opening`) is likewise single: a newer trigger or a
//! dismiss supersedes it, and the superseded load still lands in its
//! container so a later trigger opens instantly.

use std::time::Duration;

use crate::config::ModalConfig;
use crate::document::Document;
use crate::error::ConfigError;
use crate::identifier::ModalId;
use crate::layout::{ModalLayout, compute_layout};
use crate::loader::{ContentLoader, LoadCompletion, LoadStart};
use crate::overlay::OverlayController;
use crate::registry::{ContainerRegistry, LoadState};
use crate::trigger::ModalRequest;

/// What asked for the open container to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissSource {
    EscapeKey,
    Overlay,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    Trigger(ModalRequest),
    Dismiss(DismissSource),
    /// The viewport changed. The document reports the new size.
    Resize,
    /// Media inside a container finished loading and may have changed its
    /// natural size.
    MediaLoaded(ModalId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
}

pub struct LifecycleController<D: Document> {
    config: ModalConfig,
    document: D,
    registry: ContainerRegistry,
    loader: ContentLoader,
    overlay: OverlayController,
    open: Option<ModalId>,
    opening: Option<ModalId>,
    fragment_scanned: bool,
}

impl<D: Document> LifecycleController<D> {
    pub fn new(config: ModalConfig, document: D, loader: ContentLoader) -> Result<Self, ConfigError> {
        config.validate()?;
        let loader = loader.configure(&config);
        let overlay = OverlayController::new(config.overlay_class.clone());
        Ok(Self {
            config,
            document,
            registry: ContainerRegistry::new(),
            loader,
            overlay,
            open: None,
            opening: None,
            fragment_scanned: false,
        })
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access for the host, e.g. to report a new viewport before
    /// sending [`ModalEvent::Resize`].
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    pub fn open_identifier(&self) -> Option<&ModalId> {
        self.open.as_ref()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.visible()
    }

    pub fn phase(&self, id: &ModalId) -> Phase {
        if self.open.as_ref() == Some(id) {
            Phase::Open
        } else if self.opening.as_ref() == Some(id) {
            Phase::Opening
        } else {
            Phase::Closed
        }
    }

    pub fn handle(&mut self, event: ModalEvent) {
        match event {
            ModalEvent::Trigger(request) => self.trigger(&request),
            ModalEvent::Dismiss(source) => {
                self.dismiss(source);
            }
            ModalEvent::Resize => {
                self.relayout();
            }
            ModalEvent::MediaLoaded(id) => {
                if self.open.as_ref() == Some(&id) {
                    self.relayout();
                }
            }
        }
    }

    pub fn trigger(&mut self, request: &ModalRequest) {
        let id = request.identifier();
        self.trace("trigger", &id);
        let (record, created) =
            self.registry
                .ensure_container(&mut self.document, &id, &self.config.container_class);
        let start = self.loader.load(record, request);
        if created {
            self.trace("container built", &id);
        }
        match start {
            LoadStart::Ready => {
                self.opening = None;
                self.open_container(&id);
            }
            LoadStart::InFlight => {
                // No second fetch, but the outstanding one now opens on arrival.
                self.trace("load already in flight", &id);
                self.opening = Some(id);
            }
            LoadStart::Started => {
                if self.config.debug_mode {
                    tracing::debug!(id = %id, reference = %request.source_reference, "load started");
                }
                self.opening = Some(id);
            }
        }
    }

    /// Close the open container, if any, and cancel a pending open. Returns
    /// whether a container was closed.
    pub fn dismiss(&mut self, source: DismissSource) -> bool {
        if let Some(pending) = self.opening.take() {
            self.trace("pending open cancelled", &pending);
        }
        let Some(id) = self.open.take() else {
            return false;
        };
        if self.config.debug_mode {
            tracing::debug!(id = %id, ?source, "close");
        }
        self.close_node(&id);
        self.overlay.hide(&mut self.document);
        true
    }

    /// Recompute and apply the open container's layout.
    pub fn relayout(&mut self) -> Option<ModalLayout> {
        let id = self.open.clone()?;
        let node = self.registry.get(&id)?.node();
        let viewport = self.document.viewport();
        let natural = self.document.natural_size(node);
        let layout = compute_layout(viewport, natural, self.config.viewport_margin);
        if self.config.debug_mode {
            tracing::debug!(
                id = %id,
                width = layout.width,
                height = layout.height,
                top = layout.top,
                left = layout.left,
                "layout"
            );
        }
        self.document.apply_layout(node, Some(layout));
        Some(layout)
    }

    /// Apply every completion that has arrived. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.loader.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Like [`pump`](Self::pump), but waits up to `timeout` for the first
    /// completion.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.loader.recv_timeout(timeout) {
            Some(completion) => {
                self.apply(completion);
                1 + self.pump()
            }
            None => 0,
        }
    }

    /// Open the first candidate whose fragment key equals `fragment`.
    ///
    /// Runs at most once per controller; later calls return `None` without
    /// looking at the candidates.
    pub fn open_from_fragment(&mut self, fragment: &str, candidates: &[ModalRequest]) -> Option<ModalId> {
        if self.fragment_scanned {
            return None;
        }
        self.fragment_scanned = true;
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return None;
        }
        let request = candidates.iter().find(|c| c.fragment_key() == fragment)?;
        let id = request.identifier();
        self.trace("fragment auto-open", &id);
        self.trigger(request);
        Some(id)
    }

    fn apply(&mut self, completion: LoadCompletion) {
        let id = completion.id.clone();
        if self.config.debug_mode {
            let url = completion.url.as_ref().map(|u| u.as_str()).unwrap_or("");
            tracing::debug!(id = %id, url, "load complete");
        }
        let Some(state) = self
            .loader
            .complete(&mut self.document, &mut self.registry, &self.config, completion)
        else {
            return;
        };
        if state == LoadState::Error {
            self.trace("load error", &id);
        }
        if self.opening.as_ref() == Some(&id) {
            self.opening = None;
            self.open_container(&id);
        }
    }

    fn open_container(&mut self, id: &ModalId) {
        if self.open.as_ref() != Some(id) {
            if let Some(previous) = self.open.take() {
                self.close_node(&previous);
            }
            let Some(node) = self.registry.get(id).map(|r| r.node()) else {
                return;
            };
            self.document.set_open(node, true);
            self.open = Some(id.clone());
            self.trace("open", id);
        }
        self.overlay.show(&mut self.document);
        self.relayout();
    }

    fn close_node(&mut self, id: &ModalId) {
        if let Some(node) = self.registry.get(id).map(|r| r.node()) {
            self.document.set_open(node, false);
            self.document.apply_layout(node, None);
        }
    }

    fn trace(&self, step: &str, id: &ModalId) {
        if self.config.debug_mode {
            tracing::debug!(id = %id, "{step}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::error::LoadError;
    use crate::layout::Viewport;
    use crate::loader::{Dispatch, Fetch};
    use std::sync::Arc;
    use url::Url;

    struct Echo;

    impl Fetch for Echo {
        fn get(&self, url: &Url) -> Result<String, LoadError> {
            Ok(format!("<p>{}</p>", url.path()))
        }
    }

    fn controller() -> LifecycleController<MemoryDocument> {
        let loader = ContentLoader::new(Arc::new(Echo), Dispatch::Inline)
            .with_base(Url::parse("https://example.org/").unwrap());
        LifecycleController::new(
            ModalConfig::for_terminal(),
            MemoryDocument::new(Viewport::new(80, 24)),
            loader,
        )
        .unwrap()
    }

    #[test]
    fn trigger_passes_through_opening() {
        let mut ctl = controller();
        let request = ModalRequest::new("/a", None);
        let id = request.identifier();
        ctl.trigger(&request);
        assert_eq!(ctl.phase(&id), Phase::Opening);
        assert!(!ctl.overlay_visible());
        assert_eq!(ctl.pump(), 1);
        assert_eq!(ctl.phase(&id), Phase::Open);
        assert!(ctl.overlay_visible());
    }

    #[test]
    fn dismiss_clears_flags_and_layout_but_keeps_content() {
        let mut ctl = controller();
        let request = ModalRequest::new("/a", None);
        ctl.trigger(&request);
        ctl.pump();
        assert!(ctl.dismiss(DismissSource::CloseButton));
        let node = ctl.document().find(request.identifier().as_str()).unwrap();
        assert!(!node.open && !node.loaded_visible);
        assert!(node.layout.is_none());
        assert!(node.has_content());
        assert!(!ctl.overlay_visible());
    }

    #[test]
    fn retrigger_after_dismissing_a_pending_open_still_opens() {
        let mut ctl = controller();
        let request = ModalRequest::new("/a", None);
        let id = request.identifier();
        ctl.trigger(&request);
        ctl.dismiss(DismissSource::EscapeKey);
        assert_eq!(ctl.phase(&id), Phase::Closed);

        ctl.trigger(&request);
        assert_eq!(ctl.phase(&id), Phase::Opening);
        assert_eq!(ctl.pump(), 1);
        assert_eq!(ctl.phase(&id), Phase::Open);
        assert_eq!(ctl.loader().issued(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ModalConfig {
            container_class: "two words".into(),
            ..ModalConfig::default()
        };
        let loader = ContentLoader::new(Arc::new(Echo), Dispatch::Inline);
        assert!(LifecycleController::new(config, MemoryDocument::default(), loader).is_err());
    }

    #[test]
    fn fragment_scan_ignores_leading_hash() {
        let mut ctl = controller();
        let candidates = [
            ModalRequest::new("/other", None),
            ModalRequest::new("https://example.org/news-item", None),
        ];
        let opened = ctl.open_from_fragment("#news-item", &candidates);
        assert_eq!(opened, Some(candidates[1].identifier()));
        assert_eq!(ctl.open_from_fragment("#other", &candidates), None);
    }
}
