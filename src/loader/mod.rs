//! One-shot asynchronous content loads.
//!
//! `ContentLoader::load` issues at most one fetch per container. The fetch
//! runs off the event-loop thread and its result comes back as a
//! [`LoadCompletion`] on a channel; completions are only applied to the
//! document and registry when the owner drains them on the event-loop thread,
//! so every state transition still happens on a single thread.

pub mod http;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use url::Url;

use crate::config::ModalConfig;
use crate::document::{CloseAffordance, Document};
use crate::error::LoadError;
use crate::fragment;
use crate::identifier::ModalId;
use crate::registry::{ContainerRecord, ContainerRegistry, LoadState};
use crate::trigger::ModalRequest;

pub use http::WebFetcher;

/// Blocking retrieval of a remote document.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &Url) -> Result<String, LoadError>;
}

/// Where fetches execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One short-lived worker thread per fetch.
    Thread,
    /// On the calling thread; the completion is still only queued.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(String),
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCompletion {
    pub id: ModalId,
    pub url: Option<Url>,
    pub outcome: LoadOutcome,
}

/// Result of asking for a container's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStart {
    /// Already resolved; nothing was requested.
    Ready,
    /// A load for this container is already outstanding.
    InFlight,
    /// A new fetch was issued.
    Started,
}

pub struct ContentLoader {
    fetcher: Arc<dyn Fetch>,
    dispatch: Dispatch,
    base: Option<Url>,
    query_suffix: Option<String>,
    default_target: Option<String>,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    issued: usize,
}

impl ContentLoader {
    pub fn new(fetcher: Arc<dyn Fetch>, dispatch: Dispatch) -> Self {
        let (tx, rx) = unbounded();
        Self {
            fetcher,
            dispatch,
            base: None,
            query_suffix: None,
            default_target: None,
            tx,
            rx,
            issued: 0,
        }
    }

    /// Base URL that relative references are resolved against.
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    /// Take the query suffix and default target from `config`.
    pub fn configure(mut self, config: &ModalConfig) -> Self {
        self.query_suffix = config.query_suffix.clone().filter(|s| !s.is_empty());
        self.default_target = config.default_target.clone().filter(|s| !s.is_empty());
        self
    }

    /// Number of fetches issued so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Start loading `record` unless it is loading or already resolved.
    pub fn load(&mut self, record: &mut ContainerRecord, request: &ModalRequest) -> LoadStart {
        if record.state().is_resolved() {
            return LoadStart::Ready;
        }
        if !record.mark_loading() {
            return LoadStart::InFlight;
        }
        let id = record.identifier().clone();
        let target = request
            .target_fragment_hint
            .clone()
            .or_else(|| self.default_target.clone());
        let url = match self.request_url(&request.source_reference) {
            Ok(url) => url,
            Err(err) => {
                let _ = self.tx.send(LoadCompletion {
                    id,
                    url: None,
                    outcome: LoadOutcome::Failed(err),
                });
                return LoadStart::Started;
            }
        };
        self.issued += 1;
        let job = FetchJob {
            id,
            url,
            target,
            fetcher: Arc::clone(&self.fetcher),
            tx: self.tx.clone(),
        };
        match self.dispatch {
            Dispatch::Inline => job.run(),
            Dispatch::Thread => {
                let spawned = thread::Builder::new()
                    .name("modal-fetch".into())
                    .spawn(move || job.run());
                if let Err(err) = spawned {
                    tracing::warn!(%err, "failed to spawn fetch worker");
                    let _ = self.tx.send(LoadCompletion {
                        id: record.identifier().clone(),
                        url: None,
                        outcome: LoadOutcome::Failed(LoadError::Transport(err.to_string())),
                    });
                }
            }
        }
        LoadStart::Started
    }

    /// Resolve `reference` against the base URL and append the query suffix.
    pub fn request_url(&self, reference: &str) -> Result<Url, LoadError> {
        let parsed = match &self.base {
            Some(base) => base.join(reference),
            None => Url::parse(reference),
        };
        let mut url = parsed.map_err(|_| LoadError::InvalidUrl(reference.to_string()))?;
        url.set_fragment(None);
        if let Some(suffix) = &self.query_suffix {
            let query = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{suffix}"),
                _ => suffix.clone(),
            };
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    pub fn try_recv(&self) -> Option<LoadCompletion> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadCompletion> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Write a completion into its container and resolve the record.
    ///
    /// Content gets the close affordance appended; failures get the error
    /// element and the close affordance. Returns the record's new state, or
    /// `None` if the completion did not apply.
    pub fn complete<D: Document>(
        &self,
        document: &mut D,
        registry: &mut ContainerRegistry,
        config: &ModalConfig,
        completion: LoadCompletion,
    ) -> Option<LoadState> {
        let record = registry.get_mut(&completion.id)?;
        if record.state() != LoadState::Loading {
            return None;
        }
        let node = record.node();
        match completion.outcome {
            LoadOutcome::Loaded(html) => {
                document.insert_content(node, &html);
                record.mark_loaded();
            }
            LoadOutcome::Failed(err) => {
                tracing::warn!(id = %completion.id, %err, "modal content failed to load");
                document.insert_error(node, &config.error_class, &config.error_text);
                record.mark_error();
            }
        }
        document.append_close(
            node,
            &CloseAffordance {
                class: config.close_button_class.clone(),
                icon: config.close_button_icon.clone(),
                tooltip: config.close_button_text.clone(),
            },
        );
        Some(record.state())
    }
}

struct FetchJob {
    id: ModalId,
    url: Url,
    target: Option<String>,
    fetcher: Arc<dyn Fetch>,
    tx: Sender<LoadCompletion>,
}

impl FetchJob {
    fn run(self) {
        let outcome = match self
            .fetcher
            .get(&self.url)
            .and_then(|body| fragment::extract(&body, self.target.as_deref()))
        {
            Ok(html) => LoadOutcome::Loaded(html),
            Err(err) => LoadOutcome::Failed(err),
        };
        // The receiver lives as long as the loader; a send error only means
        // the page is being torn down.
        let _ = self.tx.send(LoadCompletion {
            id: self.id,
            url: Some(self.url),
            outcome,
        });
    }
}
