use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indoc::indoc;
use term_modal::document::{ContainerBody, Document, MemoryDocument};
use term_modal::layout::{NaturalSize, Viewport, compute_layout};
use term_modal::loader::{ContentLoader, Dispatch, Fetch};
use term_modal::registry::LoadState;
use term_modal::{
    DismissSource, LifecycleController, LoadError, ModalConfig, ModalEvent, ModalRequest, Phase,
};
use url::Url;

const ARTICLE: &str = indoc! {r#"
    <html>
      <body>
        <header>site chrome</header>
        <div id="main-content">
          <h2>Story</h2>
          <p>First paragraph of the story.</p>
        </div>
      </body>
    </html>
"#};

/// Serves canned bodies by path and counts every request.
#[derive(Default)]
struct CountingFetch {
    pages: HashMap<String, Result<String, LoadError>>,
    requests: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl CountingFetch {
    fn with(mut self, path: &str, body: Result<&str, LoadError>) -> Self {
        self.pages.insert(path.to_string(), body.map(str::to_string));
        self
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Fetch for CountingFetch {
    fn get(&self, url: &Url) -> Result<String, LoadError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        self.pages
            .get(url.path())
            .cloned()
            .unwrap_or(Err(LoadError::Status(404)))
    }
}

fn fetcher() -> Arc<CountingFetch> {
    Arc::new(
        CountingFetch::default()
            .with("/news/1", Ok(ARTICLE))
            .with("/news/2", Ok("<p>second</p>"))
            .with("/news-item", Ok("<p>deep link</p>"))
            .with("/broken", Err(LoadError::Status(500))),
    )
}

fn controller_with(
    fetch: Arc<CountingFetch>,
    config: ModalConfig,
) -> LifecycleController<MemoryDocument> {
    let loader = ContentLoader::new(fetch, Dispatch::Inline)
        .with_base(Url::parse("https://example.org/").unwrap());
    LifecycleController::new(config, MemoryDocument::new(Viewport::new(120, 40)), loader).unwrap()
}

fn controller(fetch: Arc<CountingFetch>) -> LifecycleController<MemoryDocument> {
    controller_with(fetch, ModalConfig::for_terminal())
}

fn open(ctl: &mut LifecycleController<MemoryDocument>, reference: &str) {
    ctl.handle(ModalEvent::Trigger(ModalRequest::new(reference, None)));
    ctl.pump();
}

#[test]
fn identical_paths_on_different_hosts_share_a_container() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    open(&mut ctl, "https://example.org/news/1");
    ctl.handle(ModalEvent::Dismiss(DismissSource::EscapeKey));
    open(&mut ctl, "http://mirror.example.net/news/1");
    assert_eq!(fetch.requests(), 1);
    assert_eq!(ctl.registry().len(), 1);
    assert_eq!(ctl.document().containers().len(), 1);
}

#[test]
fn idempotent_open_fetches_once() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    open(&mut ctl, "/news/1");
    ctl.handle(ModalEvent::Dismiss(DismissSource::CloseButton));
    open(&mut ctl, "/news/1");

    let id = ModalRequest::new("/news/1", None).identifier();
    assert_eq!(fetch.requests(), 1);
    assert_eq!(ctl.phase(&id), Phase::Open);
    assert!(ctl.overlay_visible());
    let node = ctl.document().find(id.as_str()).unwrap();
    assert!(node.open && node.loaded_visible);
}

#[test]
fn repeated_trigger_while_loading_is_ignored() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    let request = ModalRequest::new("/news/2", None);
    ctl.handle(ModalEvent::Trigger(request.clone()));
    ctl.handle(ModalEvent::Trigger(request.clone()));
    ctl.handle(ModalEvent::Trigger(request.clone()));
    assert_eq!(ctl.registry().state(&request.identifier()), Some(LoadState::Loading));
    assert_eq!(ctl.pump(), 1);
    assert_eq!(fetch.requests(), 1);
    assert_eq!(ctl.phase(&request.identifier()), Phase::Open);
}

#[test]
fn failed_load_opens_with_error_and_never_refetches() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    open(&mut ctl, "/broken");
    let id = ModalRequest::new("/broken", None).identifier();
    assert_eq!(ctl.phase(&id), Phase::Open);
    assert_eq!(ctl.registry().state(&id), Some(LoadState::Error));

    let node = ctl.document().find(id.as_str()).unwrap();
    assert_eq!(
        node.body,
        ContainerBody::Error {
            class: "modal-load-content-error".into(),
            text: "The requested page could not be loaded.".into(),
        }
    );
    assert!(!node.has_content());
    assert!(node.close.is_some());

    ctl.handle(ModalEvent::Dismiss(DismissSource::Overlay));
    open(&mut ctl, "/broken");
    assert_eq!(fetch.requests(), 1);
    assert_eq!(ctl.phase(&id), Phase::Open);
}

#[test]
fn missing_target_fragment_is_an_error() {
    let fetch = fetcher();
    let mut ctl = controller(fetch);
    let request = ModalRequest::new("/news/2", Some("#main-content".into()));
    ctl.handle(ModalEvent::Trigger(request.clone()));
    ctl.pump();
    let node = ctl.document().find(request.identifier().as_str()).unwrap();
    assert!(node.has_error());
}

#[test]
fn target_fragment_narrows_inserted_content() {
    let fetch = fetcher();
    let mut ctl = controller(fetch);
    let request = ModalRequest::new("/news/1", Some("#main-content".into()));
    ctl.handle(ModalEvent::Trigger(request.clone()));
    ctl.pump();
    let node = ctl.document().find(request.identifier().as_str()).unwrap();
    let ContainerBody::Content(html) = &node.body else {
        panic!("expected content, got {:?}", node.body);
    };
    assert!(html.starts_with("<div>"));
    assert!(html.contains("First paragraph"));
    assert!(!html.contains("site chrome"));
    // the page may already carry #main-content; the inserted copy must not
    assert!(!html.contains("id="));
}

#[test]
fn default_target_and_query_suffix_come_from_config() {
    let fetch = fetcher();
    let config = ModalConfig {
        default_target: Some("#workflow-workbench,#main-content".into()),
        query_suffix: Some("modal=1".into()),
        ..ModalConfig::for_terminal()
    };
    let mut ctl = controller_with(fetch.clone(), config);
    open(&mut ctl, "/news/1?page=2");
    let id = ModalRequest::new("/news/1?page=2", None).identifier();
    assert_eq!(id.as_str(), "modal-load-content--news-1-page-2");
    let node = ctl.document().find(id.as_str()).unwrap();
    assert!(matches!(&node.body, ContainerBody::Content(html) if !html.contains("site chrome")));
    assert_eq!(
        fetch.urls.lock().unwrap().as_slice(),
        ["https://example.org/news/1?page=2&modal=1"]
    );
}

#[test]
fn fragment_scan_opens_first_match_exactly_once() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    let candidates = [
        ModalRequest::new("/news/1", None),
        ModalRequest::new("https://example.org/news-item", None),
        ModalRequest::new("/news-item", None),
    ];
    let opened = ctl.open_from_fragment("#news-item", &candidates);
    ctl.pump();
    let id = candidates[1].identifier();
    assert_eq!(opened.as_ref(), Some(&id));
    assert_eq!(ctl.open_identifier(), Some(&id));
    assert_eq!(fetch.requests(), 1);

    ctl.handle(ModalEvent::Dismiss(DismissSource::EscapeKey));
    assert_eq!(ctl.open_from_fragment("#news-item", &candidates), None);
    ctl.pump();
    assert_eq!(ctl.open_identifier(), None);
    assert_eq!(fetch.requests(), 1);
}

#[test]
fn fragment_without_match_opens_nothing() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    let candidates = [ModalRequest::new("/news/1", None)];
    assert_eq!(ctl.open_from_fragment("#elsewhere", &candidates), None);
    assert_eq!(ctl.open_from_fragment("", &candidates), None);
    assert_eq!(fetch.requests(), 0);
}

#[test]
fn dismiss_with_nothing_open_is_a_no_op() {
    let fetch = fetcher();
    let mut ctl = controller(fetch);
    assert!(!ctl.dismiss(DismissSource::EscapeKey));
    ctl.handle(ModalEvent::Dismiss(DismissSource::EscapeKey));
    assert!(!ctl.overlay_visible());
    // the overlay element is not even created by a stray dismiss
    assert!(ctl.document().overlay().is_none());
}

#[test]
fn opening_another_container_closes_the_previous() {
    let fetch = fetcher();
    let mut ctl = controller(fetch);
    open(&mut ctl, "/news/1");
    open(&mut ctl, "/news/2");
    let first = ModalRequest::new("/news/1", None).identifier();
    let second = ModalRequest::new("/news/2", None).identifier();
    assert_eq!(ctl.phase(&first), Phase::Closed);
    assert_eq!(ctl.phase(&second), Phase::Open);
    let open_nodes = ctl.document().containers().iter().filter(|c| c.open).count();
    assert_eq!(open_nodes, 1);
    let first_node = ctl.document().find(first.as_str()).unwrap();
    assert!(first_node.layout.is_none());
    assert!(first_node.has_content());
    assert!(ctl.overlay_visible());
}

#[test]
fn dismiss_while_loading_keeps_container_hidden_but_caches_content() {
    let fetch = fetcher();
    let mut ctl = controller(fetch.clone());
    let request = ModalRequest::new("/news/2", None);
    let id = request.identifier();
    ctl.handle(ModalEvent::Trigger(request.clone()));
    assert_eq!(ctl.phase(&id), Phase::Opening);
    ctl.handle(ModalEvent::Dismiss(DismissSource::EscapeKey));
    ctl.pump();

    assert_eq!(ctl.phase(&id), Phase::Closed);
    assert!(!ctl.overlay_visible());
    assert_eq!(ctl.registry().state(&id), Some(LoadState::Loaded));
    assert!(ctl.document().find(id.as_str()).unwrap().has_content());

    ctl.handle(ModalEvent::Trigger(request));
    assert_eq!(ctl.phase(&id), Phase::Open);
    assert_eq!(fetch.requests(), 1);
}

#[test]
fn resize_relayouts_only_the_open_container() {
    let fetch = fetcher();
    let mut ctl = controller_with(
        fetch,
        ModalConfig {
            viewport_margin: 30,
            ..ModalConfig::default()
        },
    );
    // nothing open: resize is a no-op
    ctl.handle(ModalEvent::Resize);
    assert!(ctl.relayout().is_none());

    open(&mut ctl, "/news/1");
    let id = ModalRequest::new("/news/1", None).identifier();
    let node_id = ctl.registry().get(&id).unwrap().node();
    let natural = ctl.document().natural_size(node_id);
    let before = ctl.document().find(id.as_str()).unwrap().layout.unwrap();
    assert_eq!(before, compute_layout(Viewport::new(120, 40), natural, 30));
    assert_eq!(before.width, natural.width);

    ctl.document_mut().set_viewport(Viewport::new(40, 12));
    ctl.handle(ModalEvent::Resize);
    let after = ctl.document().find(id.as_str()).unwrap().layout.unwrap();
    assert_eq!(after.width, 10);
    assert_eq!(after.height, 0);
    assert_eq!(after.left, 15);
}

#[test]
fn media_loaded_relayouts_matching_open_container() {
    let fetch = fetcher();
    let mut ctl = controller(fetch);
    open(&mut ctl, "/news/1");
    let id = ModalRequest::new("/news/1", None).identifier();
    let other = ModalRequest::new("/news/2", None).identifier();

    ctl.document_mut().set_viewport(Viewport::new(30, 10));
    ctl.handle(ModalEvent::MediaLoaded(other));
    let stale = ctl.document().find(id.as_str()).unwrap().layout.unwrap();
    ctl.handle(ModalEvent::MediaLoaded(id.clone()));
    let fresh = ctl.document().find(id.as_str()).unwrap().layout.unwrap();
    assert_ne!(stale, fresh);
    assert!(fresh.width <= 30 - 4);
}

#[test]
fn layout_stays_within_margin_for_many_sizes() {
    for (vw, vh) in [(80u16, 24u16), (31, 31), (200, 60), (45, 40)] {
        for (w, h) in [(1u16, 1u16), (79, 23), (80, 24), (500, 500), (60, 35)] {
            let l = compute_layout(Viewport::new(vw, vh), NaturalSize::new(w, h), 30);
            assert!(l.width <= vw.saturating_sub(30), "{vw}x{vh} / {w}x{h}");
            assert!(l.height <= vh.saturating_sub(30), "{vw}x{vh} / {w}x{h}");
            assert_eq!(l.left, (vw - l.width) / 2);
            assert_eq!(l.top, (vh - l.height) / 2);
        }
    }
}

#[test]
fn threaded_loads_complete_through_pump() {
    let fetch = fetcher();
    let loader = ContentLoader::new(fetch.clone(), Dispatch::Thread)
        .with_base(Url::parse("https://example.org/").unwrap());
    let mut ctl = LifecycleController::new(
        ModalConfig::for_terminal(),
        MemoryDocument::new(Viewport::new(80, 24)),
        loader,
    )
    .unwrap();
    let request = ModalRequest::new("/news/2", None);
    ctl.handle(ModalEvent::Trigger(request.clone()));
    assert_eq!(ctl.pump_timeout(Duration::from_secs(5)), 1);
    assert_eq!(ctl.phase(&request.identifier()), Phase::Open);
    assert_eq!(fetch.requests(), 1);
}
