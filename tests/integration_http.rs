use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use term_modal::document::MemoryDocument;
use term_modal::layout::Viewport;
use term_modal::loader::{ContentLoader, Dispatch, Fetch, WebFetcher};
use term_modal::registry::LoadState;
use term_modal::{LifecycleController, LoadError, ModalConfig, ModalEvent, ModalRequest, Phase};
use url::Url;

/// The loopback server must be reached directly even when the environment
/// configures an HTTP proxy.
fn direct_fetcher() -> WebFetcher {
    direct_fetcher_with_timeout(Duration::from_secs(5))
}

fn direct_fetcher_with_timeout(timeout: Duration) -> WebFetcher {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .unwrap();
    WebFetcher::with_client(client)
}

/// Serve `responses` in order, one connection each, and return the request
/// lines that were received.
fn serve(responses: Vec<(u16, &'static str)>) -> (Url, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            seen.push(request_line.trim_end().to_string());
            let mut header = String::new();
            while reader.read_line(&mut header).unwrap() > 0 && header != "\r\n" {
                header.clear();
            }
            let reason = if status == 200 { "OK" } else { "Error" };
            write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (Url::parse(&format!("http://{addr}/")).unwrap(), handle)
}

#[test]
fn fetcher_returns_body_on_success() {
    let (base, server) = serve(vec![(200, "<p>hello</p>")]);
    let fetcher = direct_fetcher();
    let body = fetcher.get(&base.join("/page").unwrap()).unwrap();
    assert_eq!(body, "<p>hello</p>");
    let seen = server.join().unwrap();
    assert!(seen[0].starts_with("GET /page "));
}

#[test]
fn fetcher_maps_non_success_to_status() {
    let (base, server) = serve(vec![(404, "<p>missing</p>")]);
    let fetcher = direct_fetcher();
    assert_eq!(
        fetcher.get(&base.join("/gone").unwrap()),
        Err(LoadError::Status(404))
    );
    server.join().unwrap();
}

#[test]
fn fetcher_maps_slow_response_to_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        // hold the connection open without answering
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(3));
        drop(stream);
    });
    let fetcher = direct_fetcher_with_timeout(Duration::from_secs(1));
    let url = Url::parse(&format!("http://{addr}/slow")).unwrap();
    assert_eq!(fetcher.get(&url), Err(LoadError::Timeout));
    server.join().unwrap();
}

#[test]
fn lifecycle_over_http_fetches_once_with_suffix() {
    let (base, server) = serve(vec![(
        200,
        "<html><body><nav>x</nav><div id=\"main-content\"><p>story</p></div></body></html>",
    )]);
    let fetcher = Arc::new(direct_fetcher());
    let loader = ContentLoader::new(fetcher, Dispatch::Thread).with_base(base);
    let config = ModalConfig {
        query_suffix: Some("modal=1".into()),
        default_target: Some("#main-content".into()),
        ..ModalConfig::for_terminal()
    };
    let mut ctl =
        LifecycleController::new(config, MemoryDocument::new(Viewport::new(80, 24)), loader)
            .unwrap();

    let request = ModalRequest::new("/news/1", None);
    let id = request.identifier();
    ctl.handle(ModalEvent::Trigger(request.clone()));
    ctl.handle(ModalEvent::Trigger(request.clone()));
    assert_eq!(ctl.pump_timeout(Duration::from_secs(10)), 1);
    assert_eq!(ctl.phase(&id), Phase::Open);
    assert_eq!(ctl.registry().state(&id), Some(LoadState::Loaded));
    assert_eq!(ctl.loader().issued(), 1);

    let seen = server.join().unwrap();
    assert_eq!(seen, vec!["GET /news/1?modal=1 HTTP/1.1".to_string()]);
}
