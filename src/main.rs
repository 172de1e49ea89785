use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use scraper::{Html, Selector};

use term_modal::app::App;
use term_modal::cli::Cli;
use term_modal::components::debug_log::set_global_debug_log;
use term_modal::components::{DebugLogComponent, PageComponent};
use term_modal::document::MemoryDocument;
use term_modal::drivers::OutputDriver;
use term_modal::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_modal::event_loop::{ControlFlow, EventLoop};
use term_modal::lifecycle::LifecycleController;
use term_modal::loader::{ContentLoader, Dispatch, Fetch, WebFetcher};
use term_modal::trigger::discover_triggers;
use term_modal::tracing_sub;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = cli.modal_config().map_err(io::Error::other)?;

    let debug_log = if config.debug_mode {
        let (component, handle) = DebugLogComponent::new_default();
        set_global_debug_log(handle);
        Some(component)
    } else {
        None
    };
    tracing_sub::init(config.debug_mode);

    let page_url = cli.page_url().map_err(io::Error::other)?;
    let fetcher = Arc::new(WebFetcher::new(config.request_timeout()).map_err(io::Error::other)?);
    let body = fetcher
        .get(&page_url)
        .map_err(|err| io::Error::other(format!("{page_url}: {err}")))?;
    let triggers = discover_triggers(&body, &cli.selector).map_err(io::Error::other)?;
    tracing::info!(url = %page_url, triggers = triggers.len(), "page loaded");
    let title = page_title(&body).unwrap_or_else(|| page_url.to_string());

    let loader = ContentLoader::new(fetcher, Dispatch::Thread).with_base(page_url.clone());
    let controller = LifecycleController::new(config, MemoryDocument::default(), loader)
        .map_err(io::Error::other)?;
    let mut app = App::new(controller, PageComponent::new(title, triggers));
    if let Some(log) = debug_log {
        app = app.with_debug_log(log);
    }
    if let Some(fragment) = cli.startup_fragment(&page_url) {
        let candidates = app.page().requests();
        app.controller_mut().open_from_fragment(&fragment, &candidates);
    }

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), Duration::from_millis(33));
    let result = event_loop.run(|_, event| match event {
        None => {
            app.tick();
            output.draw(|mut frame| app.render(&mut frame))?;
            Ok(ControlFlow::Continue)
        }
        Some(event) => Ok(app.handle_event(&event)),
    });
    output.exit()?;
    result
}

fn page_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);
    let title = document.select(&selector).next()?.text().collect::<String>();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}
