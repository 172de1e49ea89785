use std::path::{Path, PathBuf};

use clap::Parser;
use url::Url;

use crate::config::ModalConfig;
use crate::constants::DEFAULT_TRIGGER_SELECTOR;
use crate::error::{ConfigError, LoadError};

#[derive(Parser, Debug)]
#[command(
    name = "term-modal",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse a page's links and open their content in a modal overlay"
)]
pub struct Cli {
    /// Page to list triggers from: an http(s) URL, a file URL, or a local path.
    #[arg(value_name = "PAGE")]
    pub page: String,

    /// TOML file with modal settings.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Trace every lifecycle step into the debug panel.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Cells kept free around a container that does not fit the terminal.
    #[arg(long = "margin", value_name = "CELLS")]
    pub margin: Option<u16>,

    /// Seconds before a fetch is reported as timed out.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Open the trigger whose path matches this fragment on startup.
    #[arg(long = "open", value_name = "FRAGMENT")]
    pub open: Option<String>,

    /// CSS selector for trigger elements in PAGE.
    #[arg(long = "selector", value_name = "CSS", default_value = DEFAULT_TRIGGER_SELECTOR)]
    pub selector: String,

    /// Fragment inserted for triggers that do not name one.
    #[arg(long = "target", value_name = "CSS")]
    pub target: Option<String>,

    /// Query appended to every fetch, e.g. `modal=1`.
    #[arg(long = "query", value_name = "SUFFIX")]
    pub query: Option<String>,
}

impl Cli {
    /// Terminal defaults, then the config file, then flags.
    pub fn modal_config(&self) -> Result<ModalConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ModalConfig::for_terminal().with_file(path)?,
            None => ModalConfig::for_terminal(),
        };
        if self.debug {
            config.debug_mode = true;
        }
        if let Some(margin) = self.margin {
            config.viewport_margin = margin;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(target) = &self.target {
            config.default_target = Some(target.clone());
        }
        if let Some(query) = &self.query {
            config.query_suffix = Some(query.clone());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn page_url(&self) -> Result<Url, LoadError> {
        page_url(&self.page)
    }

    /// Fragment for the startup scan: `--open` wins over the page URL's own.
    pub fn startup_fragment(&self, page: &Url) -> Option<String> {
        self.open
            .clone()
            .or_else(|| page.fragment().map(str::to_string))
            .filter(|f| !f.is_empty())
    }
}

/// Interpret `page` as a URL when it has a known scheme, else as a path.
pub fn page_url(page: &str) -> Result<Url, LoadError> {
    if let Ok(url) = Url::parse(page)
        && matches!(url.scheme(), "http" | "https" | "file")
    {
        return Ok(url);
    }
    let path = Path::new(page);
    let absolute = path
        .canonicalize()
        .map_err(|err| LoadError::InvalidUrl(format!("{page}: {err}")))?;
    Url::from_file_path(&absolute).map_err(|_| LoadError::InvalidUrl(page.to_string()))
}
