use std::fs;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use super::Fetch;
use crate::error::LoadError;

/// Fetches over HTTP(S), and reads `file:` URLs straight from disk.
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: Client,
}

impl WebFetcher {
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| LoadError::Transport(err.to_string()))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client, e.g. one with custom proxy settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for WebFetcher {
    fn get(&self, url: &Url) -> Result<String, LoadError> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| LoadError::InvalidUrl(url.to_string()))?;
            return fs::read_to_string(&path).map_err(|err| LoadError::Transport(err.to_string()));
        }

        tracing::debug!(%url, "fetching");
        let response = self.client.get(url.clone()).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        response.text().map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> LoadError {
    if err.is_timeout() {
        LoadError::Timeout
    } else {
        LoadError::Transport(err.to_string())
    }
}
