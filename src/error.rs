//! Error types shared by the loader and the configuration layer.
//!
//! Load errors never escape the lifecycle: they are rendered as the inline
//! error element of the container that requested the content.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("no element matched `{0}`")]
    MissingFragment(String),
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
    #[error("invalid url `{0}`")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_messages_are_readable() {
        assert_eq!(
            LoadError::Status(404).to_string(),
            "server answered with status 404"
        );
        assert_eq!(
            LoadError::MissingFragment("#main".into()).to_string(),
            "no element matched `#main`"
        );
    }
}
