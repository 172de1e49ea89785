//! Canonical container identifiers.
//!
//! A trigger reference is reduced to its path-and-beyond portion so that
//! `https://a.org/news` and `http://b.org/news` land on the same container,
//! then every run of non-alphanumeric characters becomes a single hyphen.
//! The result is safe to use as an element id and as a map key.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::ID_NAMESPACE;

static ORIGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*//[^/]+").expect("origin pattern is valid"));
static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("token pattern is valid"));

/// Stable key of one container for the lifetime of the page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModalId(String);

impl ModalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The DOM-safe token without the namespace prefix.
    pub fn token(&self) -> &str {
        &self.0[ID_NAMESPACE.len()..]
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Drop any `scheme://host` prefix, keeping the path, query and fragment.
pub fn strip_origin(reference: &str) -> &str {
    match ORIGIN.find(reference) {
        Some(m) => &reference[m.end()..],
        None => reference,
    }
}

/// Map a raw reference to its container identifier. Never fails; an empty
/// reference yields the degenerate token `-`.
pub fn resolve(reference: &str) -> ModalId {
    let path = strip_origin(reference);
    let token = NON_ALNUM.replace_all(path, "-");
    let token = if token.is_empty() { "-" } else { token.as_ref() };
    ModalId(format!("{ID_NAMESPACE}{token}"))
}

/// Key compared against a document URL fragment during the startup scan:
/// the path form of the reference with its first slash removed.
pub fn fragment_key(reference: &str) -> String {
    strip_origin(reference).replacen('/', "", 1)
}
