//! Trigger elements and the requests they produce.

use scraper::{Html, Selector};

use crate::error::LoadError;
use crate::identifier::{self, ModalId};

/// Attributes read from a trigger element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerAttributes {
    pub href: Option<String>,
    /// Explicit override reference (`data-href`), wins over `href`.
    pub data_href: Option<String>,
    /// Explicit target selector (`data-target`).
    pub data_target: Option<String>,
}

/// Ephemeral value derived from one trigger activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalRequest {
    pub source_reference: String,
    pub target_fragment_hint: Option<String>,
}

impl ModalRequest {
    pub fn new(reference: impl Into<String>, target: Option<String>) -> Self {
        Self {
            source_reference: reference.into(),
            target_fragment_hint: target.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Build a request from element attributes. Returns `None` when the
    /// element carries no usable reference at all.
    pub fn from_attributes(attrs: &TriggerAttributes) -> Option<Self> {
        let reference = non_empty(attrs.data_href.as_deref())
            .or_else(|| non_empty(attrs.href.as_deref()))?;
        Some(Self::new(reference, attrs.data_target.clone()))
    }

    pub fn identifier(&self) -> ModalId {
        identifier::resolve(&self.source_reference)
    }

    pub fn fragment_key(&self) -> String {
        identifier::fragment_key(&self.source_reference)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A trigger found in a page, with the text a user would click on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub label: String,
    pub request: ModalRequest,
}

/// Collect every element matching `selector` that resolves to a request.
/// Elements without a reference are skipped.
pub fn discover_triggers(html: &str, selector: &str) -> Result<Vec<Trigger>, LoadError> {
    let selector =
        Selector::parse(selector).map_err(|_| LoadError::InvalidSelector(selector.to_string()))?;
    let document = Html::parse_document(html);
    let triggers = document
        .select(&selector)
        .filter_map(|element| {
            let value = element.value();
            let attrs = TriggerAttributes {
                href: value.attr("href").map(str::to_string),
                data_href: value.attr("data-href").map(str::to_string),
                data_target: value.attr("data-target").map(str::to_string),
            };
            let request = ModalRequest::from_attributes(&attrs)?;
            let text = element.text().collect::<Vec<_>>().join(" ");
            let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let label = if label.is_empty() {
                request.source_reference.clone()
            } else {
                label
            };
            Some(Trigger { label, request })
        })
        .collect();
    Ok(triggers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_attribute_wins() {
        let attrs = TriggerAttributes {
            href: Some("/plain".into()),
            data_href: Some("/override".into()),
            data_target: Some("#main".into()),
        };
        let req = ModalRequest::from_attributes(&attrs).unwrap();
        assert_eq!(req.source_reference, "/override");
        assert_eq!(req.target_fragment_hint.as_deref(), Some("#main"));
    }

    #[test]
    fn empty_override_falls_back_to_href() {
        let attrs = TriggerAttributes {
            href: Some("/plain".into()),
            data_href: Some("  ".into()),
            data_target: Some("".into()),
        };
        let req = ModalRequest::from_attributes(&attrs).unwrap();
        assert_eq!(req.source_reference, "/plain");
        assert_eq!(req.target_fragment_hint, None);
    }

    #[test]
    fn no_reference_means_no_request() {
        assert!(ModalRequest::from_attributes(&TriggerAttributes::default()).is_none());
    }

    #[test]
    fn discovers_links_with_labels() {
        let html = r##"
            <ul>
              <li><a href="/news/1">First   story</a></li>
              <li><a href="/news/2" data-target="#body"></a></li>
              <li><a data-href="/override" href="/ignored">Third</a></li>
              <li><a name="anchor-only">no ref</a></li>
            </ul>"##;
        let triggers = discover_triggers(html, "a").unwrap();
        assert_eq!(triggers.len(), 3);
        assert_eq!(triggers[0].label, "First story");
        assert_eq!(triggers[1].label, "/news/2");
        assert_eq!(
            triggers[1].request.target_fragment_hint.as_deref(),
            Some("#body")
        );
        assert_eq!(triggers[2].request.source_reference, "/override");
    }

    #[test]
    fn invalid_selector_is_reported() {
        let err = discover_triggers("<a href=x>x</a>", "a[").unwrap_err();
        assert!(matches!(err, LoadError::InvalidSelector(_)));
    }
}
