//! Narrow a fetched document to the part that goes into a container.

use scraper::node::{Attributes, Node};
use scraper::{ElementRef, Html, Selector};

use crate::error::LoadError;

/// Extract the insertable HTML from a fetched document.
///
/// With a target selector, every matching element is kept (outer HTML, in
/// document order) and no match is an error. Without one, the body's inner
/// HTML is used. Either way `id` attributes are removed from the extracted
/// elements so they cannot clash with ids already on the page.
pub fn extract(document_html: &str, target: Option<&str>) -> Result<String, LoadError> {
    let mut document = Html::parse_document(document_html);
    let (roots, outer) = match target {
        Some(target) => {
            let selector = Selector::parse(target)
                .map_err(|_| LoadError::InvalidSelector(target.to_string()))?;
            let roots: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
            if roots.is_empty() {
                return Err(LoadError::MissingFragment(target.to_string()));
            }
            (roots, true)
        }
        None => {
            let body = Selector::parse("body")
                .map_err(|_| LoadError::InvalidSelector("body".to_string()))?;
            let Some(body) = document.select(&body).next().map(|el| el.id()) else {
                return Ok(document_html.to_string());
            };
            (vec![body], false)
        }
    };

    let nodes: Vec<_> = roots
        .iter()
        .filter_map(|root| document.tree.get(*root))
        .flat_map(|root| root.descendants().map(|node| node.id()))
        .collect();
    for id in nodes {
        if let Some(mut node) = document.tree.get_mut(id)
            && let Node::Element(element) = node.value()
        {
            let kept: Attributes = element
                .attrs
                .iter()
                .filter(|(name, _)| name.local.as_ref() != "id")
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            element.attrs = kept;
        }
    }

    let parts: Vec<String> = roots
        .iter()
        .filter_map(|root| document.tree.get(*root))
        .filter_map(ElementRef::wrap)
        .map(|el| if outer { el.html() } else { el.inner_html() })
        .collect();
    Ok(parts.join("\n"))
}
