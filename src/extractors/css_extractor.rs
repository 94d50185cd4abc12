//! CSS selector evaluation on the page side
//!
//! Uses the scraper crate to evaluate a `PageRequest` against a rendered
//! document. This is the pure function the request decodes into.

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::query::{PageRequest, PageValue, PostProcess};

/// Parsed document plus the URL it was rendered from
pub struct PageSnapshot {
    document: Html,
    base_url: Option<Url>,
}

impl PageSnapshot {
    pub fn parse(html: &str, base_url: Option<&str>) -> Self {
        Self {
            document: Html::parse_document(html),
            base_url: base_url.and_then(|u| Url::parse(u).ok()),
        }
    }

    /// Evaluate `request`, `None` when nothing usable matched.
    ///
    /// An invalid selector matches nothing.
    pub fn evaluate(&self, request: &PageRequest) -> Option<PageValue> {
        let selector = match Selector::parse(&request.query.selector) {
            Ok(s) => s,
            Err(e) => {
                log::debug!("invalid selector {:?}: {:?}", request.query.selector, e);
                return None;
            }
        };

        let matches: Vec<ElementRef> = self.document.select(&selector).collect();
        let index = request.query.index.pick(matches.len())?;
        let element = matches[index];
        log::debug!(
            "selector {:?} matched {} element(s), using #{}",
            request.query.selector,
            matches.len(),
            index
        );

        match &request.post {
            PostProcess::Text => Some(PageValue::Text {
                text: element_text(element),
            }),
            PostProcess::Attribute { name } => element.value().attr(name).map(|v| PageValue::Text {
                text: v.to_string(),
            }),
            PostProcess::AncestorAttribute { levels, name } => {
                let ancestor = ancestor(element, *levels)?;
                let detail = ancestor.value().attr(name)?.to_string();
                Some(PageValue::Pair {
                    text: element_text(element),
                    detail,
                })
            }
            PostProcess::NestedLink { selector } => {
                let inner = Selector::parse(selector).ok()?;
                let anchor = element.select(&inner).next()?;
                let href = anchor.value().attr("href")?;
                Some(PageValue::Pair {
                    text: element_text(anchor),
                    detail: self.resolve(href),
                })
            }
        }
    }

    /// Resolve `href` against the page URL, as the browser does for `a.href`
    fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        match &self.base_url {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

/// Rendered text of `element`, close to what `innerText` gives.
///
/// `<br>` becomes a line break and script or style contents are skipped.
/// Block boundaries do not add separators.
fn element_text(element: ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => {
                let hidden = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|e| matches!(e.value().name(), "script" | "style"));
                if !hidden {
                    text.push_str(t);
                }
            }
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Element `levels` steps up from `element`; non-element parents end the walk
fn ancestor(element: ElementRef, levels: usize) -> Option<ElementRef> {
    let mut node = *element;
    for _ in 0..levels {
        node = node.parent()?;
    }
    ElementRef::wrap(node)
}
