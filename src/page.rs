//! Typed access to the rendered page of a tab
//!
//! `execute` is the single round trip to the page. The query helpers wrap it
//! with the post-process step they need so site rules never build requests
//! by hand.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{CopyError, Result};
use crate::extractors::PageSnapshot;
use crate::host::TabId;
use crate::query::{ExtractionQuery, ExtractionResult, PageRequest, PageValue, PostProcess};

#[async_trait]
pub trait PageAccessor: Send + Sync {
    /// Run `request` against the live document of `tab`.
    ///
    /// `Ok(None)` means nothing matched.
    async fn execute(&self, tab: TabId, request: &PageRequest) -> Result<Option<PageValue>>;

    /// Trimmed text of the element chosen by `query`
    async fn query_text(&self, tab: TabId, query: &ExtractionQuery) -> Result<ExtractionResult> {
        let request = PageRequest {
            query: query.clone(),
            post: PostProcess::Text,
        };
        Ok(match self.execute(tab, &request).await? {
            Some(PageValue::Text { text }) | Some(PageValue::Pair { text, .. }) => {
                ExtractionResult::found(text)
            }
            None => ExtractionResult::not_found(),
        })
    }

    /// Attribute `name` of the element chosen by `query`
    async fn query_attribute(
        &self,
        tab: TabId,
        query: &ExtractionQuery,
        name: &str,
    ) -> Result<Option<String>> {
        let request = PageRequest {
            query: query.clone(),
            post: PostProcess::Attribute {
                name: name.to_string(),
            },
        };
        Ok(match self.execute(tab, &request).await? {
            Some(PageValue::Text { text }) => Some(text),
            _ => None,
        })
    }

    /// Text of the chosen element and attribute `name` of its ancestor `levels` up
    async fn query_ancestor_attribute(
        &self,
        tab: TabId,
        query: &ExtractionQuery,
        levels: usize,
        name: &str,
    ) -> Result<Option<(String, String)>> {
        let request = PageRequest {
            query: query.clone(),
            post: PostProcess::AncestorAttribute {
                levels,
                name: name.to_string(),
            },
        };
        Ok(into_pair(self.execute(tab, &request).await?))
    }

    /// Text and resolved href of the first `selector` match inside the chosen element
    async fn query_nested_link(
        &self,
        tab: TabId,
        query: &ExtractionQuery,
        selector: &str,
    ) -> Result<Option<(String, String)>> {
        let request = PageRequest {
            query: query.clone(),
            post: PostProcess::NestedLink {
                selector: selector.to_string(),
            },
        };
        Ok(into_pair(self.execute(tab, &request).await?))
    }
}

fn into_pair(value: Option<PageValue>) -> Option<(String, String)> {
    match value? {
        PageValue::Pair { text, detail } => Some((text, detail)),
        PageValue::Text { .. } => None,
    }
}

/// Rendered HTML of a tab as captured by the host
#[derive(Debug, Clone)]
struct CapturedPage {
    url: Option<String>,
    html: String,
}

/// `PageAccessor` over HTML captured from each tab.
///
/// Every request parses the latest capture, so a refreshed capture is picked
/// up by the next query.
#[derive(Debug, Default)]
pub struct SnapshotPage {
    pages: RwLock<HashMap<TabId, CapturedPage>>,
}

impl SnapshotPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the rendered HTML of `tab`, replacing any previous capture
    pub fn capture(&self, tab: TabId, url: Option<&str>, html: impl Into<String>) {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(
                tab,
                CapturedPage {
                    url: url.map(String::from),
                    html: html.into(),
                },
            );
        }
    }

    pub fn forget(&self, tab: TabId) {
        if let Ok(mut pages) = self.pages.write() {
            pages.remove(&tab);
        }
    }
}

#[async_trait]
impl PageAccessor for SnapshotPage {
    async fn execute(&self, tab: TabId, request: &PageRequest) -> Result<Option<PageValue>> {
        let captured = {
            let pages = self
                .pages
                .read()
                .map_err(|_| CopyError::Page("page cache poisoned".to_string()))?;
            pages.get(&tab).cloned()
        };
        let captured =
            captured.ok_or_else(|| CopyError::Page(format!("no page captured for tab {}", tab)))?;

        let snapshot = PageSnapshot::parse(&captured.html, captured.url.as_deref());
        Ok(snapshot.evaluate(request))
    }
}
