//! Per-site extraction rules
//!
//! Each site exposes the fact we want through a different path in its markup,
//! so every site gets its own rule over a single configured selector.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BILIBILI_AUTHOR_ANCHOR, DOUYIN_VIDEO_ID_ATTR, DOUYIN_VIDEO_ID_DEPTH, DOUYIN_VIDEO_URL,
};
use crate::error::Result;
use crate::host::Tab;
use crate::page::PageAccessor;
use crate::query::ExtractionQuery;
use crate::settings::Settings;
use crate::sites::SiteKey;
use crate::template::{format_template, TemplateVars};

/// A piece of text and the link it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub link: String,
}

impl Snippet {
    /// `- {text}` and `- {link}` on two lines
    pub fn two_line(&self) -> String {
        format!("- {}\n- {}", self.text, self.link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SiteRule {
    /// URL and title of the tab itself, no page query
    LinkAndTitle,
    /// Text and href of an anchor nested inside the matched container
    NestedAnchor { selector: String, anchor: String },
    /// Text of the matched element, linked through an id found on an ancestor
    AncestorId {
        selector: String,
        levels: usize,
        attribute: String,
        /// `{id}` is replaced with the attribute value
        link_template: String,
    },
}

impl SiteRule {
    /// Rule for `site`, using the selector configured in `settings`
    pub fn for_site(site: SiteKey, settings: &Settings) -> Self {
        match site {
            SiteKey::Generic => SiteRule::LinkAndTitle,
            SiteKey::Bilibili => SiteRule::NestedAnchor {
                selector: settings.selectors.bilibili.clone(),
                anchor: BILIBILI_AUTHOR_ANCHOR.to_string(),
            },
            SiteKey::Douyin => SiteRule::AncestorId {
                selector: settings.selectors.douyin.clone(),
                levels: DOUYIN_VIDEO_ID_DEPTH,
                attribute: DOUYIN_VIDEO_ID_ATTR.to_string(),
                link_template: DOUYIN_VIDEO_URL.to_string(),
            },
        }
    }

    /// Selector reported to the user when nothing is found
    pub fn selector(&self) -> Option<&str> {
        match self {
            SiteRule::LinkAndTitle => None,
            SiteRule::NestedAnchor { selector, .. } | SiteRule::AncestorId { selector, .. } => {
                Some(selector)
            }
        }
    }

    /// Run the rule against `tab`. `Ok(None)` means the page did not have it.
    ///
    /// `link_override` replaces the tab URL for `LinkAndTitle` only.
    pub async fn extract(
        &self,
        page: &dyn PageAccessor,
        tab: &Tab,
        link_override: Option<&str>,
    ) -> Result<Option<Snippet>> {
        match self {
            SiteRule::LinkAndTitle => {
                let link = link_override
                    .filter(|l| !l.is_empty())
                    .or(tab.url.as_deref())
                    .unwrap_or_default();
                Ok(Some(Snippet {
                    text: tab.title.clone().unwrap_or_default(),
                    link: link.to_string(),
                }))
            }
            SiteRule::NestedAnchor { selector, anchor } => {
                let found = page
                    .query_nested_link(tab.id, &ExtractionQuery::first(selector.as_str()), anchor)
                    .await?;
                Ok(found.map(|(text, link)| Snippet { text, link }))
            }
            SiteRule::AncestorId {
                selector,
                levels,
                attribute,
                link_template,
            } => {
                let found = page
                    .query_ancestor_attribute(
                        tab.id,
                        &ExtractionQuery::first(selector.as_str()),
                        *levels,
                        attribute,
                    )
                    .await?;
                Ok(found
                    .filter(|(_, id)| !id.is_empty())
                    .map(|(text, id)| Snippet {
                        text,
                        link: link_template.replace("{id}", &id),
                    }))
            }
        }
    }

    /// Clipboard text for a snippet produced by this rule
    pub fn render(&self, snippet: &Snippet, template: &str) -> String {
        match self {
            SiteRule::LinkAndTitle => format_template(
                template,
                &TemplateVars {
                    link: &snippet.link,
                    title: &snippet.text,
                },
            ),
            _ => snippet.two_line(),
        }
    }
}
