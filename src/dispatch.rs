//! Keyboard commands and menu clicks mapped to copy actions

use std::sync::Arc;

use crate::constants::{
    COMMAND_COPY_BILIBILI_AUTHOR, COMMAND_COPY_DOUYIN_BODY, COMMAND_COPY_LINK_AND_TITLE,
    MENU_BILIBILI, MENU_COPY_LINK_AND_TITLE, MENU_DOUYIN, NOTIFY_FAILURE_TITLE,
    NOTIFY_SUCCESS_TITLE,
};
use crate::error::Result;
use crate::extractors::SiteRule;
use crate::host::{Clipboard, Host, Notifier, Tab};
use crate::page::PageAccessor;
use crate::query::{ExtractionQuery, IndexPolicy};
use crate::settings::SettingsProvider;
use crate::sites::SiteKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Tab title with the tab URL, or with `link_url` when invoked on a link
    CopyLinkAndTitle { link_url: Option<String> },
    /// Site rule for the given site
    CopySite(SiteKey),
    /// Text of one element, announced with `tip` on success
    CopySelector {
        selector: String,
        tip: String,
        index: IndexPolicy,
    },
}

impl Action {
    /// Action bound to a keyboard command, `None` for unknown commands
    pub fn from_command(name: &str) -> Option<Self> {
        match name {
            COMMAND_COPY_LINK_AND_TITLE => Some(Action::CopyLinkAndTitle { link_url: None }),
            COMMAND_COPY_BILIBILI_AUTHOR => Some(Action::CopySite(SiteKey::Bilibili)),
            COMMAND_COPY_DOUYIN_BODY => Some(Action::CopySite(SiteKey::Douyin)),
            _ => None,
        }
    }

    /// Action behind a context menu entry, `None` for foreign entries
    pub fn from_menu_item(id: &str, link_url: Option<&str>) -> Option<Self> {
        match id {
            MENU_COPY_LINK_AND_TITLE => Some(Action::CopyLinkAndTitle {
                link_url: link_url.map(String::from),
            }),
            MENU_BILIBILI => Some(Action::CopySite(SiteKey::Bilibili)),
            MENU_DOUYIN => Some(Action::CopySite(SiteKey::Douyin)),
            _ => None,
        }
    }
}

/// What a dispatched action put on the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(String),
    /// Nothing matched; the clipboard was cleared
    NotFound { selector: String },
}

fn site_name(site: SiteKey) -> &'static str {
    match site {
        SiteKey::Generic => "Page",
        SiteKey::Bilibili => "Bilibili",
        SiteKey::Douyin => "Douyin",
    }
}

pub struct Dispatcher {
    settings: SettingsProvider,
    page: Arc<dyn PageAccessor>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(host: &Host) -> Self {
        Self {
            settings: SettingsProvider::new(host.settings.clone()),
            page: host.page.clone(),
            clipboard: host.clipboard.clone(),
            notifier: host.notifier.clone(),
        }
    }

    /// Run `action` against `tab`. Settings are read fresh for every call.
    pub async fn dispatch(&self, action: &Action, tab: &Tab) -> Result<CopyOutcome> {
        match action {
            Action::CopyLinkAndTitle { link_url } => {
                self.copy_link_and_title(tab, link_url.as_deref()).await
            }
            Action::CopySite(site) => self.copy_site(tab, *site).await,
            Action::CopySelector {
                selector,
                tip,
                index,
            } => self.copy_selector(tab, selector, tip, *index).await,
        }
    }

    async fn copy_link_and_title(&self, tab: &Tab, link_url: Option<&str>) -> Result<CopyOutcome> {
        let settings = self.settings.load().await?;
        let rule = SiteRule::LinkAndTitle;
        let snippet = rule
            .extract(self.page.as_ref(), tab, link_url)
            .await?
            .unwrap_or_default();
        let payload = rule.render(&snippet, &settings.template);

        self.clipboard.write(tab.id, &payload).await?;
        self.notifier
            .notify(NOTIFY_SUCCESS_TITLE, "Copied page title and link")
            .await?;
        log::info!("copied link and title of tab {}", tab.id);
        Ok(CopyOutcome::Copied(payload))
    }

    async fn copy_site(&self, tab: &Tab, site: SiteKey) -> Result<CopyOutcome> {
        if site == SiteKey::Generic {
            return self.copy_link_and_title(tab, None).await;
        }

        let settings = self.settings.load().await?;
        let rule = SiteRule::for_site(site, &settings);
        let selector = rule.selector().unwrap_or_default().to_string();

        match rule.extract(self.page.as_ref(), tab, None).await? {
            Some(snippet) => {
                let payload = rule.render(&snippet, &settings.template);
                let message = format!("{}: {}", site_name(site), payload);
                self.copied(tab, payload, &message).await
            }
            None => self.not_found(tab, selector).await,
        }
    }

    async fn copy_selector(
        &self,
        tab: &Tab,
        selector: &str,
        tip: &str,
        index: IndexPolicy,
    ) -> Result<CopyOutcome> {
        let query = ExtractionQuery::with_index(selector, index);
        let result = self.page.query_text(tab.id, &query).await?;

        if result.found && !result.text.is_empty() {
            let message = format!("{}: {}", tip, result.text);
            self.copied(tab, result.text, &message).await
        } else {
            self.not_found(tab, selector.to_string()).await
        }
    }

    async fn copied(&self, tab: &Tab, payload: String, message: &str) -> Result<CopyOutcome> {
        self.clipboard.write(tab.id, &payload).await?;
        self.notifier.notify(NOTIFY_SUCCESS_TITLE, message).await?;
        log::info!("copied {} bytes from tab {}", payload.len(), tab.id);
        Ok(CopyOutcome::Copied(payload))
    }

    async fn not_found(&self, tab: &Tab, selector: String) -> Result<CopyOutcome> {
        self.clipboard.write(tab.id, "").await?;
        self.notifier
            .notify(NOTIFY_FAILURE_TITLE, &format!("Element not found: {}", selector))
            .await?;
        log::info!("selector {:?} found nothing in tab {}", selector, tab.id);
        Ok(CopyOutcome::NotFound { selector })
    }
}
