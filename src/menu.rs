//! Context menu reconciliation
//!
//! The reconciler remembers the hostname the menu was last built for. A
//! trigger with the same hostname is a no-op; a new hostname yields a plan
//! that the engine applies as remove-all, settle, create.

use std::time::Duration;

use crate::constants::{
    COMMAND_COPY_BILIBILI_AUTHOR, COMMAND_COPY_DOUYIN_BODY, COMMAND_COPY_LINK_AND_TITLE,
    MENU_BILIBILI, MENU_COPY_LINK_AND_TITLE, MENU_DOUYIN,
};
use crate::error::Result;
use crate::host::{CommandBinding, CommandRegistry, MenuContext, MenuEntry, MenuRegistry};
use crate::sites::{SiteKey, SiteTable};

/// Right-pad `title` to `width` columns and append the shortcut.
///
/// At least one space separates the two. Without a shortcut the title is
/// returned as is.
pub fn pad_label(title: &str, shortcut: Option<&str>, width: usize) -> String {
    match shortcut.filter(|s| !s.is_empty()) {
        Some(key) => {
            let padding = width.saturating_sub(title.chars().count()).max(1);
            format!("{}{}{}", title, " ".repeat(padding), key)
        }
        None => title.to_string(),
    }
}

/// A menu entry before its label is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub id: &'static str,
    pub title: &'static str,
    /// Keyboard command whose shortcut is shown next to the title
    pub command: &'static str,
    pub contexts: &'static [MenuContext],
}

const LINK_AND_TITLE_ITEM: PlannedItem = PlannedItem {
    id: MENU_COPY_LINK_AND_TITLE,
    title: "Copy page title and link",
    command: COMMAND_COPY_LINK_AND_TITLE,
    contexts: &[MenuContext::Page, MenuContext::Link],
};

const BILIBILI_ITEM: PlannedItem = PlannedItem {
    id: MENU_BILIBILI,
    title: "Bilibili: copy author and link",
    command: COMMAND_COPY_BILIBILI_AUTHOR,
    contexts: &[MenuContext::Page],
};

const DOUYIN_ITEM: PlannedItem = PlannedItem {
    id: MENU_DOUYIN,
    title: "Douyin: copy caption and link",
    command: COMMAND_COPY_DOUYIN_BODY,
    contexts: &[MenuContext::Page],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildPlan {
    pub hostname: String,
    pub site: SiteKey,
    pub items: Vec<PlannedItem>,
}

impl RebuildPlan {
    fn for_site(hostname: &str, site: SiteKey) -> Self {
        let mut items = vec![LINK_AND_TITLE_ITEM];
        match site {
            SiteKey::Bilibili => items.push(BILIBILI_ITEM),
            SiteKey::Douyin => items.push(DOUYIN_ITEM),
            SiteKey::Generic => {}
        }
        Self {
            hostname: hostname.to_string(),
            site,
            items,
        }
    }

    /// Menu entries with shortcut hints taken from `bindings`
    pub fn entries(&self, bindings: &[CommandBinding], width: usize) -> Vec<MenuEntry> {
        self.items
            .iter()
            .map(|item| {
                let shortcut = bindings
                    .iter()
                    .find(|b| b.name == item.command)
                    .and_then(|b| b.shortcut.as_deref());
                MenuEntry {
                    id: item.id.to_string(),
                    label: pad_label(item.title, shortcut, width),
                    contexts: item.contexts.to_vec(),
                }
            })
            .collect()
    }

    /// Replace the registered menu with this plan
    pub async fn apply(
        &self,
        menus: &dyn MenuRegistry,
        commands: &dyn CommandRegistry,
        settle_delay: Duration,
        width: usize,
    ) -> Result<()> {
        if let Err(e) = menus.remove_all().await {
            log::warn!("removing menu entries failed: {}", e);
        }
        if !settle_delay.is_zero() {
            tokio::time::sleep(settle_delay).await;
        }

        let bindings = commands.commands().await?;
        for entry in self.entries(&bindings, width) {
            menus.create(&entry).await?;
        }
        log::info!(
            "menu rebuilt for {} ({:?}, {} entries)",
            self.hostname,
            self.site,
            self.items.len()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    Unchanged,
    Rebuild(RebuildPlan),
}

/// Owner of the "menu was built for this hostname" state
#[derive(Debug, Clone)]
pub struct MenuReconciler {
    current_domain: Option<String>,
    sites: SiteTable,
}

impl MenuReconciler {
    pub fn new(sites: SiteTable) -> Self {
        Self {
            current_domain: None,
            sites,
        }
    }

    pub fn current_domain(&self) -> Option<&str> {
        self.current_domain.as_deref()
    }

    /// Record `hostname` and plan a rebuild if it differs from the last one
    pub fn reconcile(&mut self, hostname: &str) -> Reconcile {
        if self.current_domain.as_deref() == Some(hostname) {
            return Reconcile::Unchanged;
        }
        self.current_domain = Some(hostname.to_string());
        let site = self.sites.classify(hostname);
        Reconcile::Rebuild(RebuildPlan::for_site(hostname, site))
    }
}

impl Default for MenuReconciler {
    fn default() -> Self {
        Self::new(SiteTable::default())
    }
}
