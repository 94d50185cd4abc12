//! Serialized event loop tying the host events to the engine
//!
//! All events go through one queue drained by a single task. A menu rebuild
//! (remove all, settle, create) therefore always finishes before the next
//! event is looked at, and two rapid tab switches cannot interleave their
//! rebuilds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::{MENU_LABEL_WIDTH, REBUILD_SETTLE_DELAY};
use crate::dispatch::{Action, CopyOutcome, Dispatcher};
use crate::error::{CopyError, Result};
use crate::host::{Host, Tab};
use crate::menu::{MenuReconciler, Reconcile};
use crate::sites::SiteTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Installed,
    Startup,
    TabActivated,
    /// Only sent once the page has finished loading
    NavigationCompleted,
    SettingsChanged,
    Command {
        name: String,
    },
    MenuClicked {
        item_id: String,
        #[serde(default)]
        link_url: Option<String>,
        #[serde(default)]
        tab: Option<Tab>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub settle_delay_ms: u64,
    pub label_width: usize,
    pub sites: SiteTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: REBUILD_SETTLE_DELAY.as_millis() as u64,
            label_width: MENU_LABEL_WIDTH,
            sites: SiteTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

pub struct Engine {
    host: Host,
    config: EngineConfig,
    reconciler: MenuReconciler,
    dispatcher: Dispatcher,
}

impl Engine {
    pub fn new(host: Host, config: EngineConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(&host),
            reconciler: MenuReconciler::new(config.sites.clone()),
            host,
            config,
        }
    }

    pub fn reconciler(&self) -> &MenuReconciler {
        &self.reconciler
    }

    /// Start draining events on a tokio task
    pub fn spawn(self) -> EngineHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(receiver));
        EngineHandle { sender, task }
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle(event).await {
                log::warn!("event failed: {}", e);
            }
        }
        log::debug!("event queue closed");
    }

    /// Process a single event to completion
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Installed
            | Event::Startup
            | Event::TabActivated
            | Event::NavigationCompleted
            | Event::SettingsChanged => self.refresh_menu().await,
            Event::Command { name } => {
                let Some(tab) = self.host.tabs.active_tab().await? else {
                    return Ok(());
                };
                match Action::from_command(&name) {
                    Some(action) => self.run_action(&action, &tab).await,
                    None => {
                        log::debug!("ignoring unknown command {:?}", name);
                        Ok(())
                    }
                }
            }
            Event::MenuClicked {
                item_id,
                link_url,
                tab,
            } => {
                let Some(tab) = tab else {
                    return Ok(());
                };
                match Action::from_menu_item(&item_id, link_url.as_deref()) {
                    Some(action) => self.run_action(&action, &tab).await,
                    None => {
                        log::debug!("ignoring unknown menu item {:?}", item_id);
                        Ok(())
                    }
                }
            }
        }
    }

    async fn run_action(&self, action: &Action, tab: &Tab) -> Result<()> {
        match self.dispatcher.dispatch(action, tab).await? {
            CopyOutcome::Copied(_) => log::debug!("{:?} done", action),
            CopyOutcome::NotFound { selector } => {
                log::debug!("{:?} found nothing for {:?}", action, selector)
            }
        }
        Ok(())
    }

    /// Reconcile the menu with the active tab; no tab or an unusable URL leaves it alone
    async fn refresh_menu(&mut self) -> Result<()> {
        let Some(tab) = self.host.tabs.active_tab().await? else {
            return Ok(());
        };
        let Some(hostname) = tab.hostname() else {
            return Ok(());
        };

        match self.reconciler.reconcile(&hostname) {
            Reconcile::Unchanged => Ok(()),
            Reconcile::Rebuild(plan) => {
                plan.apply(
                    self.host.menus.as_ref(),
                    self.host.commands.as_ref(),
                    self.config.settle_delay(),
                    self.config.label_width,
                )
                .await
            }
        }
    }
}

/// Sending side of a running engine
pub struct EngineHandle {
    sender: mpsc::UnboundedSender<Event>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    pub fn send(&self, event: Event) -> Result<()> {
        self.sender.send(event).map_err(|_| CopyError::EngineStopped)
    }

    /// Close the queue and wait until every queued event is processed
    pub async fn shutdown(self) -> Result<()> {
        drop(self.sender);
        self.task.await.map_err(|_| CopyError::EngineStopped)
    }
}
