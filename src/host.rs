//! Capabilities provided by the embedding browser host
//!
//! The engine never talks to the browser directly. Each primitive it needs
//! (tabs, clipboard, notifications, menus, shortcuts) is a trait the host
//! implements.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::page::PageAccessor;
use crate::settings::SettingsStore;

pub type TabId = i64;

/// Snapshot of a browser tab as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Tab {
    /// Hostname of the tab URL.
    ///
    /// `None` only when there is no URL or it does not parse. URLs without a
    /// host (`file:`, `about:`, `data:`) give an empty hostname.
    pub fn hostname(&self) -> Option<String> {
        let parsed = url::Url::parse(self.url.as_deref()?).ok()?;
        Some(parsed.host_str().unwrap_or_default().to_lowercase())
    }
}

/// Where a context menu entry is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    Page,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    pub label: String,
    pub contexts: Vec<MenuContext>,
}

/// Keyboard command as registered with the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBinding {
    pub name: String,
    #[serde(default)]
    pub shortcut: Option<String>,
}

#[async_trait]
pub trait TabSource: Send + Sync {
    /// Active tab of the current window
    async fn active_tab(&self) -> Result<Option<Tab>>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write(&self, tab: TabId, text: &str) -> Result<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}

#[async_trait]
pub trait MenuRegistry: Send + Sync {
    async fn remove_all(&self) -> Result<()>;
    async fn create(&self, entry: &MenuEntry) -> Result<()>;
}

#[async_trait]
pub trait CommandRegistry: Send + Sync {
    async fn commands(&self) -> Result<Vec<CommandBinding>>;
}

/// Everything the engine needs from the host
#[derive(Clone)]
pub struct Host {
    pub tabs: Arc<dyn TabSource>,
    pub page: Arc<dyn PageAccessor>,
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    pub menus: Arc<dyn MenuRegistry>,
    pub commands: Arc<dyn CommandRegistry>,
    pub settings: Arc<dyn SettingsStore>,
}
