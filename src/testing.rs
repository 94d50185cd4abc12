//! Recording fakes for the host capabilities

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{CopyError, Result};
use crate::host::{
    Clipboard, CommandBinding, CommandRegistry, Host, MenuEntry, MenuRegistry, Notifier, Tab,
    TabId, TabSource,
};
use crate::page::SnapshotPage;
use crate::settings::MemorySettingsStore;

#[derive(Default)]
pub struct RecordingMenu {
    calls: Mutex<Vec<String>>,
    entries: Mutex<Vec<MenuEntry>>,
}

impl RecordingMenu {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MenuRegistry for RecordingMenu {
    async fn remove_all(&self) -> Result<()> {
        self.calls.lock().unwrap().push("remove_all".to_string());
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    async fn create(&self, entry: &MenuEntry) -> Result<()> {
        self.calls.lock().unwrap().push(format!("create {}", entry.id));
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct StaticCommands {
    pub bindings: Vec<CommandBinding>,
}

#[async_trait]
impl CommandRegistry for StaticCommands {
    async fn commands(&self) -> Result<Vec<CommandBinding>> {
        Ok(self.bindings.clone())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<(TabId, String)>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn writes(&self) -> Vec<(TabId, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.writes.lock().unwrap().last().map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write(&self, tab: TabId, text: &str) -> Result<()> {
        if self.fail {
            return Err(CopyError::Clipboard("denied".to_string()));
        }
        self.writes.lock().unwrap().push((tab, text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTabs {
    active: Mutex<Option<Tab>>,
}

impl FakeTabs {
    pub fn activate(&self, tab: Option<Tab>) {
        *self.active.lock().unwrap() = tab;
    }
}

#[async_trait]
impl TabSource for FakeTabs {
    async fn active_tab(&self) -> Result<Option<Tab>> {
        Ok(self.active.lock().unwrap().clone())
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tab(id: TabId, url: &str, title: &str) -> Tab {
    Tab {
        id,
        url: Some(url.to_string()),
        title: Some(title.to_string()),
    }
}

/// Every fake, kept alongside the `Host` that shares them
pub struct Fakes {
    pub tabs: Arc<FakeTabs>,
    pub page: Arc<SnapshotPage>,
    pub clipboard: Arc<RecordingClipboard>,
    pub notifier: Arc<RecordingNotifier>,
    pub menus: Arc<RecordingMenu>,
    pub settings: Arc<MemorySettingsStore>,
}

impl Fakes {
    pub fn new() -> Self {
        Self::with(RecordingClipboard::default(), MemorySettingsStore::new())
    }

    pub fn with(clipboard: RecordingClipboard, settings: MemorySettingsStore) -> Self {
        Self {
            tabs: Arc::new(FakeTabs::default()),
            page: Arc::new(SnapshotPage::new()),
            clipboard: Arc::new(clipboard),
            notifier: Arc::new(RecordingNotifier::default()),
            menus: Arc::new(RecordingMenu::default()),
            settings: Arc::new(settings),
        }
    }

    pub fn host(&self, commands: StaticCommands) -> Host {
        Host {
            tabs: self.tabs.clone(),
            page: self.page.clone(),
            clipboard: self.clipboard.clone(),
            notifier: self.notifier.clone(),
            menus: self.menus.clone(),
            commands: Arc::new(commands),
            settings: self.settings.clone(),
        }
    }
}
