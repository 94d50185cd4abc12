//! User settings and the store they live in

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::constants::{DEFAULT_BILIBILI_SELECTOR, DEFAULT_DOUYIN_SELECTOR, DEFAULT_TEMPLATE};
use crate::error::Result;
use crate::sites::SiteKey;

/// Per-site selectors, keyed as they are in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    #[serde(default = "default_bilibili")]
    pub bilibili: String,
    #[serde(default = "default_douyin")]
    pub douyin: String,
}

fn default_bilibili() -> String {
    DEFAULT_BILIBILI_SELECTOR.to_string()
}

fn default_douyin() -> String {
    DEFAULT_DOUYIN_SELECTOR.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            bilibili: default_bilibili(),
            douyin: default_douyin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Copy template, stored under `format`
    #[serde(rename = "format", default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub selectors: Selectors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template: default_template(),
            selectors: Selectors::default(),
        }
    }
}

impl Settings {
    pub fn selector(&self, site: SiteKey) -> Option<&str> {
        match site {
            SiteKey::Generic => None,
            SiteKey::Bilibili => Some(&self.selectors.bilibili),
            SiteKey::Douyin => Some(&self.selectors.douyin),
        }
    }

    /// Replace empty values with the defaults, leaving the rest untouched
    pub fn filled(self) -> Self {
        self.map_values(|value, default| if value.is_empty() { default } else { value })
    }

    /// Trim every value and replace blank ones with the defaults
    pub fn normalized(self) -> Self {
        self.map_values(|value, default| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default
            } else {
                trimmed.to_string()
            }
        })
    }

    fn map_values(self, f: impl Fn(String, String) -> String) -> Self {
        let defaults = Settings::default();
        Self {
            template: f(self.template, defaults.template),
            selectors: Selectors {
                bilibili: f(self.selectors.bilibili, defaults.selectors.bilibili),
                douyin: f(self.selectors.douyin, defaults.selectors.douyin),
            },
        }
    }
}

/// Persistent key-value settings storage
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored settings, with `defaults` for anything missing
    async fn get(&self, defaults: &Settings) -> Result<Settings>;
    async fn set(&self, settings: &Settings) -> Result<()>;
}

/// Resolves effective settings on every call, nothing is cached
#[derive(Clone)]
pub struct SettingsProvider {
    store: Arc<dyn SettingsStore>,
}

impl SettingsProvider {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Stored settings as written, with defaults for missing or empty values
    pub async fn load(&self) -> Result<Settings> {
        let settings = self.store.get(&Settings::default()).await?;
        Ok(settings.filled())
    }

    /// Normalize and persist, returning what was stored
    pub async fn save(&self, settings: Settings) -> Result<Settings> {
        let settings = settings.normalized();
        self.store.set(&settings).await?;
        log::info!("settings saved");
        Ok(settings)
    }
}

/// Store backed by an in-memory JSON object, one entry per top-level key
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    items: RwLock<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a raw stored object such as `{"format": "..."}`
    pub fn from_json(raw: &str) -> Result<Self> {
        let items: HashMap<String, Value> = serde_json::from_str(raw)?;
        Ok(Self {
            items: RwLock::new(items),
        })
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, defaults: &Settings) -> Result<Settings> {
        let mut merged = match serde_json::to_value(defaults)? {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in self.items.read().await.iter() {
            merged.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    async fn set(&self, settings: &Settings) -> Result<()> {
        let Value::Object(map) = serde_json::to_value(settings)? else {
            return Ok(());
        };
        let mut items = self.items.write().await;
        items.extend(map);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let provider = SettingsProvider::new(Arc::new(MemorySettingsStore::new()));
        let settings = provider.load().await.unwrap();

        assert_eq!(settings.template, "- ${link}\n- ${title}");
        assert_eq!(settings.selector(SiteKey::Bilibili), Some(".up-detail-top"));
        assert_eq!(settings.selector(SiteKey::Douyin), Some(".title"));
        assert_eq!(settings.selector(SiteKey::Generic), None);
    }

    #[tokio::test]
    async fn test_partial_selectors_filled() {
        let store = MemorySettingsStore::from_json(
            r#"{"format": "[${title}](${link})", "selectors": {"douyin": ".caption"}}"#,
        )
        .unwrap();
        let settings = SettingsProvider::new(Arc::new(store)).load().await.unwrap();

        assert_eq!(settings.template, "[${title}](${link})");
        assert_eq!(settings.selectors.douyin, ".caption");
        assert_eq!(settings.selectors.bilibili, ".up-detail-top");
    }

    #[tokio::test]
    async fn test_empty_values_fall_back() {
        let store =
            MemorySettingsStore::from_json(r#"{"format": "", "selectors": {"bilibili": ""}}"#)
                .unwrap();
        let settings = SettingsProvider::new(Arc::new(store)).load().await.unwrap();

        assert_eq!(settings.template, DEFAULT_TEMPLATE);
        assert_eq!(settings.selectors.bilibili, DEFAULT_BILIBILI_SELECTOR);
    }

    #[tokio::test]
    async fn test_load_keeps_stored_whitespace() {
        let store = MemorySettingsStore::from_json(
            r#"{"format": "- ${link}\n- ${title}\n", "selectors": {"douyin": " .caption"}}"#,
        )
        .unwrap();
        let settings = SettingsProvider::new(Arc::new(store)).load().await.unwrap();

        assert_eq!(settings.template, "- ${link}\n- ${title}\n");
        assert_eq!(settings.selectors.douyin, " .caption");
    }

    #[tokio::test]
    async fn test_save_is_seen_by_next_load() {
        let provider = SettingsProvider::new(Arc::new(MemorySettingsStore::new()));
        let saved = provider
            .save(Settings {
                template: " ${title} ".to_string(),
                selectors: Selectors {
                    bilibili: " .author ".to_string(),
                    douyin: String::new(),
                },
            })
            .await
            .unwrap();

        assert_eq!(saved.template, "${title}");
        assert_eq!(saved.selectors.douyin, DEFAULT_DOUYIN_SELECTOR);
        assert_eq!(provider.load().await.unwrap(), saved);
    }
}
