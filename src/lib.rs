//! Copy page snippets from browser tabs
//!
//! Extracts short snippets from the rendered page of a tab and puts them on
//! the clipboard:
//! - Page title and link, through a user template
//! - Author and profile link on bilibili video pages
//! - Caption and video link on douyin pages
//! - Text of any element picked by a CSS selector
//!
//! The browser itself (tabs, clipboard, notifications, menus, settings
//! storage) is reached through the traits in [`host`], [`page`] and
//! [`settings`].

pub mod constants;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod host;
pub mod menu;
pub mod page;
pub mod query;
pub mod settings;
pub mod sites;
pub mod template;

#[cfg(test)]
mod testing;

pub use dispatch::{Action, CopyOutcome, Dispatcher};
pub use engine::{Engine, EngineConfig, EngineHandle, Event};
pub use error::{CopyError, Result};
pub use extractors::{PageSnapshot, SiteRule, Snippet};
pub use host::{Host, Tab, TabId};
pub use menu::{MenuReconciler, Reconcile, RebuildPlan};
pub use page::{PageAccessor, SnapshotPage};
pub use query::{ExtractionQuery, ExtractionResult, IndexPolicy, PageRequest, PageValue, PostProcess};
pub use settings::{MemorySettingsStore, Settings, SettingsProvider, SettingsStore};
pub use sites::{SiteKey, SiteTable};
pub use template::{format_template, TemplateVars};
