//! Page-side evaluation and per-site rules
//!
//! `css_extractor` runs on the rendered document; `site_rules` runs in the
//! engine and reaches the page through `PageAccessor`.

mod css_extractor;
mod site_rules;

pub use css_extractor::*;
pub use site_rules::*;
