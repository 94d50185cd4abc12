//! Page queries that cross the page boundary
//!
//! A query is plain data: a selector, a rule for choosing among the matches
//! and a post-process step applied to the chosen element. The page side
//! decodes it into a pure function over the rendered document.

use serde::{Deserialize, Serialize};

/// Rule for choosing one element among all matches of a selector.
///
/// On the wire the policy is a raw index: `-1` selects the last match, a
/// non-negative value selects that position and anything else selects the
/// first match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum IndexPolicy {
    #[default]
    First,
    Last,
    At(usize),
}

impl IndexPolicy {
    /// Decode the raw index used by keyboard commands and the wire format
    pub fn from_raw(index: i64) -> Self {
        match index {
            -1 => IndexPolicy::Last,
            0 => IndexPolicy::First,
            n if n > 0 => IndexPolicy::At(n as usize),
            _ => IndexPolicy::First,
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            IndexPolicy::First => 0,
            IndexPolicy::Last => -1,
            IndexPolicy::At(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }

    /// Position to pick among `count` matches, `None` when there are none.
    ///
    /// An out-of-range `At` falls back to the first match.
    pub fn pick(self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        match self {
            IndexPolicy::Last => Some(count - 1),
            IndexPolicy::At(n) if n < count => Some(n),
            _ => Some(0),
        }
    }
}

impl From<i64> for IndexPolicy {
    fn from(index: i64) -> Self {
        IndexPolicy::from_raw(index)
    }
}

impl From<IndexPolicy> for i64 {
    fn from(policy: IndexPolicy) -> Self {
        policy.to_raw()
    }
}

/// Selector plus index policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionQuery {
    pub selector: String,
    #[serde(default)]
    pub index: IndexPolicy,
}

impl ExtractionQuery {
    pub fn first(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            index: IndexPolicy::First,
        }
    }

    pub fn with_index(selector: impl Into<String>, index: IndexPolicy) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

/// What to read from the chosen element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcess {
    /// Trimmed inner text
    #[default]
    Text,
    /// Raw attribute value
    Attribute { name: String },
    /// Trimmed inner text plus an attribute of the ancestor `levels` up
    AncestorAttribute { levels: usize, name: String },
    /// Trimmed text and resolved `href` of the first `selector` match
    /// inside the chosen element
    NestedLink { selector: String },
}

/// A full round trip to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub query: ExtractionQuery,
    #[serde(default)]
    pub post: PostProcess,
}

/// Value returned by the page side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageValue {
    Text { text: String },
    Pair { text: String, detail: String },
}

/// Outcome of a plain text lookup. `text` is empty whenever `found` is false.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub found: bool,
    pub text: String,
}

impl ExtractionResult {
    pub fn found(text: impl Into<String>) -> Self {
        Self {
            found: true,
            text: text.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }
}
