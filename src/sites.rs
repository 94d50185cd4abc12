//! Site classification by hostname

use serde::{Deserialize, Serialize};

use crate::constants::{BILIBILI_HOST, DOUYIN_HOST};

/// Sites with a dedicated extraction rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteKey {
    Generic,
    /// Author attribution on video pages
    Bilibili,
    /// Video caption on feed pages
    Douyin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMatch {
    pub host_contains: String,
    pub site: SiteKey,
}

/// Ordered `(hostname substring, site)` pairs.
///
/// Classification walks the table in order and the first entry whose
/// substring occurs in the hostname wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SiteMatch>", into = "Vec<SiteMatch>")]
pub struct SiteTable {
    entries: Vec<SiteMatch>,
}

impl SiteTable {
    pub fn new(entries: Vec<SiteMatch>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| SiteMatch {
                host_contains: entry.host_contains.to_lowercase(),
                site: entry.site,
            })
            .collect();
        Self { entries }
    }

    pub fn classify(&self, hostname: &str) -> SiteKey {
        let hostname = hostname.to_lowercase();
        self.entries
            .iter()
            .find(|entry| hostname.contains(&entry.host_contains))
            .map(|entry| entry.site)
            .unwrap_or(SiteKey::Generic)
    }
}

impl From<Vec<SiteMatch>> for SiteTable {
    fn from(entries: Vec<SiteMatch>) -> Self {
        SiteTable::new(entries)
    }
}

impl From<SiteTable> for Vec<SiteMatch> {
    fn from(table: SiteTable) -> Self {
        table.entries
    }
}

impl Default for SiteTable {
    fn default() -> Self {
        Self::new(vec![
            SiteMatch {
                host_contains: BILIBILI_HOST.to_string(),
                site: SiteKey::Bilibili,
            },
            SiteMatch {
                host_contains: DOUYIN_HOST.to_string(),
                site: SiteKey::Douyin,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = SiteTable::default();
        assert_eq!(table.classify("www.bilibili.com"), SiteKey::Bilibili);
        assert_eq!(table.classify("space.bilibili.com"), SiteKey::Bilibili);
        assert_eq!(table.classify("www.douyin.com"), SiteKey::Douyin);
        assert_eq!(table.classify("example.org"), SiteKey::Generic);
        assert_eq!(table.classify(""), SiteKey::Generic);
    }

    #[test]
    fn test_first_match_wins() {
        let table = SiteTable::new(vec![
            SiteMatch {
                host_contains: "site-a.example".to_string(),
                site: SiteKey::Bilibili,
            },
            SiteMatch {
                host_contains: "example".to_string(),
                site: SiteKey::Douyin,
            },
        ]);
        assert_eq!(table.classify("www.site-a.example"), SiteKey::Bilibili);
        assert_eq!(table.classify("site-b.example"), SiteKey::Douyin);
    }

    #[test]
    fn test_deserialize() {
        let table: SiteTable = serde_json::from_str(
            r#"[{"host_contains": "site-b.example", "site": "douyin"}]"#,
        )
        .unwrap();
        assert_eq!(table.classify("m.site-b.example"), SiteKey::Douyin);
        assert_eq!(table.classify("www.bilibili.com"), SiteKey::Generic);
    }

    #[test]
    fn test_entries_ignore_case() {
        let table = SiteTable::new(vec![SiteMatch {
            host_contains: "Site-B.example".to_string(),
            site: SiteKey::Douyin,
        }]);
        assert_eq!(table.classify("m.site-b.example"), SiteKey::Douyin);

        let table: SiteTable =
            serde_json::from_str(r#"[{"host_contains": "SITE-A.example", "site": "bilibili"}]"#)
                .unwrap();
        assert_eq!(table.classify("WWW.Site-A.Example"), SiteKey::Bilibili);
    }
}
