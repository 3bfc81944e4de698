// Time-stamped draft cache of source text per language
// Author: kelexine (https://github.com/kelexine)

use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Drafts older than this many milliseconds (7 days) are dropped on load.
pub const DRAFT_TTL_MS: i64 = 604_800_000;

/// Last source text entered for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub code: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl DraftEntry {
    /// Age past the TTL. A timestamp so far off that the age overflows
    /// counts as expired.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms
            .checked_sub(self.timestamp)
            .map_or(true, |age| age > DRAFT_TTL_MS)
    }
}

/// Drafts keyed by source language.
pub type DraftCache = BTreeMap<String, DraftEntry>;

/// Parse persisted draft data.
pub fn parse_drafts(raw: &str) -> Result<DraftCache> {
    serde_json::from_str(raw).map_err(|e| ConverterError::CacheParse(e.to_string()))
}

/// Remove expired drafts, returning how many were dropped.
pub fn prune_expired(drafts: &mut DraftCache, now_ms: i64) -> usize {
    let before = drafts.len();
    drafts.retain(|_, entry| !entry.is_expired(now_ms));
    before - drafts.len()
}

/// Result of loading persisted draft data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDrafts {
    pub drafts: DraftCache,
    /// The persisted form no longer matches `drafts` and should be rewritten.
    pub dirty: bool,
}

/// Load drafts from their persisted form.
///
/// Malformed data discards the whole draft cache; expired entries are
/// dropped individually.
pub fn load_drafts(raw: Option<&str>, now_ms: i64) -> LoadedDrafts {
    let Some(raw) = raw else {
        return LoadedDrafts {
            drafts: DraftCache::new(),
            dirty: false,
        };
    };

    let mut drafts = match parse_drafts(raw) {
        Ok(drafts) => drafts,
        Err(e) => {
            warn!("{}; starting with an empty draft cache", e);
            return LoadedDrafts {
                drafts: DraftCache::new(),
                dirty: true,
            };
        }
    };

    let expired = prune_expired(&mut drafts, now_ms);
    if expired > 0 {
        debug!("Dropped {} expired drafts", expired);
    }

    LoadedDrafts {
        drafts,
        dirty: expired > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 60 * 60 * 1000;
    const DAY_MS: i64 = 24 * HOUR_MS;
    const NOW: i64 = 1_760_000_000_000;

    #[test]
    fn test_stale_entry_dropped_fresh_entry_kept() {
        let raw = format!(
            r#"{{"Python":{{"code":"old","timestamp":{}}},"Go":{{"code":"new","timestamp":{}}}}}"#,
            NOW - 8 * DAY_MS,
            NOW - HOUR_MS
        );

        let loaded = load_drafts(Some(&raw), NOW);
        assert!(loaded.dirty);
        assert_eq!(loaded.drafts.len(), 1);
        assert_eq!(loaded.drafts["Go"].code, "new");
        assert!(!loaded.drafts.contains_key("Python"));
    }

    #[test]
    fn test_exactly_seven_days_is_kept() {
        let entry = DraftEntry {
            code: "x".to_string(),
            timestamp: NOW - DRAFT_TTL_MS,
        };
        assert!(!entry.is_expired(NOW));
        assert!(entry.is_expired(NOW + 1));
    }

    #[test]
    fn test_extreme_timestamp_counts_as_expired() {
        let entry = DraftEntry {
            code: "x".to_string(),
            timestamp: i64::MIN,
        };
        assert!(entry.is_expired(NOW));

        let raw = format!(r#"{{"Go":{{"code":"x","timestamp":{}}}}}"#, i64::MIN);
        let loaded = load_drafts(Some(&raw), NOW);
        assert!(loaded.drafts.is_empty());
        assert!(loaded.dirty);
    }

    #[test]
    fn test_malformed_data_discards_everything() {
        let loaded = load_drafts(Some(r#"{"Python": "not an entry"}"#), NOW);
        assert!(loaded.drafts.is_empty());
        assert!(loaded.dirty);

        let loaded = load_drafts(Some("]["), NOW);
        assert!(loaded.drafts.is_empty());
    }

    #[test]
    fn test_missing_data_is_clean() {
        let loaded = load_drafts(None, NOW);
        assert!(loaded.drafts.is_empty());
        assert!(!loaded.dirty);
    }

    #[test]
    fn test_parse_error_kind() {
        assert!(matches!(parse_drafts("nope"), Err(ConverterError::CacheParse(_))));
    }
}
