//! Persisted user preferences.
//!
//! Remembers the last-used input and output languages and a per-language
//! draft of the source text the user entered, each draft stamped with the
//! time it was saved and forgotten after seven days.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod drafts;
pub mod store;

pub use drafts::{DraftCache, DraftEntry, DRAFT_TTL_MS};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::config::PreferencesConfig;
use crate::error::{ConverterError, Result};
use crate::models::api::{LanguageSelection, PreferencesResponse};
use crate::models::mapping::{DEFAULT_INPUT_LANGUAGE, DEFAULT_OUTPUT_LANGUAGE};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

const INPUT_LANGUAGE_KEY: &str = "inputLanguage";
const OUTPUT_LANGUAGE_KEY: &str = "outputLanguage";
const CODE_CACHE_KEY: &str = "codeCache";

/// Preference service over a [`KeyValueStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write of the draft cache
    drafts_lock: Arc<Mutex<()>>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            drafts_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open the JSON file store named in the config.
    pub fn open(config: &PreferencesConfig) -> Result<Self> {
        let store = FileStore::open(&config.path)?;
        info!("Preferences stored at {}", store.path().display());
        Ok(Self::new(Arc::new(store)))
    }

    /// Volatile preferences, for tests and one-shot CLI runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Last-used languages, falling back to the catalog defaults.
    pub fn languages(&self) -> Result<LanguageSelection> {
        Ok(LanguageSelection {
            input_language: self
                .store
                .get(INPUT_LANGUAGE_KEY)?
                .unwrap_or_else(|| DEFAULT_INPUT_LANGUAGE.to_string()),
            output_language: self
                .store
                .get(OUTPUT_LANGUAGE_KEY)?
                .unwrap_or_else(|| DEFAULT_OUTPUT_LANGUAGE.to_string()),
        })
    }

    pub fn set_languages(&self, selection: &LanguageSelection) -> Result<()> {
        require_language(&selection.input_language)?;
        require_language(&selection.output_language)?;

        self.store.set(INPUT_LANGUAGE_KEY, &selection.input_language)?;
        self.store.set(OUTPUT_LANGUAGE_KEY, &selection.output_language)?;
        debug!(
            "Saved language selection {} -> {}",
            selection.input_language, selection.output_language
        );
        Ok(())
    }

    /// Unexpired drafts as of now.
    pub fn drafts(&self) -> Result<DraftCache> {
        self.drafts_at(now_millis())
    }

    /// Unexpired drafts as of `now_ms`. Expired or malformed data found in
    /// the store is cleaned up as a side effect.
    pub fn drafts_at(&self, now_ms: i64) -> Result<DraftCache> {
        let _guard = self.drafts_lock.lock();
        self.load_drafts_locked(now_ms)
    }

    fn load_drafts_locked(&self, now_ms: i64) -> Result<DraftCache> {
        let raw = self.store.get(CODE_CACHE_KEY)?;
        let loaded = drafts::load_drafts(raw.as_deref(), now_ms);
        if loaded.dirty {
            self.write_drafts(&loaded.drafts)?;
        }
        Ok(loaded.drafts)
    }

    fn write_drafts(&self, drafts: &DraftCache) -> Result<()> {
        let encoded = serde_json::to_string(drafts)?;
        self.store.set(CODE_CACHE_KEY, &encoded)
    }

    /// Unexpired draft for `language`.
    pub fn draft(&self, language: &str) -> Result<Option<String>> {
        Ok(self.drafts()?.remove(language).map(|entry| entry.code))
    }

    pub fn save_draft(&self, language: &str, code: &str) -> Result<()> {
        self.save_draft_at(language, code, now_millis())
    }

    /// Store `code` as the draft for `language`, stamped `now_ms`.
    pub fn save_draft_at(&self, language: &str, code: &str, now_ms: i64) -> Result<()> {
        require_language(language)?;

        let _guard = self.drafts_lock.lock();
        let mut drafts = self.load_drafts_locked(now_ms)?;
        drafts.insert(
            language.to_string(),
            DraftEntry {
                code: code.to_string(),
                timestamp: now_ms,
            },
        );
        self.write_drafts(&drafts)
    }

    /// Languages plus drafts, as served over HTTP.
    pub fn snapshot(&self) -> Result<PreferencesResponse> {
        let languages = self.languages()?;
        let drafts = self
            .drafts()?
            .into_iter()
            .map(|(language, entry)| (language, entry.code))
            .collect();

        Ok(PreferencesResponse {
            input_language: languages.input_language,
            output_language: languages.output_language,
            drafts,
        })
    }
}

fn require_language(language: &str) -> Result<()> {
    if language.trim().is_empty() {
        return Err(ConverterError::InvalidRequest("language must not be empty".to_string()));
    }
    Ok(())
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_defaults() {
        let prefs = Preferences::in_memory();
        let languages = prefs.languages().unwrap();
        assert_eq!(languages.input_language, "JavaScript");
        assert_eq!(languages.output_language, "Python");
    }

    #[test]
    fn test_set_languages_rejects_blank() {
        let prefs = Preferences::in_memory();
        let selection = LanguageSelection {
            input_language: " ".to_string(),
            output_language: "Go".to_string(),
        };
        assert!(matches!(
            prefs.set_languages(&selection),
            Err(ConverterError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_extreme_stored_timestamp_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(CODE_CACHE_KEY, r#"{"Go":{"code":"x","timestamp":-9223372036854775808}}"#)
            .unwrap();
        let prefs = Preferences::new(store.clone());

        assert!(prefs.drafts_at(1_760_000_000_000).unwrap().is_empty());
        assert_eq!(store.get(CODE_CACHE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_save_draft_overwrites_same_language() {
        let prefs = Preferences::in_memory();
        prefs.save_draft_at("Go", "first", 1_000).unwrap();
        prefs.save_draft_at("Go", "second", 2_000).unwrap();

        let drafts = prefs.drafts_at(3_000).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts["Go"], DraftEntry { code: "second".to_string(), timestamp: 2_000 });
    }
}
