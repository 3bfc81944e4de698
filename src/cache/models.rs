//! Cache key and statistics models.

// Author: kelexine (https://github.com/kelexine)

use sha2::{Digest, Sha256};
use std::fmt;

/// Composite key for a memoized remote result.
///
/// Parts are kept apart rather than joined into one string, so no choice of
/// language names can make two different requests share a key. The source
/// code is kept verbatim: no trimming and no case folding, so any byte
/// difference yields a distinct entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Conversion {
        source_language: String,
        target_language: String,
        source_code: String,
    },
    Explanation {
        language: String,
        code: String,
    },
}

impl CacheKey {
    pub fn conversion(source_language: &str, target_language: &str, source_code: &str) -> Self {
        Self::Conversion {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            source_code: source_code.to_string(),
        }
    }

    pub fn explanation(language: &str, code: &str) -> Self {
        Self::Explanation {
            language: language.to_string(),
            code: code.to_string(),
        }
    }

    fn parts(&self) -> (&'static str, Vec<&str>) {
        match self {
            Self::Conversion {
                source_language,
                target_language,
                source_code,
            } => (
                "conversion",
                vec![
                    source_language.as_str(),
                    target_language.as_str(),
                    source_code.as_str(),
                ],
            ),
            Self::Explanation { language, code } => {
                ("explanation", vec![language.as_str(), code.as_str()])
            }
        }
    }

    /// Short SHA-256 digest, safe to put in logs.
    pub fn digest(&self) -> String {
        let (kind, parts) = self.parts();
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        for part in parts {
            // Length prefix keeps part boundaries in the hash input
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }
        format!("{:x}", hasher.finalize())[..16].to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest())
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of successful cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries written.
    pub stores: u64,
}
