//! Query-to-key normalization policies

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static WHITESPACE_AND_PUNCTUATION: OnceLock<Regex> = OnceLock::new();

fn separators() -> &'static Regex {
    WHITESPACE_AND_PUNCTUATION
        .get_or_init(|| Regex::new(r"[\s\p{P}]+").expect("static regex is valid"))
}

/// How a raw query is turned into a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// The raw query text is the key
    #[default]
    Exact,
    /// All Unicode whitespace and punctuation is removed; a query made only
    /// of separators keeps its trimmed raw text as the key
    Compact,
}

impl KeyPolicy {
    /// Derive the cache key for a raw query
    pub fn normalize(&self, raw: &str) -> String {
        match self {
            KeyPolicy::Exact => raw.to_string(),
            KeyPolicy::Compact => {
                let compact = separators().replace_all(raw, "");
                if compact.is_empty() {
                    raw.trim().to_string()
                } else {
                    compact.into_owned()
                }
            }
        }
    }
}
