//! Metadata key naming.

use serde::{Deserialize, Serialize};

/// Default prefix of fragment and auxiliary keys.
pub const DEFAULT_PREFIX: &str = "lore_";

/// Default key holding the whole text in a single value.
pub const DEFAULT_RAW_KEY: &str = "loreRaw";

/// Names of the keys a lore text occupies in a metadata map.
///
/// Fragments are stored under `<prefix><index>` with a 1-based index and no
/// zero padding. Auxiliary keys are `<prefix>len`, `<prefix>head` and
/// `<prefix>count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SchemeRepr", into = "SchemeRepr")]
pub struct KeyScheme {
    prefix: String,
    raw_key: String,
    len_key: String,
    head_key: String,
    count_key: String,
}

#[derive(Serialize, Deserialize)]
struct SchemeRepr {
    prefix: String,
    raw_key: String,
}

impl From<SchemeRepr> for KeyScheme {
    fn from(repr: SchemeRepr) -> Self {
        Self::new(repr.prefix).with_raw_key(repr.raw_key)
    }
}

impl From<KeyScheme> for SchemeRepr {
    fn from(scheme: KeyScheme) -> Self {
        Self {
            prefix: scheme.prefix,
            raw_key: scheme.raw_key,
        }
    }
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl KeyScheme {
    /// Creates a scheme for the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            len_key: format!("{prefix}len"),
            head_key: format!("{prefix}head"),
            count_key: format!("{prefix}count"),
            raw_key: DEFAULT_RAW_KEY.to_owned(),
            prefix,
        }
    }

    /// Sets the single-value key read as a fallback.
    pub fn with_raw_key(mut self, raw_key: impl Into<String>) -> Self {
        self.raw_key = raw_key.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    pub fn len_key(&self) -> &str {
        &self.len_key
    }

    pub fn head_key(&self) -> &str {
        &self.head_key
    }

    pub fn count_key(&self) -> &str {
        &self.count_key
    }

    /// Returns the key of the fragment at 1-based `index`.
    pub fn fragment_key(&self, index: usize) -> String {
        format!("{}{index}", self.prefix)
    }

    /// Returns the fragment index encoded in `key`.
    ///
    /// Only canonical positive decimals match: no sign, no leading zero.
    pub fn fragment_index(&self, key: &str) -> Option<usize> {
        let digits = key.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|byte| byte.is_ascii_digit())
        {
            return None;
        }

        digits.parse().ok()
    }
}
