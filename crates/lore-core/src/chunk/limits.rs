//! Fragment size limits and the metadata ceilings they are checked against.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::KeyScheme;

/// Default maximum fragment length in characters.
pub const DEFAULT_FRAGMENT_LEN: usize = 450;

/// Default maximum number of fragments.
pub const DEFAULT_FRAGMENT_COUNT: usize = 30;

/// Default preview length in characters.
pub const DEFAULT_PREVIEW_LEN: usize = 80;

/// Number of auxiliary keys written next to the fragments.
pub const AUXILIARY_KEY_COUNT: usize = 3;

/// Errors raised when limits do not fit the metadata ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitsError {
    #[error("fragment length must be at least 1")]
    ZeroFragmentLen,
    #[error("fragment count must be at least 1")]
    ZeroFragmentCount,
    #[error("fragment length {len} exceeds the per-value ceiling of {ceiling}")]
    FragmentTooLong { len: usize, ceiling: usize },
    #[error("preview length {len} exceeds the per-value ceiling of {ceiling}")]
    PreviewTooLong { len: usize, ceiling: usize },
    #[error("{required} metadata keys required but the ceiling is {ceiling}")]
    TooManyKeys { required: usize, ceiling: usize },
    #[error("key '{key}' exceeds the key length ceiling of {ceiling}")]
    KeyTooLong { key: String, ceiling: usize },
}

/// Ceilings imposed by the payment provider on a metadata map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataCeiling {
    /// Maximum characters per value.
    pub max_value_len: usize,
    /// Maximum number of keys in one map.
    pub max_keys: usize,
    /// Maximum characters per key.
    pub max_key_len: usize,
}

impl MetadataCeiling {
    /// Ceilings enforced by Stripe on checkout session metadata.
    pub const STRIPE: Self = Self {
        max_value_len: 500,
        max_keys: 50,
        max_key_len: 40,
    };
}

impl Default for MetadataCeiling {
    fn default() -> Self {
        Self::STRIPE
    }
}

/// Bounds applied when splitting a text into fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentLimits {
    /// Maximum fragment length in characters.
    pub max_len: usize,
    /// Maximum number of fragments.
    pub max_count: usize,
    /// Length of the preview stored next to the fragments.
    pub preview_len: usize,
}

impl Default for FragmentLimits {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_FRAGMENT_LEN,
            max_count: DEFAULT_FRAGMENT_COUNT,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

impl FragmentLimits {
    /// Creates limits with the given fragment length and count.
    pub fn new(max_len: usize, max_count: usize) -> Self {
        Self {
            max_len,
            max_count,
            ..Default::default()
        }
    }

    /// Sets the preview length.
    pub fn with_preview_len(mut self, preview_len: usize) -> Self {
        self.preview_len = preview_len;
        self
    }

    /// Number of characters that survive encoding.
    pub fn capacity(&self) -> usize {
        self.max_len.saturating_mul(self.max_count)
    }

    /// Checks these limits against `ceiling`.
    ///
    /// `plain_keys` is the number of caller-owned keys that share the map
    /// with the fragments and auxiliary keys.
    pub fn validate(
        &self,
        scheme: &KeyScheme,
        ceiling: &MetadataCeiling,
        plain_keys: usize,
    ) -> Result<(), LimitsError> {
        if self.max_len == 0 {
            return Err(LimitsError::ZeroFragmentLen);
        }
        if self.max_count == 0 {
            return Err(LimitsError::ZeroFragmentCount);
        }
        if self.max_len > ceiling.max_value_len {
            return Err(LimitsError::FragmentTooLong {
                len: self.max_len,
                ceiling: ceiling.max_value_len,
            });
        }
        if self.preview_len > ceiling.max_value_len {
            return Err(LimitsError::PreviewTooLong {
                len: self.preview_len,
                ceiling: ceiling.max_value_len,
            });
        }

        let required = self
            .max_count
            .saturating_add(AUXILIARY_KEY_COUNT)
            .saturating_add(plain_keys);
        if required > ceiling.max_keys {
            return Err(LimitsError::TooManyKeys {
                required,
                ceiling: ceiling.max_keys,
            });
        }

        let longest_fragment = scheme.fragment_key(self.max_count);
        let candidates = [
            longest_fragment.as_str(),
            scheme.len_key(),
            scheme.head_key(),
            scheme.count_key(),
            scheme.raw_key(),
        ];
        if let Some(key) = candidates
            .into_iter()
            .find(|key| key.chars().count() > ceiling.max_key_len)
        {
            return Err(LimitsError::KeyTooLong {
                key: key.to_owned(),
                ceiling: ceiling.max_key_len,
            });
        }

        Ok(())
    }
}
