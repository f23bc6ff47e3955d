//! Reassembling a text from a metadata map.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

use super::KeyScheme;

/// Which source the decoded text came from, in priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, IntoStaticStr,
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecodeTier {
    /// Concatenation of every present fragment.
    Fragments,
    /// The single full-text key.
    RawText,
    /// The length key declares an empty payload.
    Empty,
    /// Only the preview survived; the text is lossy.
    Preview,
    /// No lore keys at all.
    Absent,
}

/// A decoded text with the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    text: String,
    tier: DecodeTier,
    declared_len: Option<usize>,
    fragment_count: usize,
}

impl Decoded {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn tier(&self) -> DecodeTier {
        self.tier
    }

    /// Length recorded by the encoder, when the length key parses.
    pub fn declared_len(&self) -> Option<usize> {
        self.declared_len
    }

    /// Number of fragment keys that were concatenated.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Returns true if the text is only a preview of the original.
    pub fn is_lossy(&self) -> bool {
        self.tier == DecodeTier::Preview
    }

    /// Returns true if the map carried no payload at all.
    pub fn is_absent(&self) -> bool {
        self.tier == DecodeTier::Absent
    }

    /// Returns true if the text is known to differ from what was encoded.
    ///
    /// This covers lossy previews and reconstructions whose length disagrees
    /// with the declared length (missing fragments or encode-side truncation).
    pub fn is_incomplete(&self) -> bool {
        if self.is_lossy() {
            return true;
        }

        match (self.tier, self.declared_len) {
            (DecodeTier::Fragments | DecodeTier::RawText, Some(len)) => {
                self.text.chars().count() != len
            }
            _ => false,
        }
    }
}

/// Rebuilds a text from any map that may contain lore keys.
///
/// Unrelated keys are ignored. Fragments are ordered by their numeric
/// index and concatenated with gaps skipped; the raw key, the empty marker
/// and the preview are consulted in that order when no fragment exists.
pub fn decode<I, K, V>(entries: I, scheme: &KeyScheme) -> Decoded
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut fragments: Vec<(usize, String)> = Vec::new();
    let mut raw = None;
    let mut declared_len = None;
    let mut head = None;

    for (key, value) in entries {
        let (key, value) = (key.as_ref(), value.as_ref());
        if let Some(index) = scheme.fragment_index(key) {
            fragments.push((index, value.to_owned()));
        } else if key == scheme.raw_key() {
            raw = Some(value.to_owned());
        } else if key == scheme.len_key() {
            declared_len = Some(value.trim().parse::<usize>().ok());
        } else if key == scheme.head_key() {
            head = Some(value.to_owned());
        }
    }

    let declared = declared_len.flatten();
    let decoded = |text: String, tier: DecodeTier, fragment_count: usize| Decoded {
        text,
        tier,
        declared_len: declared,
        fragment_count,
    };

    if !fragments.is_empty() {
        fragments.sort_unstable_by_key(|(index, _)| *index);
        let count = fragments.len();
        let text = fragments.into_iter().map(|(_, value)| value).collect();
        return decoded(text, DecodeTier::Fragments, count);
    }

    if let Some(raw) = raw {
        return decoded(raw, DecodeTier::RawText, 0);
    }

    if declared == Some(0) {
        return decoded(String::new(), DecodeTier::Empty, 0);
    }

    match head {
        Some(head) if !head.is_empty() => decoded(head, DecodeTier::Preview, 0),
        _ => decoded(String::new(), DecodeTier::Absent, 0),
    }
}
