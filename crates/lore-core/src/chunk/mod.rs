//! Chunk codec for texts stored in bounded key/value metadata.
//!
//! Payment providers cap metadata values at a few hundred characters and
//! cap the number of keys, so a long text is split into numbered fragments
//! on the way in and reassembled on the way out:
//!
//! - [`encode`]: partitions a text into `<prefix><n>` fragments plus the
//!   `<prefix>len`, `<prefix>head` and `<prefix>count` auxiliary keys.
//! - [`decode`]: reads any superset map and falls back through
//!   [`DecodeTier`]s when fragments are missing.
//! - [`FragmentLimits::validate`]: checks limits against a
//!   [`MetadataCeiling`] once, when configuration is built.
//!
//! Both directions are pure functions of their inputs.

mod decode;
mod encode;
mod limits;
mod scheme;

pub use decode::{DecodeTier, Decoded, decode};
pub use encode::{Encoded, encode};
pub use limits::{
    AUXILIARY_KEY_COUNT, DEFAULT_FRAGMENT_COUNT, DEFAULT_FRAGMENT_LEN, DEFAULT_PREVIEW_LEN,
    FragmentLimits, LimitsError, MetadataCeiling,
};
pub use scheme::{DEFAULT_PREFIX, DEFAULT_RAW_KEY, KeyScheme};

use crate::TRACING_TARGET_CHUNK;

/// Limits and key scheme bundled together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoreCodec {
    limits: FragmentLimits,
    scheme: KeyScheme,
}

impl LoreCodec {
    /// Creates a codec after checking `limits` against `ceiling`.
    pub fn new(
        limits: FragmentLimits,
        scheme: KeyScheme,
        ceiling: &MetadataCeiling,
        plain_keys: usize,
    ) -> Result<Self, LimitsError> {
        limits.validate(&scheme, ceiling, plain_keys)?;
        Ok(Self { limits, scheme })
    }

    pub fn limits(&self) -> &FragmentLimits {
        &self.limits
    }

    pub fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    /// Encodes `text`, logging when characters are dropped.
    pub fn encode(&self, text: &str) -> Encoded {
        let encoded = encode(text, &self.limits, &self.scheme);
        if encoded.is_truncated() {
            tracing::warn!(
                target: TRACING_TARGET_CHUNK,
                original_len = encoded.original_len(),
                capacity = self.limits.capacity(),
                "Lore text truncated to fragment capacity"
            );
        }

        tracing::trace!(
            target: TRACING_TARGET_CHUNK,
            fragments = encoded.fragment_count(),
            keys = encoded.len(),
            "Lore text encoded"
        );

        encoded
    }

    /// Decodes a text from any map that may carry lore keys.
    pub fn decode<I, K, V>(&self, entries: I) -> Decoded
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let decoded = decode(entries, &self.scheme);
        tracing::trace!(
            target: TRACING_TARGET_CHUNK,
            tier = %decoded.tier(),
            fragments = decoded.fragment_count(),
            declared_len = ?decoded.declared_len(),
            "Lore text decoded"
        );

        decoded
    }
}

impl From<LimitsError> for crate::Error {
    fn from(error: LimitsError) -> Self {
        crate::Error::configuration()
            .with_message(error.to_string())
            .with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn codec(max_len: usize, max_count: usize) -> LoreCodec {
        LoreCodec::new(
            FragmentLimits::new(max_len, max_count),
            KeyScheme::default(),
            &MetadataCeiling::STRIPE,
            3,
        )
        .expect("limits fit the ceiling")
    }

    const SAMPLES: &[&str] = &[
        "",
        "a",
        "Hello, Runeterra!",
        "Tell me lamb, who is Leviathan?\nThe tide that swallowed Bilgewater, little wolf.",
        "🐺🐑 Wolf et Agneau — «dis-moi, agneau» ✨",
    ];

    #[test]
    fn round_trips_within_capacity() {
        for (max_len, max_count) in [(1, 50 - 3 - 3), (5, 10), (7, 12), (450, 30)] {
            let codec = codec(max_len, max_count);
            for text in SAMPLES {
                if text.chars().count() > codec.limits().capacity() {
                    continue;
                }
                let decoded = codec.decode(codec.encode(text).entries());
                assert_eq!(decoded.text(), *text, "L={max_len} N={max_count}");
                assert!(!decoded.is_incomplete());
            }
        }
    }

    #[test]
    fn truncates_to_capacity_prefix() {
        let codec = codec(5, 3);
        let text = "Tell me lamb, who is OogieBoogie?";
        let encoded = codec.encode(text);
        assert!(encoded.is_truncated());

        let decoded = codec.decode(encoded.entries());
        let expected: String = text.chars().take(15).collect();
        assert_eq!(decoded.text(), expected);
        assert!(decoded.is_incomplete());
    }

    #[test]
    fn encoded_empty_text_is_not_absent() {
        let codec = LoreCodec::default();
        let map = codec.encode("").into_map();
        assert_eq!(map["lore_len"], "0");
        assert!(map.keys().all(|key| codec.scheme().fragment_index(key).is_none()));

        let empty = codec.decode(&map);
        assert_eq!(empty.tier(), DecodeTier::Empty);
        assert_eq!(empty.text(), "");
        assert!(!empty.is_absent());

        let unrelated = BTreeMap::from([("pseudo".to_owned(), "Himmel".to_owned())]);
        let absent = codec.decode(&unrelated);
        assert_eq!(absent.tier(), DecodeTier::Absent);
        assert!(absent.is_absent());
        assert_ne!(empty.tier(), absent.tier());
    }

    #[test]
    fn hello_runeterra_fixture() {
        let codec = codec(5, 10);
        let map = codec.encode("Hello, Runeterra!").into_map();

        assert_eq!(map["lore_1"], "Hello");
        assert_eq!(map["lore_2"], ", Run");
        assert_eq!(map["lore_3"], "eterr");
        assert_eq!(map["lore_4"], "a!");
        assert_eq!(codec.decode(&map).text(), "Hello, Runeterra!");
    }

    #[test]
    fn reencoding_a_decoded_map_is_stable() {
        let codec = codec(6, 8);
        let original = codec.encode("Tell me lamb, who is Chrispi?").into_map();

        let decoded = codec.decode(&original);
        let again: BTreeMap<String, String> = codec.encode(decoded.text()).into_map();
        assert_eq!(again, original);
    }

    #[test]
    fn decodes_a_superset_map() {
        let codec = LoreCodec::default();
        let mut map = codec.encode("A lore among payments").into_map();
        map.insert("pseudo".into(), "Himmel".into());
        map.insert("genre".into(), "epic".into());
        map.insert("role".into(), "support".into());

        let decoded = codec.decode(&map);
        assert_eq!(decoded.text(), "A lore among payments");
        assert_eq!(decoded.tier(), DecodeTier::Fragments);
    }

    #[test]
    fn rejects_limits_over_the_ceiling() {
        let error = LoreCodec::new(
            FragmentLimits::new(600, 10),
            KeyScheme::default(),
            &MetadataCeiling::STRIPE,
            0,
        )
        .unwrap_err();

        let error: crate::Error = error.into();
        assert_eq!(error.kind(), crate::ErrorKind::Configuration);
    }
}
