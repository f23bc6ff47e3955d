//! Splitting a text into metadata fragments.

use std::collections::BTreeMap;

use super::{FragmentLimits, KeyScheme};

/// Result of encoding a text: fragment entries plus auxiliary entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    entries: BTreeMap<String, String>,
    fragment_count: usize,
    original_len: usize,
    truncated: bool,
}

impl Encoded {
    /// Iterates over every key and value to be stored.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    /// Number of fragment keys produced.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Length of the input in characters, before truncation.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Returns true if characters past the capacity were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Total number of keys, auxiliary keys included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the result and returns the key/value map.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl IntoIterator for Encoded {
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;
    type Item = (String, String);

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Splits `text` into consecutive fragments of at most `limits.max_len`
/// characters, stopping after `limits.max_count` fragments.
///
/// The auxiliary keys are always written, so an empty input still yields
/// `len = "0"` and an empty preview.
pub fn encode(text: &str, limits: &FragmentLimits, scheme: &KeyScheme) -> Encoded {
    let max_len = limits.max_len.max(1);
    let mut entries = BTreeMap::new();
    let mut fragment_count = 0;
    let mut original_len = 0;
    let mut current = String::new();
    let mut current_len = 0;

    for ch in text.chars() {
        original_len += 1;
        if fragment_count == limits.max_count {
            continue;
        }

        current.push(ch);
        current_len += 1;
        if current_len == max_len {
            fragment_count += 1;
            entries.insert(scheme.fragment_key(fragment_count), std::mem::take(&mut current));
            current_len = 0;
        }
    }

    if !current.is_empty() && fragment_count < limits.max_count {
        fragment_count += 1;
        entries.insert(scheme.fragment_key(fragment_count), current);
    }

    let head: String = text.chars().take(limits.preview_len).collect();
    entries.insert(scheme.len_key().to_owned(), original_len.to_string());
    entries.insert(scheme.head_key().to_owned(), head);
    entries.insert(scheme.count_key().to_owned(), fragment_count.to_string());

    Encoded {
        entries,
        fragment_count,
        original_len,
        truncated: original_len > limits.capacity(),
    }
}
