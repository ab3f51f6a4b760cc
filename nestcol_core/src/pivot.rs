// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pivot keys resolved from query metadata.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::query::PivotMeta;

/// One pivot column instance.
///
/// Identity is the opaque `key`; `sort_value` fixes the stacking order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PivotKey {
    key: String,
    sort_value: i64,
    display_value: String,
}

impl PivotKey {
    /// Creates a pivot key.
    pub fn new(key: impl Into<String>, sort_value: i64, display_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sort_value,
            display_value: display_value.into(),
        }
    }

    /// Returns the opaque key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the sort value.
    pub fn sort_value(&self) -> i64 {
        self.sort_value
    }

    /// Returns the display value.
    pub fn display_value(&self) -> &str {
        &self.display_value
    }
}

/// The full, ordered set of pivot keys for one query.
///
/// Keys are held in ascending `sort_value` order; ties keep their input order. Every key the
/// metadata names is present, whether or not any row carries a value for it.
#[derive(Clone, Debug, Default)]
pub struct PivotKeys {
    keys: Vec<PivotKey>,
    index: HashMap<String, usize>,
}

impl PivotKeys {
    /// Builds the key set from explicit keys.
    ///
    /// Duplicate keys keep their first occurrence.
    pub fn new(keys: impl IntoIterator<Item = PivotKey>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<PivotKey> = Vec::new();
        for k in keys {
            if !seen.insert(k.key.clone()) {
                log::warn!("ignoring duplicate pivot key {:?}", k.key);
                continue;
            }
            out.push(k);
        }
        // Stable: ties keep metadata order.
        out.sort_by_key(|k| k.sort_value);

        let index = out
            .iter()
            .enumerate()
            .map(|(i, k)| (k.key.clone(), i))
            .collect();
        Self { keys: out, index }
    }

    /// Builds the key set from host pivot metadata.
    ///
    /// Row-total columns are skipped. A missing sort value falls back to the entry's position in
    /// `meta`; a missing label falls back to the key.
    pub fn from_meta(meta: &[PivotMeta]) -> Self {
        Self::new(
            meta.iter()
                .enumerate()
                .filter(|(_, m)| !m.is_total)
                .map(|(i, m)| {
                    let fallback = i64::try_from(i).unwrap_or(i64::MAX);
                    PivotKey::new(
                        m.key.clone(),
                        m.sort_value.unwrap_or(fallback),
                        m.label.clone().unwrap_or_else(|| m.key.clone()),
                    )
                }),
        )
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the key at `index` in sort order.
    pub fn get(&self, index: usize) -> Option<&PivotKey> {
        self.keys.get(index)
    }

    /// Returns the sort-order position of `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Looks up a key by its opaque id.
    pub fn find(&self, key: &str) -> Option<&PivotKey> {
        self.position(key).and_then(|i| self.keys.get(i))
    }

    /// Iterates keys in ascending sort order.
    pub fn iter(&self) -> core::slice::Iter<'_, PivotKey> {
        self.keys.iter()
    }

    /// Returns the keys in ascending sort order.
    pub fn as_slice(&self) -> &[PivotKey] {
        &self.keys
    }
}

impl PartialEq for PivotKeys {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl Eq for PivotKeys {}

impl<'a> IntoIterator for &'a PivotKeys {
    type Item = &'a PivotKey;
    type IntoIter = core::slice::Iter<'a, PivotKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn keys_sort_by_sort_value_and_keep_ties_stable() {
        let keys = PivotKeys::new(vec![
            PivotKey::new("c", 2, "C"),
            PivotKey::new("a", 0, "A"),
            PivotKey::new("b2", 1, "B2"),
            PivotKey::new("b1", 1, "B1"),
        ]);
        let order: Vec<&str> = keys.iter().map(PivotKey::key).collect();
        assert_eq!(order, vec!["a", "b2", "b1", "c"]);
        assert_eq!(keys.position("b1"), Some(2));
        assert_eq!(keys.find("c").map(PivotKey::display_value), Some("C"));
        assert_eq!(keys.position("zzz"), None);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let keys = PivotKeys::new(vec![
            PivotKey::new("a", 5, "first"),
            PivotKey::new("a", 0, "second"),
        ]);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.get(0).map(PivotKey::display_value), Some("first"));
    }

    #[test]
    fn metadata_skips_totals_and_falls_back_to_position() {
        let meta = vec![
            PivotMeta::new("z").with_label("Zed"),
            PivotMeta {
                is_total: true,
                ..PivotMeta::new("$$$_row_total_$$$")
            },
            PivotMeta::new("y"),
        ];
        let keys = PivotKeys::from_meta(&meta);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get(0), Some(&PivotKey::new("z", 0, "Zed")));
        assert_eq!(keys.get(1), Some(&PivotKey::new("y", 2, "y")));
    }
}
