// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping a stacked offset back to the pivot key whose segment starts there.

use nestcol_core::PivotKey;

use crate::stack::{StackGroup, stack_value};

/// Walks `entries` in order, accumulating values, and returns the first key whose running
/// start equals `target`.
///
/// The running total is compared *before* the entry's value is added, so `target` must be an
/// exact segment boundary. Interior offsets and offsets past the end return `None`.
pub fn locate_by_boundary<K>(
    entries: impl IntoIterator<Item = (K, f64)>,
    target: f64,
) -> Option<K> {
    let mut acc = 0.0_f64;
    for (key, value) in entries {
        if acc == target {
            return Some(key);
        }
        acc += value;
    }
    None
}

/// Returns the pivot key of `group` whose segment starts at `offset`.
///
/// Keys are walked in stacking order, so a zero-height segment never shadows the key before it.
pub fn locate_pivot<'a>(group: &StackGroup<'a>, offset: f64) -> Option<&'a PivotKey> {
    locate_by_boundary(
        group
            .intervals()
            .iter()
            .map(|i| (i.key, stack_value(i.record.values[i.key_index]))),
        offset,
    )
}

impl<'a> StackGroup<'a> {
    /// Returns the pivot key whose segment starts at `offset`; see [`locate_pivot`].
    pub fn pivot_at(&self, offset: f64) -> Option<&'a PivotKey> {
        locate_pivot(self, offset)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    extern crate std;

    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use nestcol_core::PivotKeys;

    use super::*;
    use crate::flatten::{FlatRecord, FlatTable};
    use crate::stack::build_stacks;

    #[test]
    fn boundaries_resolve_to_the_segment_starting_there() {
        let entries = [("A", 3.0), ("B", 0.0), ("C", 5.0)];
        assert_eq!(locate_by_boundary(entries, 0.0), Some("A"));
        assert_eq!(locate_by_boundary(entries, 3.0), Some("B"));
        assert_eq!(locate_by_boundary(entries, 8.0), None);
        assert_eq!(locate_by_boundary(entries, 1.5), None);
        assert_eq!(locate_by_boundary(Vec::<(&str, f64)>::new(), 0.0), None);
    }

    #[test]
    fn stack_groups_locate_by_their_own_order() {
        let table = FlatTable {
            pivot_keys: PivotKeys::new(vec![
                PivotKey::new("P1", 0, "P1"),
                PivotKey::new("P2", 1, "P2"),
            ]),
            records: vec![FlatRecord {
                dimension_value: String::from("Jan"),
                measure_name: String::from("Revenue"),
                links: Vec::new(),
                values: [10.0, 5.0].into_iter().collect(),
            }],
        };
        let layout = build_stacks(&table).unwrap();
        let jan = layout.group("Jan", "Revenue").unwrap();
        assert_eq!(jan.pivot_at(0.0).map(PivotKey::key), Some("P1"));
        assert_eq!(jan.pivot_at(10.0).map(PivotKey::key), Some("P2"));
        assert_eq!(jan.pivot_at(15.0), None);
    }
}
