// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking flattened records into per-pivot intervals.
//!
//! Records are grouped by `(dimension value, measure name)`. Within a group, pivot keys are
//! walked in ascending sort order and each contributes `[running, running + value]`. The same
//! order drives both the bottom-to-top paint order and [`crate::locate_pivot`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use nestcol_core::PivotKey;
use smallvec::SmallVec;

use crate::flatten::{FlatRecord, FlatTable};

/// A grouping or stacking invariant failed.
///
/// These indicate a defect upstream of the stack builder, not bad user input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InternalInvariantError {
    /// A `(dimension, measure)` group ended up with no records.
    #[error("stack group ({dimension:?}, {measure:?}) has no records")]
    EmptyGroup {
        /// Dimension value of the group.
        dimension: String,
        /// Measure name of the group.
        measure: String,
    },
    /// A record's value count does not match the pivot key count.
    #[error("record carries {actual} pivot values, expected {expected}")]
    ValueCountMismatch {
        /// Number of pivot keys.
        expected: usize,
        /// Number of values on the record.
        actual: usize,
    },
}

/// The height a raw value contributes to a stack.
///
/// Negative and non-finite values contribute nothing, so intervals never run backwards.
pub fn stack_value(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// One pivot key's segment of a stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackedInterval<'a> {
    /// The pivot key.
    pub key: &'a PivotKey,
    /// Position of `key` in the table's pivot key order.
    pub key_index: usize,
    /// Stack start.
    pub low: f64,
    /// Stack end (`>= low`).
    pub high: f64,
    /// The record the value came from.
    pub record: &'a FlatRecord,
}

impl<'a> StackedInterval<'a> {
    /// Returns the dimension value.
    pub fn dimension_value(&self) -> &'a str {
        &self.record.dimension_value
    }

    /// Returns the measure name.
    pub fn measure_name(&self) -> &'a str {
        &self.record.measure_name
    }

    /// Returns the stacked height (`high - low`).
    pub fn value(&self) -> f64 {
        self.high - self.low
    }

    /// Returns `true` for zero-height segments.
    pub fn is_empty(&self) -> bool {
        self.high == self.low
    }
}

/// All intervals for one `(dimension value, measure name)` pair, in stacking order.
#[derive(Clone, Debug)]
pub struct StackGroup<'a> {
    dimension_value: &'a str,
    measure_name: &'a str,
    intervals: SmallVec<[StackedInterval<'a>; 8]>,
    total: f64,
}

impl<'a> StackGroup<'a> {
    /// Returns the dimension value.
    pub fn dimension_value(&self) -> &'a str {
        self.dimension_value
    }

    /// Returns the measure name.
    pub fn measure_name(&self) -> &'a str {
        self.measure_name
    }

    /// Returns the intervals, bottom to top.
    pub fn intervals(&self) -> &[StackedInterval<'a>] {
        &self.intervals
    }

    /// Returns the stack height.
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Stacks for every `(dimension value, measure name)` pair of a [`FlatTable`].
#[derive(Clone, Debug)]
pub struct StackLayout<'a> {
    groups: Vec<StackGroup<'a>>,
    max_total: f64,
}

impl<'a> StackLayout<'a> {
    /// Returns the groups in first-seen record order.
    pub fn groups(&self) -> &[StackGroup<'a>] {
        &self.groups
    }

    /// Finds the group for a `(dimension value, measure name)` pair.
    pub fn group(&self, dimension_value: &str, measure_name: &str) -> Option<&StackGroup<'a>> {
        self.groups
            .iter()
            .find(|g| g.dimension_value == dimension_value && g.measure_name == measure_name)
    }

    /// Iterates every interval, group by group.
    pub fn intervals(&self) -> impl Iterator<Item = &StackedInterval<'a>> + '_ {
        self.groups.iter().flat_map(|g| g.intervals.iter())
    }

    /// Returns the largest group total (`0.0` when there are no groups).
    pub fn max_total(&self) -> f64 {
        self.max_total
    }
}

/// Builds the stacks for `table`.
///
/// Within a group, intervals are ordered by pivot key and then by record order, so duplicate
/// rows for the same dimension value stack one after another. Zero values still produce a
/// zero-height interval.
pub fn build_stacks(table: &FlatTable) -> Result<StackLayout<'_>, InternalInvariantError> {
    let key_count = table.pivot_keys.len();

    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut members: Vec<((&str, &str), Vec<&FlatRecord>)> = Vec::new();
    for record in &table.records {
        if record.values.len() != key_count {
            return Err(InternalInvariantError::ValueCountMismatch {
                expected: key_count,
                actual: record.values.len(),
            });
        }
        let key = (record.dimension_value.as_str(), record.measure_name.as_str());
        let slot = *slots.entry(key).or_insert_with(|| {
            members.push((key, Vec::new()));
            members.len() - 1
        });
        members[slot].1.push(record);
    }

    let mut groups = Vec::with_capacity(members.len());
    let mut max_total = 0.0_f64;
    for ((dimension_value, measure_name), records) in members {
        if records.is_empty() {
            return Err(InternalInvariantError::EmptyGroup {
                dimension: String::from(dimension_value),
                measure: String::from(measure_name),
            });
        }

        let mut running = 0.0_f64;
        let mut intervals = SmallVec::new();
        for (key_index, key) in table.pivot_keys.iter().enumerate() {
            for &record in &records {
                let raw = record.values[key_index];
                let v = stack_value(raw);
                if v != raw && raw != 0.0 {
                    log::warn!(
                        "stacking {raw} as 0 for ({dimension_value:?}, {measure_name:?}, {:?})",
                        key.key()
                    );
                }
                intervals.push(StackedInterval {
                    key,
                    key_index,
                    low: running,
                    high: running + v,
                    record,
                });
                running += v;
            }
        }

        max_total = max_total.max(running);
        groups.push(StackGroup {
            dimension_value,
            measure_name,
            intervals,
            total: running,
        });
    }

    log::debug!("built {} stacks, max total {max_total}", groups.len());
    Ok(StackLayout { groups, max_total })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use nestcol_core::PivotKeys;
    use smallvec::smallvec;

    use super::*;

    fn record(dim: &str, measure: &str, values: &[f64]) -> FlatRecord {
        FlatRecord {
            dimension_value: String::from(dim),
            measure_name: String::from(measure),
            links: Vec::new(),
            values: values.iter().copied().collect(),
        }
    }

    fn two_keys() -> PivotKeys {
        PivotKeys::new(vec![PivotKey::new("P1", 0, "P1"), PivotKey::new("P2", 1, "P2")])
    }

    fn spans<'a>(group: &StackGroup<'a>) -> Vec<(&'a str, f64, f64)> {
        group
            .intervals()
            .iter()
            .map(|i| (i.key.key(), i.low, i.high))
            .collect()
    }

    #[test]
    fn jan_feb_example_stacks_with_zero_height_segment() {
        let table = FlatTable {
            pivot_keys: two_keys(),
            records: vec![
                record("Jan", "Revenue", &[10.0, 5.0]),
                record("Feb", "Revenue", &[20.0, 0.0]),
            ],
        };
        let layout = build_stacks(&table).unwrap();

        let jan = layout.group("Jan", "Revenue").unwrap();
        assert_eq!(spans(jan), vec![("P1", 0.0, 10.0), ("P2", 10.0, 15.0)]);
        assert_eq!(jan.total(), 15.0);

        let feb = layout.group("Feb", "Revenue").unwrap();
        assert_eq!(spans(feb), vec![("P1", 0.0, 20.0), ("P2", 20.0, 20.0)]);
        assert!(feb.intervals()[1].is_empty());

        assert_eq!(layout.max_total(), 20.0);
        assert_eq!(layout.intervals().count(), 4);
    }

    #[test]
    fn groups_follow_first_seen_order_and_split_measures() {
        let table = FlatTable {
            pivot_keys: two_keys(),
            records: vec![
                record("B", "m1", &[1.0, 1.0]),
                record("B", "m2", &[2.0, 2.0]),
                record("A", "m1", &[3.0, 3.0]),
            ],
        };
        let layout = build_stacks(&table).unwrap();
        let order: Vec<(&str, &str)> = layout
            .groups()
            .iter()
            .map(|g| (g.dimension_value(), g.measure_name()))
            .collect();
        assert_eq!(order, vec![("B", "m1"), ("B", "m2"), ("A", "m1")]);
        assert_eq!(layout.group("B", "m2").unwrap().total(), 4.0);
    }

    #[test]
    fn sort_value_not_input_order_drives_stacking() {
        // Keys are given out of order; PivotKeys sorts them, and values follow that order.
        let keys = PivotKeys::new(vec![
            PivotKey::new("late", 9, "late"),
            PivotKey::new("early", 1, "early"),
        ]);
        let table = FlatTable {
            pivot_keys: keys,
            records: vec![record("x", "m", &[2.0, 7.0])],
        };
        let layout = build_stacks(&table).unwrap();
        let g = layout.group("x", "m").unwrap();
        assert_eq!(spans(g), vec![("early", 0.0, 2.0), ("late", 2.0, 9.0)]);
    }

    #[test]
    fn duplicate_rows_stack_after_each_other_per_key() {
        let table = FlatTable {
            pivot_keys: two_keys(),
            records: vec![record("x", "m", &[1.0, 2.0]), record("x", "m", &[3.0, 4.0])],
        };
        let layout = build_stacks(&table).unwrap();
        let g = layout.group("x", "m").unwrap();
        assert_eq!(
            spans(g),
            vec![
                ("P1", 0.0, 1.0),
                ("P1", 1.0, 4.0),
                ("P2", 4.0, 6.0),
                ("P2", 6.0, 10.0),
            ]
        );
        assert!(core::ptr::eq(g.intervals()[1].record, &table.records[1]));
    }

    #[test]
    fn negative_and_nan_values_stack_as_zero() {
        let table = FlatTable {
            pivot_keys: two_keys(),
            records: vec![record("x", "m", &[-4.0, f64::NAN])],
        };
        let layout = build_stacks(&table).unwrap();
        let g = layout.group("x", "m").unwrap();
        assert_eq!(spans(g), vec![("P1", 0.0, 0.0), ("P2", 0.0, 0.0)]);
        // The record keeps the raw value.
        assert_eq!(g.intervals()[0].record.values[0], -4.0);
    }

    #[test]
    fn value_count_mismatch_is_an_invariant_error() {
        let table = FlatTable {
            pivot_keys: two_keys(),
            records: vec![FlatRecord {
                dimension_value: String::from("x"),
                measure_name: String::from("m"),
                links: Vec::new(),
                values: smallvec![1.0],
            }],
        };
        assert_eq!(
            build_stacks(&table).unwrap_err(),
            InternalInvariantError::ValueCountMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
