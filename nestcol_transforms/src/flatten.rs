// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening pivoted rows into one record per `(row, measure)`.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use nestcol_core::{FieldSet, Link, PivotKey, PivotKeys, Row};
use smallvec::SmallVec;

use crate::format::DimensionFormatter;

/// Display value used for a null or missing dimension cell.
pub const NULL_DIMENSION: &str = "∅";

/// Per-pivot values of one record, aligned to [`PivotKeys`] order.
pub type PivotValues = SmallVec<[f64; 8]>;

/// One `(row, measure)` pair with its per-pivot values.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRecord {
    /// The (formatted) dimension value of the source row.
    pub dimension_value: String,
    /// The measure field name.
    pub measure_name: String,
    /// Drill links of the source row's dimension cell.
    pub links: Vec<Link>,
    /// One value per pivot key, in key order. Missing cells are `0.0`.
    pub values: PivotValues,
}

impl FlatRecord {
    /// Returns the value at a pivot key position (`0.0` if out of range).
    pub fn value_at(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}

/// The flattened records of one query, together with the key order their values follow.
///
/// This is the owned input to stacking; stacks borrow from it.
#[derive(Clone, Debug)]
pub struct FlatTable {
    /// Pivot keys, in stacking order.
    pub pivot_keys: PivotKeys,
    /// Records in row-major, then measure order.
    pub records: Vec<FlatRecord>,
}

impl FlatTable {
    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a record's value for `key`, or `None` if the key is unknown.
    pub fn value(&self, record: &FlatRecord, key: &PivotKey) -> Option<f64> {
        self.pivot_keys
            .position(key.key())
            .map(|i| record.value_at(i))
    }
}

/// Flattens `rows` into one [`FlatRecord`] per `(row, measure)`.
///
/// `pivot_keys` must be the full key list from query metadata: a key with no values anywhere
/// still gets a `0.0` slot in every record. The dimension cell is rendered to a string and then
/// passed through `formatter`.
pub fn flatten_rows(
    rows: &[Row],
    fields: &FieldSet,
    pivot_keys: &PivotKeys,
    formatter: &dyn DimensionFormatter,
) -> FlatTable {
    let mut records = Vec::with_capacity(rows.len() * fields.measures.len());

    for row in rows {
        let dim_cell = row.single(&fields.dimension.name);
        let raw = dim_cell
            .and_then(|c| c.value.as_ref())
            .map_or_else(|| String::from(NULL_DIMENSION), ToString::to_string);
        let dimension_value = formatter.format(&raw);
        let links = dim_cell.map(|c| c.links.clone()).unwrap_or_default();

        for measure in &fields.measures {
            let values = pivot_keys
                .iter()
                .map(|k| row.pivot_value(&measure.name, k.key()).unwrap_or(0.0))
                .collect();
            records.push(FlatRecord {
                dimension_value: dimension_value.clone(),
                measure_name: measure.name.clone(),
                links: links.clone(),
                values,
            });
        }
    }

    log::debug!(
        "flattened {} rows into {} records over {} pivot keys",
        rows.len(),
        records.len(),
        pivot_keys.len()
    );

    FlatTable {
        pivot_keys: pivot_keys.clone(),
        records,
    }
}
