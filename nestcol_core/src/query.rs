// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query-result model supplied by the host.
//!
//! These types mirror what a BI host hands a visualization plugin:
//! - a field schema (dimensions, measures, pivots),
//! - pivot column metadata (key, display value, sort value), and
//! - rows keyed by field name.
//!
//! Everything deserializes with `serde`, but the types are plain data and can be built by hand.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::Deserialize;

/// Field schema and pivot metadata for one query result.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    /// Field descriptors.
    pub fields: QueryFields,
    /// Pivot column metadata, in the order the host reports them.
    #[serde(default)]
    pub pivots: Vec<PivotMeta>,
}

impl QueryResponse {
    /// Creates a response from a field schema and pivot metadata.
    pub fn new(fields: QueryFields, pivots: Vec<PivotMeta>) -> Self {
        Self { fields, pivots }
    }
}

/// The field schema of a query result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct QueryFields {
    /// Dimension fields.
    #[serde(default)]
    pub dimensions: Vec<FieldRef>,
    /// Measure fields, in query order.
    #[serde(default)]
    pub measures: Vec<FieldRef>,
    /// Pivot fields.
    #[serde(default)]
    pub pivots: Vec<FieldRef>,
}

/// A field descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FieldRef {
    /// Fully-qualified field name; rows are keyed by this.
    pub name: String,
    /// Long label.
    #[serde(default)]
    pub label: Option<String>,
    /// Short label, preferred for display.
    #[serde(default)]
    pub label_short: Option<String>,
    /// Sort metadata, if the query sorts by this field.
    #[serde(default)]
    pub sorted: Option<FieldSort>,
}

impl FieldRef {
    /// Creates a field descriptor with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the long label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the short label.
    pub fn with_label_short(mut self, label: impl Into<String>) -> Self {
        self.label_short = Some(label.into());
        self
    }

    /// Returns the short label, falling back to the long label and then the name.
    pub fn display_label(&self) -> &str {
        self.label_short
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(&self.name)
    }
}

/// Sort metadata attached to a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FieldSort {
    /// Whether the sort is descending.
    #[serde(default)]
    pub desc: bool,
    /// Position of this field among the query's sort keys.
    #[serde(default)]
    pub sort_index: u32,
}

/// Metadata for one pivot column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PivotMeta {
    /// Opaque key; measure cells are keyed by it.
    pub key: String,
    /// Display value. Falls back to `key`.
    #[serde(default)]
    pub label: Option<String>,
    /// Integer sort value. Falls back to the metadata position.
    #[serde(default)]
    pub sort_value: Option<i64>,
    /// Whether this is a row-total column.
    #[serde(default)]
    pub is_total: bool,
}

impl PivotMeta {
    /// Creates pivot metadata with only a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the display value.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the sort value.
    pub fn with_sort_value(mut self, sort_value: i64) -> Self {
        self.sort_value = Some(sort_value);
        self
    }
}

/// A drill link attached to a cell. The engine carries it through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Link label.
    #[serde(default)]
    pub label: String,
    /// Target URL.
    #[serde(default)]
    pub url: String,
    /// Host-defined link type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A scalar cell value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A boolean.
    Bool(bool),
}

impl Scalar {
    /// Returns the numeric value, parsing text if needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => {
                if v.is_finite() && v.abs() < 1e15 {
                    #[allow(clippy::cast_possible_truncation, reason = "bounded by 1e15")]
                    let i = *v as i64;
                    if i as f64 == *v {
                        return write!(f, "{i}");
                    }
                }
                write!(f, "{v}")
            }
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single cell: a value plus drill links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DataCell {
    /// The raw value; `None` for SQL nulls.
    #[serde(default)]
    pub value: Option<Scalar>,
    /// Drill links.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Host-rendered text, if any.
    #[serde(default)]
    pub rendered: Option<String>,
}

impl DataCell {
    /// Creates a cell holding `value`.
    pub fn new(value: impl Into<Scalar>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Appends a drill link.
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

/// A row cell.
///
/// Dimension cells hold a single [`DataCell`]. Measure cells of a pivoted query hold one
/// [`DataCell`] per pivot key.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Pivot key to cell.
    Pivoted(BTreeMap<String, DataCell>),
    /// An unpivoted cell.
    Single(DataCell),
}

impl Cell {
    /// Creates an unpivoted cell.
    pub fn single(cell: DataCell) -> Self {
        Self::Single(cell)
    }

    /// Creates a pivoted measure cell from `(pivot key, value)` pairs.
    pub fn pivoted<K: Into<String>>(values: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self::Pivoted(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), DataCell::new(v)))
                .collect(),
        )
    }
}

/// One query-result row, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell and returns the row.
    pub fn with_cell(mut self, field: impl Into<String>, cell: Cell) -> Self {
        self.insert(field, cell);
        self
    }

    /// Inserts or replaces a cell.
    pub fn insert(&mut self, field: impl Into<String>, cell: Cell) {
        self.cells.insert(field.into(), cell);
    }

    /// Returns the cell for `field`.
    pub fn get(&self, field: &str) -> Option<&Cell> {
        self.cells.get(field)
    }

    /// Returns the unpivoted cell for `field`, if it is one.
    pub fn single(&self, field: &str) -> Option<&DataCell> {
        match self.cells.get(field)? {
            Cell::Single(cell) => Some(cell),
            Cell::Pivoted(_) => None,
        }
    }

    /// Returns the numeric value of `measure` under `pivot_key`.
    ///
    /// Missing cells, nulls and non-numeric values all yield `None`.
    pub fn pivot_value(&self, measure: &str, pivot_key: &str) -> Option<f64> {
        match self.cells.get(measure)? {
            Cell::Pivoted(cells) => cells.get(pivot_key)?.value.as_ref()?.as_f64(),
            Cell::Single(_) => None,
        }
    }
}
