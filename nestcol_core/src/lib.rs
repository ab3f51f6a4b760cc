// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query-result model for nested stacked column charts.
//!
//! This crate is the leaf of the workspace:
//! - **Query model**: the schema, pivot metadata and rows a host hands the chart.
//! - **Field resolution**: validating field counts and extracting the [`FieldSet`].
//! - **Pivot keys**: the typed, ordered key list every later stage indexes by.
//!
//! Layout lives in `nestcol_transforms` (flattening, stacking) and `nestcol_charts` (scales,
//! geometry, guides).

#![no_std]

extern crate alloc;

mod fields;
mod pivot;
mod query;

pub use fields::{
    FieldBounds, FieldKind, FieldSet, ResolvedQuery, SchemaValidationError, resolve_fields,
    resolve_query,
};
pub use pivot::{PivotKey, PivotKeys};
pub use query::{
    Cell, DataCell, FieldRef, FieldSort, Link, PivotMeta, QueryFields, QueryResponse, Row, Scalar,
};
