// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row flattening and stacking for nested column charts.
//!
//! This crate turns resolved query rows into stacked intervals:
//! - [`flatten_rows`] produces one [`FlatRecord`] per `(row, measure)`, with values aligned to
//!   the pivot key order,
//! - [`build_stacks`] accumulates those values into `[low, high)` intervals per
//!   `(dimension, measure)`, and
//! - [`locate_pivot`] maps a stacked offset back to the key whose segment starts there.
//!
//! Stacks borrow from the [`FlatTable`] they were built from; nothing here allocates per
//! interval beyond the group vectors.

#![no_std]

extern crate alloc;

mod flatten;
mod format;
mod locate;
mod stack;

pub use flatten::{FlatRecord, FlatTable, NULL_DIMENSION, PivotValues, flatten_rows};
pub use format::{DateFormatter, DimensionFormatter, PlainFormatter};
pub use locate::{locate_by_boundary, locate_pivot};
pub use stack::{
    InternalInvariantError, StackGroup, StackLayout, StackedInterval, build_stacks, stack_value,
};
