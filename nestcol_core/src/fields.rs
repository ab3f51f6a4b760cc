// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field resolution.
//!
//! Validates a query schema against a [`FieldBounds`] policy and extracts the single dimension,
//! single pivot and ordered measures a nested column chart is built from.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::pivot::PivotKeys;
use crate::query::{FieldRef, QueryFields, QueryResponse};

/// The kinds of field a schema carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Dimension fields.
    Dimension,
    /// Measure fields.
    Measure,
    /// Pivot fields.
    Pivot,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dimension => "dimensions",
            Self::Measure => "measures",
            Self::Pivot => "pivots",
        })
    }
}

/// Errors raised when a schema does not fit the chart.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaValidationError {
    /// A field count falls outside the configured bounds.
    #[error("{}", describe_bounds(.kind, .min, .max, .actual))]
    OutOfBounds {
        /// Which field count was violated.
        kind: FieldKind,
        /// Lower bound, if any.
        min: Option<usize>,
        /// Upper bound, if any.
        max: Option<usize>,
        /// The count found in the schema.
        actual: usize,
    },
    /// The bounds policy admits a shape the chart cannot draw.
    #[error(
        "a nested column chart needs one dimension, one pivot and at least one measure, got {actual} {kind}"
    )]
    Unsupported {
        /// The offending field kind.
        kind: FieldKind,
        /// The count found in the schema.
        actual: usize,
    },
}

fn describe_bounds(
    kind: &FieldKind,
    min: &Option<usize>,
    max: &Option<usize>,
    actual: &usize,
) -> String {
    match (min, max) {
        (Some(min), Some(max)) => {
            format!("expected between {min} and {max} {kind}, got {actual}")
        }
        (Some(min), None) => format!("expected at least {min} {kind}, got {actual}"),
        (None, Some(max)) => format!("expected at most {max} {kind}, got {actual}"),
        (None, None) => format!("unexpected number of {kind}: {actual}"),
    }
}

/// Field-count policy enforced before any layout work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldBounds {
    /// Minimum pivot count.
    pub min_pivots: Option<usize>,
    /// Maximum pivot count.
    pub max_pivots: Option<usize>,
    /// Minimum dimension count.
    pub min_dimensions: Option<usize>,
    /// Maximum dimension count.
    pub max_dimensions: Option<usize>,
    /// Minimum measure count.
    pub min_measures: Option<usize>,
    /// Maximum measure count.
    pub max_measures: Option<usize>,
}

impl Default for FieldBounds {
    /// One pivot, one dimension, one or more measures.
    fn default() -> Self {
        Self {
            min_pivots: Some(1),
            max_pivots: Some(1),
            min_dimensions: Some(1),
            max_dimensions: Some(1),
            min_measures: Some(1),
            max_measures: None,
        }
    }
}

impl FieldBounds {
    /// A policy with no bounds at all.
    pub fn unbounded() -> Self {
        Self {
            min_pivots: None,
            max_pivots: None,
            min_dimensions: None,
            max_dimensions: None,
            min_measures: None,
            max_measures: None,
        }
    }

    /// Returns `(min, max)` for a field kind.
    pub fn range(&self, kind: FieldKind) -> (Option<usize>, Option<usize>) {
        match kind {
            FieldKind::Dimension => (self.min_dimensions, self.max_dimensions),
            FieldKind::Measure => (self.min_measures, self.max_measures),
            FieldKind::Pivot => (self.min_pivots, self.max_pivots),
        }
    }

    /// Checks one field count against the policy.
    pub fn check(&self, kind: FieldKind, actual: usize) -> Result<(), SchemaValidationError> {
        let (min, max) = self.range(kind);
        let too_few = min.is_some_and(|min| actual < min);
        let too_many = max.is_some_and(|max| actual > max);
        if too_few || too_many {
            return Err(SchemaValidationError::OutOfBounds {
                kind,
                min,
                max,
                actual,
            });
        }
        Ok(())
    }
}

/// The fields a nested column chart is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSet {
    /// The x-axis grouping field.
    pub dimension: FieldRef,
    /// The stacking field.
    pub pivot: FieldRef,
    /// Measures, in query order. Never empty.
    pub measures: Vec<FieldRef>,
}

impl FieldSet {
    /// Looks up a measure by name.
    pub fn measure(&self, name: &str) -> Option<&FieldRef> {
        self.measures.iter().find(|m| m.name == name)
    }
}

/// A validated schema plus its pivot keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// Resolved fields.
    pub fields: FieldSet,
    /// Every pivot key named by the metadata, in stacking order.
    pub pivot_keys: PivotKeys,
}

/// Validates `fields` against `bounds` and extracts the [`FieldSet`].
///
/// Counts are checked pivots first, then dimensions, then measures; the first violation wins.
pub fn resolve_fields(
    fields: &QueryFields,
    bounds: &FieldBounds,
) -> Result<FieldSet, SchemaValidationError> {
    bounds.check(FieldKind::Pivot, fields.pivots.len())?;
    bounds.check(FieldKind::Dimension, fields.dimensions.len())?;
    bounds.check(FieldKind::Measure, fields.measures.len())?;

    let [dimension] = fields.dimensions.as_slice() else {
        return Err(SchemaValidationError::Unsupported {
            kind: FieldKind::Dimension,
            actual: fields.dimensions.len(),
        });
    };
    let [pivot] = fields.pivots.as_slice() else {
        return Err(SchemaValidationError::Unsupported {
            kind: FieldKind::Pivot,
            actual: fields.pivots.len(),
        });
    };
    if fields.measures.is_empty() {
        return Err(SchemaValidationError::Unsupported {
            kind: FieldKind::Measure,
            actual: 0,
        });
    }

    Ok(FieldSet {
        dimension: dimension.clone(),
        pivot: pivot.clone(),
        measures: fields.measures.clone(),
    })
}

/// Resolves the field set and builds the pivot keys from the response metadata.
pub fn resolve_query(
    response: &QueryResponse,
    bounds: &FieldBounds,
) -> Result<ResolvedQuery, SchemaValidationError> {
    let fields = resolve_fields(&response.fields, bounds)?;
    let pivot_keys = PivotKeys::from_meta(&response.pivots);
    log::debug!(
        "resolved dimension {:?}, pivot {:?}, {} measures, {} pivot keys",
        fields.dimension.name,
        fields.pivot.name,
        fields.measures.len(),
        pivot_keys.len()
    );
    Ok(ResolvedQuery { fields, pivot_keys })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn schema(dims: usize, pivots: usize, measures: usize) -> QueryFields {
        QueryFields {
            dimensions: (0..dims).map(|i| FieldRef::new(format!("d{i}"))).collect(),
            measures: (0..measures)
                .map(|i| FieldRef::new(format!("m{i}")))
                .collect(),
            pivots: (0..pivots).map(|i| FieldRef::new(format!("p{i}"))).collect(),
        }
    }

    #[test]
    fn zero_measures_fail_the_minimum() {
        let err = resolve_fields(&schema(1, 1, 0), &FieldBounds::default()).unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::OutOfBounds {
                kind: FieldKind::Measure,
                min: Some(1),
                max: None,
                actual: 0,
            }
        );
        assert_eq!(err.to_string(), "expected at least 1 measures, got 0");
    }

    #[test]
    fn two_measures_without_maximum_resolve_in_order() {
        let set = resolve_fields(&schema(1, 1, 2), &FieldBounds::default()).unwrap();
        assert_eq!(set.dimension.name, "d0");
        assert_eq!(set.pivot.name, "p0");
        let names: Vec<&str> = set.measures.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["m0", "m1"]);
        assert!(set.measure("m1").is_some());
    }

    #[test]
    fn pivots_are_checked_first_with_a_named_bound() {
        let err = resolve_fields(&schema(2, 2, 0), &FieldBounds::default()).unwrap_err();
        assert_eq!(err.to_string(), "expected between 1 and 1 pivots, got 2");
    }

    #[test]
    fn upper_bound_only_message() {
        let bounds = FieldBounds {
            min_measures: None,
            max_measures: Some(2),
            ..FieldBounds::default()
        };
        let err = resolve_fields(&schema(1, 1, 3), &bounds).unwrap_err();
        assert_eq!(err.to_string(), "expected at most 2 measures, got 3");
    }

    #[test]
    fn permissive_policy_still_requires_a_drawable_shape() {
        let err = resolve_fields(&schema(1, 2, 1), &FieldBounds::unbounded()).unwrap_err();
        assert_eq!(
            err,
            SchemaValidationError::Unsupported {
                kind: FieldKind::Pivot,
                actual: 2,
            }
        );
        let err = resolve_fields(&schema(1, 1, 0), &FieldBounds::unbounded()).unwrap_err();
        assert!(matches!(
            err,
            SchemaValidationError::Unsupported {
                kind: FieldKind::Measure,
                ..
            }
        ));
    }

    #[test]
    fn resolve_query_builds_pivot_keys_from_metadata() {
        let response = QueryResponse::new(
            schema(1, 1, 1),
            vec![
                crate::PivotMeta::new("b").with_sort_value(1),
                crate::PivotMeta::new("a").with_sort_value(0),
            ],
        );
        let resolved = resolve_query(&response, &FieldBounds::default()).unwrap();
        let keys: Vec<&str> = resolved.pivot_keys.iter().map(|k| k.key()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
