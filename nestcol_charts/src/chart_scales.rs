// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three scales a nested column chart is drawn with.

extern crate alloc;

use kurbo::Size;
use nestcol_core::FieldSet;
use nestcol_transforms::{FlatTable, StackLayout};
use serde::{Deserialize, Serialize};

use crate::scale::{OrdinalBand, ScaleLinear};

/// Padding and rounding for the band scales.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleOptions {
    /// Gap between dimension bands, as a fraction of the dimension step.
    pub dimension_padding_inner: f64,
    /// Space before the first and after the last dimension band.
    pub dimension_padding_outer: f64,
    /// Gap between measure columns inside a dimension band.
    pub measure_padding_inner: f64,
    /// Space at both ends of each dimension band.
    pub measure_padding_outer: f64,
    /// Snap the dimension bands to whole pixels.
    pub round: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            dimension_padding_inner: 0.1,
            dimension_padding_outer: 0.0,
            measure_padding_inner: 0.05,
            measure_padding_outer: 0.2,
            round: true,
        }
    }
}

/// Dimension, measure and value scales for one chart build.
///
/// Bands map into plot-local x; the value scale maps into plot-local y with `0` at the bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartScales {
    /// Dimension values in first-seen order over `[0, plot width]`.
    pub dimension: OrdinalBand,
    /// Measure names in field order over `[0, dimension band width]`.
    pub measure: OrdinalBand,
    /// `[0, max(1, largest stack)]` over `[plot height, 0]`.
    pub value: ScaleLinear,
}

impl ChartScales {
    /// Derives the scales from the flattened table, its stacks and the plot size.
    pub fn build(
        table: &FlatTable,
        stacks: &StackLayout<'_>,
        fields: &FieldSet,
        plot: Size,
        options: &ScaleOptions,
    ) -> Self {
        let width = plot.width.max(0.0);
        let height = plot.height.max(0.0);

        let dimension = OrdinalBand::new(
            table.records.iter().map(|r| r.dimension_value.as_str()),
            (0.0, width),
        )
        .with_padding(options.dimension_padding_inner, options.dimension_padding_outer)
        .with_round(options.round);

        let measure = OrdinalBand::new(
            fields.measures.iter().map(|m| m.name.as_str()),
            (0.0, dimension.band_width()),
        )
        .with_padding(options.measure_padding_inner, options.measure_padding_outer);

        let value = ScaleLinear::new((0.0, stacks.max_total().max(1.0)), (height, 0.0));

        log::debug!(
            "scales: {} dimension bands of {:.2}px, {} measure bands of {:.2}px, value domain {:?}",
            dimension.keys().len(),
            dimension.band_width(),
            measure.keys().len(),
            measure.band_width(),
            value.domain()
        );
        Self {
            dimension,
            measure,
            value,
        }
    }

    /// Returns the left edge of a `(dimension, measure)` column, or `None` if either key is
    /// unknown.
    pub fn column_x(&self, dimension_value: &str, measure_name: &str) -> Option<f64> {
        Some(self.dimension.position(dimension_value)? + self.measure.position(measure_name)?)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use nestcol_core::{FieldRef, PivotKey, PivotKeys};
    use nestcol_transforms::{FlatRecord, build_stacks};

    use super::*;

    fn table(records: &[(&str, &str, f64)]) -> FlatTable {
        FlatTable {
            pivot_keys: PivotKeys::new(vec![PivotKey::new("p", 0, "p")]),
            records: records
                .iter()
                .map(|&(d, m, v)| FlatRecord {
                    dimension_value: String::from(d),
                    measure_name: String::from(m),
                    links: Vec::new(),
                    values: [v].into_iter().collect(),
                })
                .collect(),
        }
    }

    fn fields(measures: &[&str]) -> FieldSet {
        FieldSet {
            dimension: FieldRef::new("d"),
            pivot: FieldRef::new("p"),
            measures: measures.iter().map(|m| FieldRef::new(*m)).collect(),
        }
    }

    #[test]
    fn domains_follow_data_and_field_order() {
        let t = table(&[
            ("Mar", "b", 1.0),
            ("Mar", "a", 2.0),
            ("Jan", "b", 7.0),
            ("Jan", "a", 3.0),
        ]);
        let stacks = build_stacks(&t).unwrap();
        let s = ChartScales::build(
            &t,
            &stacks,
            &fields(&["b", "a"]),
            Size::new(200.0, 100.0),
            &ScaleOptions::default(),
        );
        assert_eq!(s.dimension.keys(), &["Mar", "Jan"]);
        assert_eq!(s.measure.keys(), &["b", "a"]);
        assert_eq!(s.value.domain(), (0.0, 7.0));
        assert_eq!(s.value.range(), (100.0, 0.0));
        // The measure band spans exactly one dimension band.
        assert_eq!(s.measure.band().count(), 2);
        let last_end = s.measure.position("a").unwrap() + s.measure.band_width();
        assert!(last_end < s.dimension.band_width());
    }

    #[test]
    fn dimension_bands_snap_to_whole_pixels_by_default() {
        let t = table(&[("Jan", "a", 1.0), ("Feb", "a", 2.0), ("Mar", "a", 3.0)]);
        let stacks = build_stacks(&t).unwrap();
        let s = ChartScales::build(
            &t,
            &stacks,
            &fields(&["a"]),
            Size::new(200.0, 100.0),
            &ScaleOptions::default(),
        );
        // 200 / 2.9 floors to a 68px step.
        assert_eq!(s.dimension.band().step(), 68.0);
        for key in ["Jan", "Feb", "Mar"] {
            let x = s.dimension.position(key).unwrap();
            assert_eq!(x % 1.0, 0.0, "{key} starts between pixels");
        }
        assert_eq!(s.dimension.band_width(), 61.0);

        let unrounded = ScaleOptions {
            round: false,
            ..ScaleOptions::default()
        };
        let plot = Size::new(200.0, 100.0);
        let s = ChartScales::build(&t, &stacks, &fields(&["a"]), plot, &unrounded);
        assert!((s.dimension.band().step() - 200.0 / 2.9).abs() < 1e-9);
    }

    #[test]
    fn all_zero_data_still_has_a_unit_domain() {
        let t = table(&[("Jan", "a", 0.0)]);
        let stacks = build_stacks(&t).unwrap();
        let s = ChartScales::build(
            &t,
            &stacks,
            &fields(&["a"]),
            Size::new(200.0, 100.0),
            &ScaleOptions::default(),
        );
        assert_eq!(s.value.domain(), (0.0, 1.0));
        assert_eq!(s.value.map(0.0), 100.0);
    }

    #[test]
    fn collapsed_plot_gives_zero_width_bands() {
        let t = table(&[("Jan", "a", 5.0)]);
        let stacks = build_stacks(&t).unwrap();
        let s = ChartScales::build(
            &t,
            &stacks,
            &fields(&["a"]),
            Size::new(0.0, 0.0),
            &ScaleOptions::default(),
        );
        assert_eq!(s.dimension.band_width(), 0.0);
        assert_eq!(s.measure.band_width(), 0.0);
        assert_eq!(s.column_x("Jan", "a"), Some(0.0));
        assert_eq!(s.value.map(5.0), 0.0);
    }
}
