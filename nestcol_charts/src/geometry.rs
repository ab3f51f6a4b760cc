// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle geometry for stacked intervals.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use nestcol_core::Link;
use nestcol_transforms::StackLayout;
use peniko::Color;

use crate::chart_scales::ChartScales;
use crate::palette::Palette;

/// A positioned, colored stacked segment.
///
/// Coordinates are plot-local: `(0, 0)` is the top-left of the plot rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (the measure band width).
    pub width: f64,
    /// Height (`>= 0`; zero for empty segments).
    pub height: f64,
    /// Fill color.
    pub fill: Color,
    /// Dimension value of the column.
    pub dimension_value: String,
    /// Measure name of the column.
    pub measure_name: String,
    /// Pivot key of the segment.
    pub pivot_key: String,
    /// Display label of the pivot key.
    pub pivot_label: String,
    /// Stack start in data units.
    pub low: f64,
    /// Stack end in data units.
    pub high: f64,
    /// Drill links of the source row.
    pub links: Vec<Link>,
}

impl Rectangle {
    /// Returns the rectangle as a [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns the stacked value (`high - low`).
    pub fn value(&self) -> f64 {
        self.high - self.low
    }

    /// Returns `true` if the segment contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.low == self.high
    }
}

/// Positions every interval of `stacks` with `scales` and colors it with `palette`.
///
/// Output order is group order, then bottom-to-top within each group. Zero-height rectangles
/// are kept.
pub fn map_geometry(
    stacks: &StackLayout<'_>,
    scales: &ChartScales,
    palette: &Palette,
) -> Vec<Rectangle> {
    let width = scales.measure.band_width();
    let mut out = Vec::new();
    for group in stacks.groups() {
        let Some(x) = scales.column_x(group.dimension_value(), group.measure_name()) else {
            log::warn!(
                "no column for ({:?}, {:?}); skipping its stack",
                group.dimension_value(),
                group.measure_name()
            );
            continue;
        };
        for interval in group.intervals() {
            let y_high = scales.value.map(interval.high);
            let y_low = scales.value.map(interval.low);
            out.push(Rectangle {
                x,
                y: y_high,
                width,
                height: (y_low - y_high).max(0.0),
                fill: palette.color_for(interval.key),
                dimension_value: String::from(group.dimension_value()),
                measure_name: String::from(group.measure_name()),
                pivot_key: String::from(interval.key.key()),
                pivot_label: String::from(interval.key.display_value()),
                low: interval.low,
                high: interval.high,
                links: interval.record.links.clone(),
            });
        }
    }
    log::debug!("mapped {} rectangles", out.len());
    out
}
