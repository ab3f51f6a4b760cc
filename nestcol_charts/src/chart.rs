// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The nested column chart pipeline.
//!
//! [`NestedColumnChart::build`] runs one full update: resolve fields, flatten rows, stack,
//! derive scales, map geometry, then assemble the legend and axes. It holds no state between
//! calls, so identical inputs always produce identical output.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size};
use nestcol_core::{
    FieldBounds, FieldSet, Link, QueryResponse, Row, SchemaValidationError, resolve_query,
};
use nestcol_transforms::{
    DateFormatter, DimensionFormatter, InternalInvariantError, PlainFormatter, build_stacks,
    flatten_rows,
};
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, DEFAULT_VALUE_TICKS};
use crate::chart_scales::{ChartScales, ScaleOptions};
use crate::geometry::{Rectangle, map_geometry};
use crate::layout::{ChartLayout, Margins};
use crate::legend::{LegendEntry, LegendOptions, legend_entries};
use crate::palette::Palette;

/// Label size preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// 12px labels.
    #[default]
    Large,
    /// 10px labels.
    Small,
}

impl FontSize {
    /// Returns the font size in pixels.
    pub fn px(self) -> f64 {
        match self {
            Self::Large => 12.0,
            Self::Small => 10.0,
        }
    }
}

/// User-facing chart options, as stored by the host.
///
/// Every field is optional; unknown fields are ignored and blank strings count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// X-axis title. Defaults to the dimension's label.
    pub x_axis_label: Option<String>,
    /// Y-axis title. Defaults to the measure labels.
    pub y_axis_label: Option<String>,
    /// `strftime` pattern applied to date-like dimension values.
    pub date_format: Option<String>,
    /// Label size.
    pub font_size: FontSize,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.trim().is_empty())
}

/// Errors that abort a chart update.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// The query does not fit the chart.
    #[error("invalid query: {0}")]
    Schema(#[from] SchemaValidationError),
    /// A layout invariant failed.
    #[error("internal layout error: {0}")]
    Internal(#[from] InternalInvariantError),
}

impl ChartError {
    /// Returns `true` for errors the user can fix by changing the query.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// A nested, stacked column chart.
///
/// Holds configuration only; every [`build`](Self::build) starts from scratch.
#[derive(Clone, Debug, PartialEq)]
pub struct NestedColumnChart {
    /// User options.
    pub config: ChartConfig,
    /// Field-count policy.
    pub bounds: FieldBounds,
    /// Band padding.
    pub scale_options: ScaleOptions,
    /// Space around the plot.
    pub margins: Margins,
    /// Pivot key colors.
    pub palette: Palette,
    /// Legend label options.
    pub legend: LegendOptions,
    /// Number of value ticks to aim for.
    pub value_ticks: usize,
}

impl Default for NestedColumnChart {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl NestedColumnChart {
    /// Creates a chart with default bounds, padding, margins and palette.
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            bounds: FieldBounds::default(),
            scale_options: ScaleOptions::default(),
            margins: Margins::default(),
            palette: Palette::default(),
            legend: LegendOptions::default(),
            value_ticks: DEFAULT_VALUE_TICKS,
        }
    }

    /// Sets the field-count policy.
    pub fn with_bounds(mut self, bounds: FieldBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets band padding and rounding.
    pub fn with_scale_options(mut self, options: ScaleOptions) -> Self {
        self.scale_options = options;
        self
    }

    /// Sets the plot margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Sets legend options.
    pub fn with_legend_options(mut self, legend: LegendOptions) -> Self {
        self.legend = legend;
        self
    }

    /// Lays out `rows` in a `viewport`-sized chart.
    ///
    /// Schema problems are returned before any layout work. A viewport too small for the
    /// margins is not an error: the output has zero-area rectangles.
    pub fn build(
        &self,
        response: &QueryResponse,
        rows: &[Row],
        viewport: Size,
    ) -> Result<ChartOutput, ChartError> {
        let resolved = resolve_query(response, &self.bounds).inspect_err(|e| {
            log::warn!("query rejected: {e}");
        })?;
        let fields = resolved.fields;
        let pivot_keys = resolved.pivot_keys;

        let date_formatter = non_blank(&self.config.date_format).map(DateFormatter::new);
        let formatter: &dyn DimensionFormatter = match &date_formatter {
            Some(f) => f,
            None => &PlainFormatter,
        };
        let table = flatten_rows(rows, &fields, &pivot_keys, formatter);
        let stacks = build_stacks(&table).inspect_err(|e| {
            log::error!("aborting chart update: {e}");
        })?;

        let layout = ChartLayout::arrange(viewport, &self.margins);
        if layout.is_collapsed() {
            log::debug!("plot area is empty; rectangles will have no area");
        }
        let scales = ChartScales::build(
            &table,
            &stacks,
            &fields,
            layout.plot_size(),
            &self.scale_options,
        );
        let rectangles = map_geometry(&stacks, &scales, &self.palette);
        let legend = legend_entries(&pivot_keys, &self.palette, &self.legend);

        let font_size = self.config.font_size.px();
        let x_title = non_blank(&self.config.x_axis_label)
            .map_or_else(|| String::from(fields.dimension.display_label()), String::from);
        let y_title = non_blank(&self.config.y_axis_label).map_or_else(
            || {
                fields
                    .measures
                    .iter()
                    .map(|m| m.display_label())
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            String::from,
        );
        let x_axis = Axis::dimension(&scales, x_title, font_size);
        let y_axis = Axis::value(&scales, y_title, font_size, self.value_ticks);

        Ok(ChartOutput {
            layout,
            scales,
            rectangles,
            legend,
            x_axis,
            y_axis,
            fields,
        })
    }
}

/// Everything a renderer needs for one chart update.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOutput {
    /// View and plot rectangles.
    pub layout: ChartLayout,
    /// The scales rectangles were positioned with.
    pub scales: ChartScales,
    /// One rectangle per `(dimension, measure, pivot key)`, bottom-to-top within each column.
    pub rectangles: Vec<Rectangle>,
    /// Legend entries in pivot sort order.
    pub legend: Vec<LegendEntry>,
    /// Dimension axis.
    pub x_axis: Axis,
    /// Value axis.
    pub y_axis: Axis,
    /// The resolved fields.
    pub fields: FieldSet,
}

/// Tooltip content for a hovered rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Dimension value of the column.
    pub dimension_value: String,
    /// Display label of the measure.
    pub measure_label: String,
    /// Display label of the pivot key.
    pub pivot_label: String,
    /// The segment's stacked value.
    pub value: f64,
    /// Drill links of the source row.
    pub links: Vec<Link>,
}

impl ChartOutput {
    /// Iterates the rectangles of one column, bottom to top.
    ///
    /// The yielded rectangles borrow only from `self`, not from the key strings.
    pub fn column<'a, 'k>(
        &'a self,
        dimension_value: &'k str,
        measure_name: &'k str,
    ) -> impl Iterator<Item = &'a Rectangle> {
        self.rectangles.iter().filter(move |r| {
            r.dimension_value == dimension_value && r.measure_name == measure_name
        })
    }

    /// Returns the rectangle under a view-space `point`.
    ///
    /// The column is found from x, then y is inverted through the value scale and the first
    /// segment with `low <= v < high` wins. Zero-height segments never match.
    pub fn hit_test(&self, point: Point) -> Option<&Rectangle> {
        let plot = self.layout.plot;
        let local = point - plot.origin().to_vec2();
        if local.y < 0.0 || local.y > plot.height() {
            return None;
        }
        let dimension_value = self.scales.dimension.key_at(local.x)?;
        let dimension_x = self.scales.dimension.position(dimension_value)?;
        let measure_name = self.scales.measure.key_at(local.x - dimension_x)?;
        let v = self.scales.value.invert(local.y);
        self.column(dimension_value, measure_name)
            .find(|r| r.low <= v && v < r.high)
    }

    /// Returns tooltip content for the rectangle under `point`.
    pub fn tooltip(&self, point: Point) -> Option<Tooltip> {
        let hit = self.hit_test(point)?;
        let measure_label = self
            .fields
            .measure(&hit.measure_name)
            .map_or(hit.measure_name.as_str(), |m| m.display_label());
        Some(Tooltip {
            dimension_value: hit.dimension_value.clone(),
            measure_label: String::from(measure_label),
            pivot_label: hit.pivot_label.clone(),
            value: hit.value(),
            links: hit.links.clone(),
        })
    }

    /// Returns the segment of a column that starts exactly at the stacked offset `t`.
    ///
    /// Each segment's `low` is the running total before its pivot key, so this is the
    /// boundary lookup of [`nestcol_transforms::locate_pivot`]: interior offsets return `None`,
    /// and when several zero-height segments share a boundary the first in sort order wins.
    pub fn pivot_at(
        &self,
        dimension_value: &str,
        measure_name: &str,
        t: f64,
    ) -> Option<&Rectangle> {
        self.rectangles.iter().find(|r| {
            r.dimension_value == dimension_value && r.measure_name == measure_name && r.low == t
        })
    }
}
