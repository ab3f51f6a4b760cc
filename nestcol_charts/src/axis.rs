// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis ticks and titles.
//!
//! Axes are plain data: tick positions are plot-local, and drawing them (lines, text, rotation)
//! is left to the renderer.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::chart_scales::ChartScales;
use crate::format::format_si;

/// Which side of the plot an axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Below the plot; ticks run along x.
    Bottom,
    /// Left of the plot; ticks run along y.
    Left,
}

/// One tick: a plot-local position along the axis and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Position along the axis (x for bottom axes, y for left axes).
    pub position: f64,
    /// Tick label.
    pub label: String,
}

/// A resolved axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    /// Side of the plot.
    pub orient: AxisOrient,
    /// Ticks in axis order.
    pub ticks: Vec<AxisTick>,
    /// Axis title.
    pub title: String,
    /// Font size for tick labels and the title.
    pub font_size: f64,
}

/// Default number of value ticks to aim for.
pub const DEFAULT_VALUE_TICKS: usize = 10;

impl Axis {
    /// The dimension axis: one tick per dimension value, centred on its band.
    pub fn dimension(scales: &ChartScales, title: impl Into<String>, font_size: f64) -> Self {
        let half = scales.dimension.band_width() * 0.5;
        let ticks = scales
            .dimension
            .keys()
            .iter()
            .filter_map(|key| {
                Some(AxisTick {
                    position: scales.dimension.position(key)? + half,
                    label: key.clone(),
                })
            })
            .collect();
        Self {
            orient: AxisOrient::Bottom,
            ticks,
            title: title.into(),
            font_size,
        }
    }

    /// The value axis: nice ticks over the value domain, labelled with two significant digits
    /// and an SI prefix.
    pub fn value(
        scales: &ChartScales,
        title: impl Into<String>,
        font_size: f64,
        tick_count: usize,
    ) -> Self {
        let ticks = scales
            .value
            .ticks(tick_count)
            .into_iter()
            .map(|v| AxisTick {
                position: scales.value.map(v),
                label: format_si(v, 2),
            })
            .collect();
        Self {
            orient: AxisOrient::Left,
            ticks,
            title: title.into(),
            font_size,
        }
    }
}
