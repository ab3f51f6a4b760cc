// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested, stacked column charts.
//!
//! This crate turns a query result into drawable primitives:
//! - **Scales**: a band per dimension value, a nested band per measure, and a linear value
//!   scale.
//! - **Geometry**: one [`Rectangle`] per `(dimension, measure, pivot key)`.
//! - **Guides**: legend entries and axis ticks.
//! - **Interaction**: hit testing and tooltips over the emitted rectangles.
//!
//! [`NestedColumnChart`] runs the whole pipeline. Drawing is done by a [`ChartRenderer`]
//! supplied by the host.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod chart;
mod chart_scales;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod geometry;
mod layout;
mod legend;
mod palette;
mod render;
mod scale;

pub use axis::{Axis, AxisOrient, AxisTick, DEFAULT_VALUE_TICKS};
pub use chart::{ChartConfig, ChartError, ChartOutput, FontSize, NestedColumnChart, Tooltip};
pub use chart_scales::{ChartScales, ScaleOptions};
pub use format::format_si;
pub use geometry::{Rectangle, map_geometry};
pub use layout::{ChartLayout, Margins};
pub use legend::{LegendEntry, LegendOptions, legend_entries, truncate_label};
pub use palette::{Palette, PaletteError};
pub use render::ChartRenderer;
pub use scale::{OrdinalBand, ScaleBand, ScaleLinear};
