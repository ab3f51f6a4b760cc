// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport and plot rectangles.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Space reserved around the plot for axes and labels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin (x-axis ticks and title).
    pub bottom: f64,
    /// Left margin (y-axis ticks and title).
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 60.0,
            left: 40.0,
        }
    }
}

impl Margins {
    /// Uses the same margin on every side.
    pub fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }
}

/// Output of the arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds, at the origin.
    pub view: Rect,
    /// The plot rectangle, in view coordinates.
    pub plot: Rect,
}

impl ChartLayout {
    /// Insets `viewport` by `margins`.
    ///
    /// The plot never has negative extent: a viewport smaller than its margins yields a
    /// zero-sized plot anchored at the top-left margin corner.
    pub fn arrange(viewport: Size, margins: &Margins) -> Self {
        let width = finite_non_negative(viewport.width);
        let height = finite_non_negative(viewport.height);
        let left = finite_non_negative(margins.left);
        let top = finite_non_negative(margins.top);
        let plot_w = (width - left - finite_non_negative(margins.right)).max(0.0);
        let plot_h = (height - top - finite_non_negative(margins.bottom)).max(0.0);
        Self {
            view: Rect::new(0.0, 0.0, width, height),
            plot: Rect::new(left, top, left + plot_w, top + plot_h),
        }
    }

    /// Returns the plot size.
    pub fn plot_size(&self) -> Size {
        self.plot.size()
    }

    /// Returns `true` if the plot has no area, so nothing will be visible.
    pub fn is_collapsed(&self) -> bool {
        self.plot.width() <= 0.0 || self.plot.height() <= 0.0
    }
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn default_margins_inset_the_viewport() {
        let layout = ChartLayout::arrange(Size::new(400.0, 300.0), &Margins::default());
        assert_eq!(layout.view, Rect::new(0.0, 0.0, 400.0, 300.0));
        assert_eq!(layout.plot, Rect::new(40.0, 20.0, 380.0, 240.0));
        assert!(!layout.is_collapsed());
    }

    #[test]
    fn small_viewports_collapse_instead_of_inverting() {
        let layout = ChartLayout::arrange(Size::new(30.0, 50.0), &Margins::default());
        assert_eq!(layout.plot_size(), Size::new(0.0, 0.0));
        assert_eq!(layout.plot.origin(), kurbo::Point::new(40.0, 20.0));
        assert!(layout.is_collapsed());

        let layout = ChartLayout::arrange(Size::new(f64::NAN, -5.0), &Margins::uniform(0.0));
        assert_eq!(layout.view, Rect::ZERO);
    }
}
