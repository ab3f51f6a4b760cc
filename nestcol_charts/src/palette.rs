// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pivot key colors.

extern crate alloc;

use alloc::vec::Vec;

use nestcol_core::PivotKey;
use peniko::Color;
use peniko::color::palette::css;

/// Errors raised when building a [`Palette`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    /// The color list was empty.
    #[error("a palette needs at least one color")]
    Empty,
}

/// A fixed, ordered list of fill colors indexed by pivot sort value.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: alloc::vec![
                css::CORNFLOWER_BLUE,
                css::ORANGE,
                css::MEDIUM_SEA_GREEN,
                css::CRIMSON,
                css::GOLDENROD,
                css::SLATE_BLUE,
                css::DARK_CYAN,
                css::HOT_PINK,
            ],
        }
    }
}

impl Palette {
    /// Creates a palette from `colors`.
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    /// Returns the colors.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if there are no colors; never the case for a built palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns `palette[sort_value mod len]`.
    ///
    /// Negative sort values wrap from the end, so every value maps to a color.
    pub fn color_for_sort_value(&self, sort_value: i64) -> Color {
        let len = i64::try_from(self.colors.len()).unwrap_or(i64::MAX);
        let i = usize::try_from(sort_value.rem_euclid(len.max(1))).unwrap_or(0);
        self.colors.get(i).copied().unwrap_or(css::BLACK)
    }

    /// Returns the fill for a pivot key.
    pub fn color_for(&self, key: &PivotKey) -> Color {
        self.color_for_sort_value(key.sort_value())
    }
}
