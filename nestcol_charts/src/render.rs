// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between layout and drawing.

use crate::chart::ChartOutput;

/// Draws a [`ChartOutput`].
///
/// The chart never holds a renderer: the host builds an output and hands it over. Returning
/// `Ok` signals that rendering is complete; on error the previous frame should stay visible.
pub trait ChartRenderer {
    /// Renderer-specific failure.
    type Error;

    /// Draws `output`, replacing whatever was drawn before.
    fn render(&mut self, output: &ChartOutput) -> Result<(), Self::Error>;
}
