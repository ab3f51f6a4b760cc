// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend entries.
//!
//! One entry per pivot key, in stacking order, each paired with the color its rectangles use.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use nestcol_core::PivotKeys;
use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// Legend label options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    /// Labels longer than this many characters are cut and end in `…`.
    pub max_label_chars: usize,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            max_label_chars: 24,
        }
    }
}

/// A legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// The pivot key.
    pub key: String,
    /// The pivot key's sort value.
    pub sort_value: i64,
    /// Display label, truncated per [`LegendOptions`].
    pub label: String,
    /// Swatch color.
    pub color: Color,
}

/// Builds legend entries for `keys`, in ascending sort order.
pub fn legend_entries(
    keys: &PivotKeys,
    palette: &Palette,
    options: &LegendOptions,
) -> Vec<LegendEntry> {
    keys.iter()
        .map(|k| LegendEntry {
            key: String::from(k.key()),
            sort_value: k.sort_value(),
            label: truncate_label(k.display_value(), options.max_label_chars),
            color: palette.color_for(k),
        })
        .collect()
}

/// Cuts `label` to at most `max_chars` characters, the last of which is `…`.
///
/// `max_chars == 0` disables truncation.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if max_chars == 0 || label.chars().count() <= max_chars {
        return String::from(label);
    }
    let mut out: String = label.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use nestcol_core::PivotKey;
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn entries_follow_sort_order_with_palette_colors() {
        let keys = PivotKeys::new(vec![
            PivotKey::new("b", 1, "Bravo"),
            PivotKey::new("a", 0, "Alpha"),
        ]);
        let entries = legend_entries(&keys, &Palette::default(), &LegendOptions::default());
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Bravo"]);
        assert_eq!(entries[0].color, css::CORNFLOWER_BLUE);
        assert_eq!(entries[1].color, css::ORANGE);
    }

    #[test]
    fn long_labels_are_truncated_by_characters() {
        assert_eq!(truncate_label("Northwest", 5), "Nort…");
        assert_eq!(truncate_label("Nord", 5), "Nord");
        assert_eq!(truncate_label("ÅÅÅÅÅÅ", 3), "ÅÅ…");
        assert_eq!(truncate_label("anything", 0), "anything");
    }
}
