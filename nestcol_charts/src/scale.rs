// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Band and linear scales.
//!
//! Band scales follow the d3 `scaleBand` model: padding is a fraction of the step, and bands
//! are centred within the range. Linear scales are plain affine maps with an inverse for hit
//! testing.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    ///
    /// A collapsed range inverts to the domain start.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns "nice" tick values inside the domain.
    ///
    /// Steps are 1, 2 or 5 times a power of ten, chosen so that roughly `count` ticks fit.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let first = (min / step).ceil();
    let last = (max / step).floor();
    let n_f = (last - first).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f.min(10_000.0) as u64
        }
    } else {
        return Vec::new();
    };
    // Multiplying integer indices keeps ticks like 0.3 exact instead of accumulating error.
    (0..=n).map(|i| (first + i as f64) * step).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "log10 of a finite f64 is within the i32 range"
    )]
    let base = 10_f64.powi(power as i32);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A discrete band scale.
///
/// With `n` bands, inner padding `pi` and outer padding `po` over a range of span `s`:
/// `step = s / max(1, n - pi + 2 po)`, `bandwidth = step (1 - pi)` and band `i` starts at
/// `r0 + step po + step i`. A range with no positive span yields zero-width bands at `r0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
    round: bool,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`, with no padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
            round: false,
        }
    }

    /// Sets inner and outer padding as fractions of the step.
    ///
    /// Inner padding is clamped to `[0, 1]`; outer padding to `>= 0`.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = if inner.is_finite() {
            inner.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.padding_outer = if outer.is_finite() {
            outer.max(0.0)
        } else {
            0.0
        };
        self
    }

    /// Snaps the step and band starts to whole pixels, centring the leftover space.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    fn span(&self) -> f64 {
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.is_finite() && span > 0.0 {
            span
        } else {
            0.0
        }
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let span = self.span();
        if self.count == 0 || span == 0.0 {
            return 0.0;
        }
        let n = self.count as f64;
        let step = span / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        if self.round { step.floor() } else { step }
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let bw = self.step() * (1.0 - self.padding_inner);
        if self.round { bw.round() } else { bw }
    }

    fn start(&self) -> f64 {
        let r0 = self.range.0;
        let span = self.span();
        if self.count == 0 || span == 0.0 {
            return r0;
        }
        let step = self.step();
        let used = step * (self.count as f64 - self.padding_inner);
        let start = r0 + (span - used) * 0.5;
        if self.round { start.round() } else { start }
    }

    /// Returns the start position for a band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        self.start() + self.step() * index as f64
    }

    /// Returns the band whose `[x, x + bandwidth)` extent contains `pos`.
    pub fn index_at(&self, pos: f64) -> Option<usize> {
        let step = self.step();
        let bw = self.band_width();
        if step <= 0.0 || bw <= 0.0 || !pos.is_finite() {
            return None;
        }
        let offset = pos - self.start();
        if offset < 0.0 {
            return None;
        }
        let i_f = (offset / step).floor();
        if i_f >= self.count as f64 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "non-negative and below the band count"
        )]
        let i = i_f as usize;
        (pos < self.x(i) + bw).then_some(i)
    }
}

/// A [`ScaleBand`] over an ordered domain of distinct string keys.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalBand {
    band: ScaleBand,
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl OrdinalBand {
    /// Creates a band scale over `keys`, keeping the first occurrence of repeated keys.
    pub fn new<K: Into<String>>(keys: impl IntoIterator<Item = K>, range: (f64, f64)) -> Self {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for key in keys {
            let key = key.into();
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key.clone(), ordered.len());
            ordered.push(key);
        }
        Self {
            band: ScaleBand::new(range, ordered.len()),
            keys: ordered,
            index,
        }
    }

    /// Sets padding on the underlying band scale.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.band = self.band.with_padding(inner, outer);
        self
    }

    /// Enables pixel rounding on the underlying band scale.
    pub fn with_round(mut self, round: bool) -> Self {
        self.band = self.band.with_round(round);
        self
    }

    /// Returns the underlying band scale.
    pub fn band(&self) -> &ScaleBand {
        &self.band
    }

    /// Returns the domain, in order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the band width.
    pub fn band_width(&self) -> f64 {
        self.band.band_width()
    }

    /// Returns the domain position of `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Returns the band start for `key`, or `None` if it is not in the domain.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.index_of(key).map(|i| self.band.x(i))
    }

    /// Returns the key whose band contains `pos`.
    pub fn key_at(&self, pos: f64) -> Option<&str> {
        self.band
            .index_at(pos)
            .and_then(|i| self.keys.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn band_padding_is_a_fraction_of_the_step() {
        // 2 bands, inner 0.1: step = 100 / 1.9, bands centred.
        let s = ScaleBand::new((0.0, 100.0), 2).with_padding(0.1, 0.0);
        let step = 100.0 / 1.9;
        assert!(close(s.step(), step));
        assert!(close(s.band_width(), step * 0.9));
        assert!(close(s.x(0), 0.0));
        assert!(close(s.x(1) + s.band_width(), 100.0));
    }

    #[test]
    fn outer_padding_insets_both_ends() {
        let s = ScaleBand::new((0.0, 50.0), 2).with_padding(0.05, 0.2);
        let step = 50.0 / (2.0 - 0.05 + 0.4);
        assert!(close(s.x(0), step * 0.2));
        assert!(close(50.0 - (s.x(1) + s.band_width()), step * 0.2));
    }

    #[test]
    fn single_band_with_large_padding_does_not_overflow() {
        // n - pi + 2 po < 1 is clamped to 1.
        let s = ScaleBand::new((0.0, 10.0), 1).with_padding(0.5, 0.0);
        assert!(close(s.step(), 10.0));
        assert!(close(s.band_width(), 5.0));
        assert!(close(s.x(0), 2.5));
    }

    #[test]
    fn collapsed_range_gives_zero_width_bands() {
        for range in [(0.0, 0.0), (0.0, -10.0)] {
            let s = ScaleBand::new(range, 3).with_padding(0.1, 0.0);
            assert_eq!(s.band_width(), 0.0);
            assert_eq!(s.x(2), 0.0);
            assert_eq!(s.index_at(0.0), None);
        }
    }

    #[test]
    fn rounding_snaps_to_whole_pixels() {
        let s = ScaleBand::new((0.0, 100.0), 3)
            .with_padding(0.1, 0.0)
            .with_round(true);
        assert_eq!(s.step(), s.step().floor());
        assert_eq!(s.band_width(), s.band_width().round());
        assert_eq!(s.x(1), s.x(1).round());
    }

    #[test]
    fn index_at_skips_inner_padding() {
        let s = ScaleBand::new((0.0, 100.0), 2).with_padding(0.1, 0.0);
        assert_eq!(s.index_at(1.0), Some(0));
        assert_eq!(s.index_at(s.x(1) + 1.0), Some(1));
        // The gap between the two bands.
        assert_eq!(s.index_at(s.band_width() + 0.5 * (s.x(1) - s.band_width())), None);
        assert_eq!(s.index_at(100.5), None);
        assert_eq!(s.index_at(-1.0), None);
    }

    #[test]
    fn ordinal_band_keeps_first_seen_order() {
        let b = OrdinalBand::new(["Jan", "Feb", "Jan", "Mar"], (0.0, 300.0));
        assert_eq!(b.keys(), &["Jan", "Feb", "Mar"]);
        assert_eq!(b.position("Feb"), Some(100.0));
        assert_eq!(b.position("Apr"), None);
        assert_eq!(b.key_at(250.0), Some("Mar"));
    }

    #[test]
    fn linear_maps_and_inverts_an_inverted_range() {
        let s = ScaleLinear::new((0.0, 20.0), (200.0, 0.0));
        assert_eq!(s.map(0.0), 200.0);
        assert_eq!(s.map(20.0), 0.0);
        assert_eq!(s.map(10.0), 100.0);
        assert_eq!(s.invert(100.0), 10.0);
        assert_eq!(s.invert(0.0), 20.0);
    }

    #[test]
    fn collapsed_linear_range_inverts_to_domain_start() {
        let s = ScaleLinear::new((0.0, 20.0), (0.0, 0.0));
        assert_eq!(s.map(7.0), 0.0);
        assert_eq!(s.invert(0.0), 0.0);
    }

    #[test]
    fn ticks_stay_inside_the_domain() {
        let s = ScaleLinear::new((0.0, 20.0), (100.0, 0.0));
        assert_eq!(
            s.ticks(10),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0]
        );
        let s = ScaleLinear::new((0.0, 17.0), (100.0, 0.0));
        assert_eq!(s.ticks(4), vec![0.0, 5.0, 10.0, 15.0]);
        let s = ScaleLinear::new((0.0, 1.0), (100.0, 0.0));
        assert_eq!(s.ticks(5).len(), 6);
    }
}
