// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dimension value formatters.
//!
//! The row flattener renders each dimension cell to a string and then hands it to a
//! [`DimensionFormatter`]. Callers inject the formatter; the flattener never special-cases
//! dates itself.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

/// Post-processes a rendered dimension value.
pub trait DimensionFormatter {
    /// Returns the display string for `raw`.
    fn format(&self, raw: &str) -> String;
}

impl<F> DimensionFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format(&self, raw: &str) -> String {
        (self)(raw)
    }
}

/// Passes values through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainFormatter;

impl DimensionFormatter for PlainFormatter {
    fn format(&self, raw: &str) -> String {
        String::from(raw)
    }
}

/// Re-formats date-like dimension values with a `strftime` pattern.
///
/// Recognized inputs are `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM`. Anything else, and any value the pattern cannot render, passes through
/// unchanged.
#[derive(Clone, Debug)]
pub struct DateFormatter {
    pattern: String,
}

impl DateFormatter {
    /// Creates a formatter for a `strftime` pattern such as `"%b %Y"`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl DimensionFormatter for DateFormatter {
    fn format(&self, raw: &str) -> String {
        let Some(dt) = parse_date_like(raw.trim()) else {
            log::debug!("dimension value {raw:?} is not a date; leaving it as is");
            return String::from(raw);
        };
        let mut out = String::new();
        if write!(out, "{}", dt.format(&self.pattern)).is_err() {
            log::warn!("date format {:?} cannot render {raw:?}", self.pattern);
            return String::from(raw);
        }
        out
    }
}

fn parse_date_like(s: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    // Month granularity carries no day.
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
