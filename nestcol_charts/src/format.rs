// Copyright 2025 the nestcol Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.

extern crate alloc;

use alloc::format;
use alloc::string::String;

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Formats `v` with `precision` significant digits and an SI prefix.
///
/// This is the `.Ns` format of d3-format: `1500` with two digits is `"1.5k"`, `20` is `"20"`,
/// `0` is `"0.0"` and `0.5` is `"500m"`. Trailing zeros are kept. Negative values use U+2212.
pub fn format_si(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let precision = precision.max(1);
    let sign = if v < 0.0 { "\u{2212}" } else { "" };
    let (digits, exponent) = decimal_parts(v.abs(), precision);

    let prefix_exponent = exponent.div_euclid(3).clamp(-8, 8) * 3;
    let i = exponent - prefix_exponent + 1;
    let n = digits.len();

    let body = match usize::try_from(i) {
        Ok(i) if i == n => digits,
        Ok(i) if i > n => {
            let mut s = digits;
            s.extend(core::iter::repeat_n('0', i - n));
            s
        }
        Ok(i) if i > 0 => format!("{}.{}", &digits[..i], &digits[i..]),
        // Below the smallest prefix: spell out the leading zeros.
        _ => {
            let zeros = usize::try_from(-i).unwrap_or(0);
            let keep = usize::try_from(i64::try_from(precision).unwrap_or(0) + i64::from(i) - 1)
                .unwrap_or(0);
            let (tail, _) = decimal_parts(v.abs(), keep.max(1));
            let mut s = String::from("0.");
            s.extend(core::iter::repeat_n('0', zeros));
            s.push_str(&tail);
            s
        }
    };
    let prefix_index = usize::try_from(prefix_exponent / 3 + 8).unwrap_or(8);
    format!("{sign}{body}{}", SI_PREFIXES[prefix_index])
}

/// Returns the significant digits (no decimal point) and decimal exponent of `v`, rounded to
/// `precision` digits.
fn decimal_parts(v: f64, precision: usize) -> (String, i32) {
    let s = format!("{:.*e}", precision.saturating_sub(1), v);
    let Some((mantissa, exponent)) = s.split_once('e') else {
        return (s, 0);
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits, exponent.parse().unwrap_or(0))
}
