// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `a x b [unit]` dimension patterns in names and tags.
//!
//! Accepts `x`, `X`, `×` or `*` as separator, `.` as decimal mark, and an
//! optional `mm`/`millimeter(s)`/`cm`/`m` suffix. Commas separate entries.
//! Results are always in millimetres and never depend on the model's declared
//! unit.

use crate::units::{magnitude_scale, token_scale};
use regex::Regex;
use std::sync::LazyLock;

static RE_DIMENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*[x×*]\s*(\d+(?:\.\d+)?)(?:\s*(millimet(?:er|re)s?|mm|cm|m)\b)?",
    )
    .unwrap()
});

/// Outcome of scanning one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextDimensions {
    /// A pair in millimetres, as written (not yet ordered).
    Found(f64, f64),
    /// Several matches that disagree.
    Ambiguous,
    NotFound,
}

/// Scan `text` for a dimension pair.
///
/// Repeats of the same section (in either order) count as one match.
pub fn parse_dimensions(text: &str) -> TextDimensions {
    let mut found: Option<(f64, f64)> = None;

    for caps in RE_DIMENSIONS.captures_iter(text) {
        let (Ok(a), Ok(b)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            continue;
        };
        let scale = match caps.get(3) {
            Some(unit) => token_scale(unit.as_str()).unwrap_or(1.0),
            None => magnitude_scale(a, b),
        };
        let pair = (a * scale, b * scale);

        match found {
            None => found = Some(pair),
            Some(first) if same_section(first, pair) => {}
            Some(_) => return TextDimensions::Ambiguous,
        }
    }

    match found {
        Some((a, b)) => TextDimensions::Found(a, b),
        None => TextDimensions::NotFound,
    }
}

fn same_section(p: (f64, f64), q: (f64, f64)) -> bool {
    let sorted = |(a, b): (f64, f64)| if a <= b { (a, b) } else { (b, a) };
    let (p, q) = (sorted(p), sorted(q));
    (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9
}
