use crate::error::RankError;

// ---------------------------------------------------------------------------
// Label-to-rank normalization
// ---------------------------------------------------------------------------
//
// Source files mix several label conventions for the same scale:
//   "상위 1%" / "top 1%"    – distance from the top, as a percentage
//   "하위 5%" / "bottom 5%" – distance from the bottom, as a percentage
//   "350"                   – per-mille bracket index (1..=1000)
// All are normalized to a rank in [0,100] where 0 is the lowest income.

const TOP_TOKENS: &[&str] = &["상위", "top"];
const BOTTOM_TOKENS: &[&str] = &["하위", "bottom"];

/// Convert a free-text bracket label into a percentile rank in [0,100].
///
/// The first numeric substring in the label is extracted as `v`, then:
/// * a "top" token means rank = 100 − v (v read as a percentage — this
///   convention is used throughout, see the regression tests);
/// * a "bottom" token means rank = v;
/// * otherwise `v` is a per-mille bracket index: rank = v / 1000 × 100.
///
/// Fails with [`RankError::MalformedLabel`] when no number is present.
pub fn rank_from_label(label: &str) -> Result<f64, RankError> {
    let v = first_number(label)
        .ok_or_else(|| RankError::MalformedLabel(label.to_string()))?;

    let lowered = label.to_lowercase();
    let rank = if TOP_TOKENS.iter().any(|t| lowered.contains(t)) {
        100.0 - v
    } else if BOTTOM_TOKENS.iter().any(|t| lowered.contains(t)) {
        v
    } else {
        v / 1000.0 * 100.0
    };

    Ok(rank.clamp(0.0, 100.0))
}

/// Extract the first numeric substring of `s` as an `f64`.
///
/// Accepts digit-grouping commas ("1,000") and a single decimal point
/// ("0.5"); the number ends at the first character that continues neither.
fn first_number(s: &str) -> Option<f64> {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut num = String::new();
    let mut seen_dot = false;
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            num.push(c);
        } else if c == ',' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
            // grouping comma, skip
        } else if c == '.' && !seen_dot && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
            seen_dot = true;
            num.push(c);
        } else {
            break;
        }
        i += 1;
    }

    num.parse().ok()
}
