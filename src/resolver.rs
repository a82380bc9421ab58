use serde::Serialize;

use crate::data::model::{BracketRow, ReferenceTable};
use crate::error::RankError;

// ---------------------------------------------------------------------------
// Resolution – where a query landed
// ---------------------------------------------------------------------------

/// The bracket(s) surrounding a query value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Position {
    /// Query below the lowest bracket value.
    Below { nearest: BracketRow },
    /// Query above the highest bracket value.
    Above { nearest: BracketRow },
    /// Query equal to the lowest bracket value, so no strictly-lower row
    /// exists.
    AtFirst { row: BracketRow },
    /// Query strictly between (or equal to the upper of) two brackets.
    Between { lower: BracketRow, upper: BracketRow },
}

/// Result of resolving one query against a reference table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub position: Position,
    /// Interpolated continuous percentile, clamped to [0,100].
    pub percentile: f64,
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Parse user text into a query value.
///
/// Digit-grouping commas and a trailing currency marker ("원") are
/// tolerated. Negative or non-numeric input fails with
/// [`RankError::InvalidQuery`] — it is never coerced to zero.
pub fn parse_query(text: &str) -> Result<f64, RankError> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('원')
        .trim()
        .replace(',', "");

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(RankError::InvalidQuery(text.trim().to_string())),
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Locate `query` in the table and estimate its continuous percentile.
///
/// A pure function of (table, query): no hidden state, deterministic,
/// idempotent. The table is non-empty and sorted by construction.
///
/// Outside the table range the percentile is 0 (below) or 100 (above), not
/// extrapolated. Inside, it is piecewise-linear interpolation of
/// `percentile_rank` over `value`.
pub fn resolve(table: &ReferenceTable, query: f64) -> Resolution {
    let rows = table.rows();
    let first = table.first();
    let last = table.last();

    if query < first.value {
        return Resolution {
            position: Position::Below { nearest: first.clone() },
            percentile: 0.0,
        };
    }
    if query > last.value {
        return Resolution {
            position: Position::Above { nearest: last.clone() },
            percentile: 100.0,
        };
    }

    // Leftmost row with value >= query.
    let upper_idx = rows.partition_point(|r| r.value < query);
    let percentile = interpolate(rows, query);

    let position = if upper_idx == 0 {
        // query == first.value, no strictly-lower row exists.
        Position::AtFirst { row: first.clone() }
    } else {
        Position::Between {
            lower: rows[upper_idx - 1].clone(),
            upper: rows[upper_idx].clone(),
        }
    };

    Resolution { position, percentile }
}

/// Piecewise-linear interpolation of rank over value, evaluated at `query`.
/// Caller guarantees `first.value <= query <= last.value`.
fn interpolate(rows: &[BracketRow], query: f64) -> f64 {
    let upper_idx = rows.partition_point(|r| r.value < query);
    if upper_idx == 0 {
        return rows[0].percentile_rank.clamp(0.0, 100.0);
    }

    let lower = &rows[upper_idx - 1];
    let upper = &rows[upper_idx];
    let dx = upper.value - lower.value;
    // Duplicate values make a zero-width segment; take the upper rank.
    let rank = if dx <= 0.0 {
        upper.percentile_rank
    } else {
        let t = (query - lower.value) / dx;
        lower.percentile_rank + t * (upper.percentile_rank - lower.percentile_rank)
    };
    rank.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::BracketRow;

    fn row(value: f64, rank: f64) -> BracketRow {
        BracketRow {
            label: format!("{rank}"),
            value,
            percentile_rank: rank,
            headcount: None,
        }
    }

    fn table() -> ReferenceTable {
        ReferenceTable::from_rows(vec![
            row(1200.0, 5.0),
            row(3000.0, 45.0),
            row(8000.0, 95.0),
        ])
        .unwrap()
    }

    #[test]
    fn query_between_brackets_interpolates() {
        let r = resolve(&table(), 2000.0);
        match &r.position {
            Position::Between { lower, upper } => {
                assert_eq!(lower.value, 1200.0);
                assert_eq!(upper.value, 3000.0);
            }
            other => panic!("unexpected position: {other:?}"),
        }
        // 5 + (2000-1200)/(3000-1200) * 40
        assert!((r.percentile - 22.777_777_777).abs() < 1e-6);
    }

    #[test]
    fn query_below_range_is_percentile_zero() {
        let r = resolve(&table(), 500.0);
        assert_eq!(r.percentile, 0.0);
        assert!(matches!(r.position, Position::Below { ref nearest } if nearest.value == 1200.0));
    }

    #[test]
    fn query_above_range_is_percentile_hundred() {
        let r = resolve(&table(), 10_000.0);
        assert_eq!(r.percentile, 100.0);
        assert!(matches!(r.position, Position::Above { ref nearest } if nearest.value == 8000.0));
    }

    #[test]
    fn query_on_a_bracket_returns_its_rank() {
        assert_eq!(resolve(&table(), 3000.0).percentile, 45.0);
        assert_eq!(resolve(&table(), 8000.0).percentile, 95.0);
    }

    #[test]
    fn query_on_the_first_bracket_has_no_lower_bound() {
        let r = resolve(&table(), 1200.0);
        assert_eq!(r.percentile, 5.0);
        assert!(matches!(r.position, Position::AtFirst { ref row } if row.value == 1200.0));
    }

    #[test]
    fn duplicate_values_take_the_upper_rank() {
        let t = ReferenceTable::from_rows(vec![
            row(100.0, 10.0),
            row(200.0, 20.0),
            row(200.0, 30.0),
            row(300.0, 40.0),
        ])
        .unwrap();
        assert_eq!(resolve(&t, 200.0).percentile, 20.0);
        // Just past the duplicate pair, interpolation continues from rank 30.
        let r = resolve(&t, 250.0);
        assert!((r.percentile - 35.0).abs() < 1e-9);
    }

    #[test]
    fn parse_query_accepts_grouped_digits() {
        assert_eq!(parse_query("35,000,000").unwrap(), 35_000_000.0);
        assert_eq!(parse_query(" 4200 원").unwrap(), 4200.0);
        assert_eq!(parse_query("0").unwrap(), 0.0);
    }

    #[test]
    fn parse_query_rejects_bad_input() {
        assert!(matches!(parse_query("-1"), Err(RankError::InvalidQuery(_))));
        assert!(matches!(parse_query("abc"), Err(RankError::InvalidQuery(_))));
        assert!(matches!(parse_query(""), Err(RankError::InvalidQuery(_))));
        assert!(matches!(parse_query("NaN"), Err(RankError::InvalidQuery(_))));
    }
}
