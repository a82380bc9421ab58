use serde::Serialize;

use crate::error::RankError;

// ---------------------------------------------------------------------------
// BracketRow – one row of the reference table
// ---------------------------------------------------------------------------

/// A single income bracket: its source label, representative income value,
/// and position on the uniform [0,100] percentile scale (0 = lowest income,
/// 100 = highest).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketRow {
    /// Source label, kept verbatim for presentation (e.g. "상위 1%", "350").
    pub label: String,
    /// Representative income for the bracket, in won. Finite and >= 0.
    pub value: f64,
    /// Percentile rank in [0,100], derived from the label at load time.
    pub percentile_rank: f64,
    /// Population count for the bracket, when the source row carried one.
    pub headcount: Option<u64>,
}

// ---------------------------------------------------------------------------
// ReferenceTable – the full normalized table
// ---------------------------------------------------------------------------

/// The reference table: an immutable, ascending-by-`value` sequence of
/// brackets. Built once per process and borrowed read-only by the resolver,
/// so concurrent readers never race.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    rows: Vec<BracketRow>,
}

impl ReferenceTable {
    /// Build a table from normalized rows.
    ///
    /// Rows with a non-finite or negative `value`, or a rank outside
    /// [0,100], are dropped. The survivors are sorted ascending by `value`,
    /// ties broken ascending by `percentile_rank`. Fails with
    /// [`RankError::EmptyTable`] when nothing usable remains.
    pub fn from_rows(rows: Vec<BracketRow>) -> Result<Self, RankError> {
        let mut rows: Vec<BracketRow> = rows
            .into_iter()
            .filter(|r| {
                let ok = r.value.is_finite()
                    && r.value >= 0.0
                    && (0.0..=100.0).contains(&r.percentile_rank);
                if !ok {
                    log::warn!(
                        "dropping bracket '{}': value={} rank={}",
                        r.label,
                        r.value,
                        r.percentile_rank
                    );
                }
                ok
            })
            .collect();

        if rows.is_empty() {
            return Err(RankError::EmptyTable);
        }

        rows.sort_by(|a, b| {
            a.value
                .total_cmp(&b.value)
                .then(a.percentile_rank.total_cmp(&b.percentile_rank))
        });

        Ok(ReferenceTable { rows })
    }

    /// All rows, ascending by `value`.
    pub fn rows(&self) -> &[BracketRow] {
        &self.rows
    }

    /// Lowest-value bracket.
    pub fn first(&self) -> &BracketRow {
        &self.rows[0]
    }

    /// Highest-value bracket.
    pub fn last(&self) -> &BracketRow {
        &self.rows[self.rows.len() - 1]
    }

    /// Number of brackets.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Summary view: rows deduplicated by `percentile_rank` (first
    /// occurrence in table order wins), preserving the ascending order.
    pub fn summary(&self) -> Vec<&BracketRow> {
        let mut seen: Vec<u64> = Vec::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let bits = row.percentile_rank.to_bits();
            if seen.contains(&bits) {
                continue;
            }
            seen.push(bits);
            out.push(row);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, value: f64, rank: f64) -> BracketRow {
        BracketRow {
            label: label.to_string(),
            value,
            percentile_rank: rank,
            headcount: None,
        }
    }

    #[test]
    fn from_rows_sorts_by_value_then_rank() {
        let table = ReferenceTable::from_rows(vec![
            row("c", 8000.0, 95.0),
            row("a", 1200.0, 5.0),
            row("b", 3000.0, 45.0),
            row("b2", 3000.0, 40.0),
        ])
        .unwrap();

        let values: Vec<f64> = table.rows().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1200.0, 3000.0, 3000.0, 8000.0]);
        // Equal values ordered by rank.
        assert_eq!(table.rows()[1].percentile_rank, 40.0);
        assert_eq!(table.rows()[2].percentile_rank, 45.0);
    }

    #[test]
    fn from_rows_drops_invalid_values() {
        let table = ReferenceTable::from_rows(vec![
            row("ok", 100.0, 50.0),
            row("neg", -1.0, 50.0),
            row("nan", f64::NAN, 50.0),
            row("rank", 200.0, 150.0),
        ])
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.first().label, "ok");
    }

    #[test]
    fn from_rows_empty_is_an_error() {
        assert_eq!(
            ReferenceTable::from_rows(vec![]).unwrap_err(),
            RankError::EmptyTable
        );
        assert_eq!(
            ReferenceTable::from_rows(vec![row("bad", -5.0, 10.0)]).unwrap_err(),
            RankError::EmptyTable
        );
    }

    #[test]
    fn summary_dedups_by_rank() {
        let table = ReferenceTable::from_rows(vec![
            row("a", 100.0, 10.0),
            row("b", 200.0, 10.0),
            row("c", 300.0, 20.0),
        ])
        .unwrap();
        let summary = table.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].label, "a");
        assert_eq!(summary[1].label, "c");
    }
}
