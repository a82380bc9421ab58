use proptest::prelude::*;

use salary_rank::{resolve, BracketRow, ReferenceTable};

/// Build a table whose `value` and `percentile_rank` columns are both
/// strictly / weakly ascending, from positive value steps and non-negative
/// rank steps.
fn table_from_steps(steps: Vec<(f64, f64)>) -> ReferenceTable {
    let total_rank: f64 = steps.iter().map(|(_, dr)| dr).sum();
    let mut value = 0.0;
    let mut rank_raw = 0.0;
    let rows: Vec<BracketRow> = steps
        .iter()
        .enumerate()
        .map(|(i, (dv, dr))| {
            value += dv;
            rank_raw += dr;
            let rank = if total_rank > 0.0 {
                rank_raw / total_rank * 100.0
            } else {
                0.0
            };
            BracketRow {
                label: format!("bracket {i}"),
                value,
                percentile_rank: rank.clamp(0.0, 100.0),
                headcount: None,
            }
        })
        .collect();
    ReferenceTable::from_rows(rows).unwrap()
}

fn steps() -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((0.01f64..10_000.0, 0.0f64..1.0), 1..40)
}

proptest! {
    #[test]
    fn percentile_is_monotone_in_the_query(s in steps(), q1 in 0.0f64..500_000.0, q2 in 0.0f64..500_000.0) {
        let table = table_from_steps(s);
        let (lo, hi) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
        let p_lo = resolve(&table, lo).percentile;
        let p_hi = resolve(&table, hi).percentile;
        prop_assert!(p_lo <= p_hi, "percentile({lo}) = {p_lo} > percentile({hi}) = {p_hi}");
    }

    #[test]
    fn percentile_stays_in_bounds(s in steps(), q in 0.0f64..1.0e9) {
        let table = table_from_steps(s);
        let p = resolve(&table, q).percentile;
        prop_assert!((0.0..=100.0).contains(&p));
    }

    #[test]
    fn resolution_is_idempotent(s in steps(), q in 0.0f64..500_000.0) {
        let table = table_from_steps(s);
        prop_assert_eq!(resolve(&table, q), resolve(&table, q));
    }

    #[test]
    fn below_range_is_zero_and_above_is_hundred(s in steps()) {
        let table = table_from_steps(s);
        let below = resolve(&table, table.first().value / 2.0);
        let above = resolve(&table, table.last().value * 2.0);
        if table.first().value > 0.0 {
            prop_assert_eq!(below.percentile, 0.0);
        }
        prop_assert_eq!(above.percentile, 100.0);
    }

    #[test]
    fn query_on_a_table_value_returns_that_rank(s in steps(), idx in any::<proptest::sample::Index>()) {
        let table = table_from_steps(s);
        let row = &table.rows()[idx.index(table.len())];
        let p = resolve(&table, row.value).percentile;
        prop_assert!((p - row.percentile_rank).abs() < 1e-9,
            "query {} gave {p}, expected rank {}", row.value, row.percentile_rank);
    }
}
