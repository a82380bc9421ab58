use serde::Serialize;

use crate::resolver::{Position, Resolution};

// ---------------------------------------------------------------------------
// Presenter – structured result → text / JSON
// ---------------------------------------------------------------------------

/// Everything a front end needs to present one resolution.
#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    /// The queried income, in won.
    pub query: f64,
    /// Interpolated percentile in [0,100] (0 = lowest income).
    pub percentile: f64,
    /// Same estimate expressed as "top N%" (100 − percentile).
    pub top_percent: f64,
    pub position: Position,
}

impl RankReport {
    pub fn new(query: f64, resolution: Resolution) -> Self {
        RankReport {
            query,
            percentile: resolution.percentile,
            top_percent: 100.0 - resolution.percentile,
            position: resolution.position,
        }
    }
}

/// Render a report as user-facing text.
pub fn render(report: &RankReport) -> String {
    let head = match &report.position {
        Position::Below { nearest } => format!(
            "An income of {} won is below the lowest bracket ({}, {} won).",
            group_digits(report.query),
            nearest.label,
            group_digits(nearest.value),
        ),
        Position::Above { nearest } => format!(
            "An income of {} won is above the highest bracket ({}, {} won).",
            group_digits(report.query),
            nearest.label,
            group_digits(nearest.value),
        ),
        Position::AtFirst { row } => format!(
            "An income of {} won sits exactly on the lowest bracket ({}).",
            group_digits(report.query),
            row.label,
        ),
        Position::Between { lower, upper } => format!(
            "An income of {} won falls between brackets {} ({} won) and {} ({} won).",
            group_digits(report.query),
            lower.label,
            group_digits(lower.value),
            upper.label,
            group_digits(upper.value),
        ),
    };

    format!(
        "{head}\nEstimated percentile: {:.1} (top {:.1}%)",
        report.percentile, report.top_percent
    )
}

/// Format a non-negative amount with digit-grouping commas, dropping any
/// fractional part (won are indivisible in practice).
fn group_digits(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
