use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::model::{BracketRow, ReferenceTable};
use super::normalize::rank_from_label;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Options applied while loading a reference file.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Multiplier applied to monetary values. The National Tax Service file
    /// reports salaries in units of 100 million won, so the CLI passes 1e8
    /// to get won.
    pub scale: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { scale: 1.0 }
    }
}

/// Load a reference table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row naming a label column and either a value column or
///             an aggregate/headcount pair (recommended)
/// * `.json` – `[{ "label": "...", "value": ... }, ...]`
///
/// Rows whose label has no parseable rank are dropped with a warning; a file
/// that yields no usable rows at all is an error. Input must be UTF-8 —
/// transcoding a legacy-encoded source is the caller's concern.
pub fn load_file(path: &Path, opts: &LoadOptions) -> Result<ReferenceTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path, opts),
        "json" => load_json(path, opts),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// Header names recognized for each role, in priority order. Korean names
// match the National Tax Service per-mille file.
const LABEL_COLUMNS: &[&str] = &["구분", "label", "bracket"];
const VALUE_COLUMNS: &[&str] = &["총급여", "value", "amount", "salary"];
const COUNT_COLUMNS: &[&str] = &["인원", "count", "headcount"];

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names.
///
/// The value column holds either the bracket's representative income
/// directly, or — when a headcount column is also present — the bracket's
/// aggregate income, from which per-capita value = aggregate / headcount
/// (headcount 0 gives value 0, not an error).
fn load_csv(path: &Path, opts: &LoadOptions) -> Result<ReferenceTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let label_idx = find_column(&headers, LABEL_COLUMNS)
        .context("CSV has no label column (구분/label/bracket)")?;
    let value_idx = find_column(&headers, VALUE_COLUMNS)
        .context("CSV has no value column (총급여/value/amount)")?;
    let count_idx = find_column(&headers, COUNT_COLUMNS);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let label = record.get(label_idx).unwrap_or("").trim();

        let raw = match parse_cell(record.get(value_idx).unwrap_or("")) {
            Some(v) => v,
            None => {
                log::warn!("CSV row {row_no}: unreadable value, dropping");
                dropped += 1;
                continue;
            }
        };

        let headcount = count_idx
            .and_then(|i| parse_cell(record.get(i).unwrap_or("")))
            .map(|c| c.max(0.0) as u64);

        match bracket_from_parts(label, raw, headcount, opts) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::info!("{}: dropped {dropped} unusable row(s)", path.display());
    }
    Ok(ReferenceTable::from_rows(rows)?)
}

/// Index of the first header matching any recognized name, case-insensitive.
fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    })
}

/// Parse one numeric cell, tolerating digit-grouping commas and surrounding
/// whitespace. Empty or unparseable cells give `None`.
fn parse_cell(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "label": "상위 1%", "value": 150000000 },
///   { "label": "350", "amount": 81000000000, "count": 27000 }
/// ]
/// ```
fn load_json(path: &Path, opts: &LoadOptions) -> Result<ReferenceTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let label = LABEL_COLUMNS
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(|v| v.as_str())
            .with_context(|| format!("Row {i}: missing label field"))?;

        let raw = VALUE_COLUMNS
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(json_number)
            .with_context(|| format!("Row {i}: missing or non-numeric value field"))?;

        let headcount = COUNT_COLUMNS
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(json_number)
            .map(|c| c.max(0.0) as u64);

        match bracket_from_parts(label, raw, headcount, opts) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::info!("{}: dropped {dropped} unusable row(s)", path.display());
    }
    Ok(ReferenceTable::from_rows(rows)?)
}

/// Numbers may arrive as JSON numbers or as formatted strings ("1,234").
fn json_number(v: &JsonValue) -> Option<f64> {
    match v {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_cell(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

/// Build one [`BracketRow`] from raw parts, or `None` when the label fails
/// normalization. When a headcount is present the raw value is the bracket
/// aggregate and the representative value is per-capita.
fn bracket_from_parts(
    label: &str,
    raw: f64,
    headcount: Option<u64>,
    opts: &LoadOptions,
) -> Option<BracketRow> {
    let rank = match rank_from_label(label) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("{e}, dropping row");
            return None;
        }
    };

    let scaled = raw * opts.scale;
    let value = match headcount {
        Some(0) => 0.0,
        Some(n) => scaled / n as f64,
        None => scaled,
    };

    Some(BracketRow {
        label: label.to_string(),
        value,
        percentile_rank: rank,
        headcount,
    })
}
