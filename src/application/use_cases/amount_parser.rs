// ============================================================
// AMOUNT PARSER
// ============================================================
// Best-effort numeric totals from free-text spreadsheet cells.
// Never fails: anything unparseable is worth zero.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::dataset::{ColumnRole, Record};

static PLUS_SPLIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\+\s*").unwrap());

static SEGMENT_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

static TEXT_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,5}(?:[.,]\d+)?").unwrap());

/// Values accepted by the right-to-left row scan lie strictly below this.
pub const ROW_SCAN_CEILING: f64 = 50_000.0;

/// Four-digit values in this range look like postal codes.
fn is_postal_code_like(value: f64) -> bool {
    (1000.0..=9999.0).contains(&value)
}

/// Parse an amount out of free text.
///
/// `"55 + 100"` sums to 155. Without `+`, the last number wins. A value in
/// 1000..=9999 is dropped when other numbers sit next to it.
pub fn parse_amount(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let text = text.replace('\u{a0}', " ");
    if text.contains('+') {
        sum_expression(&text)
    } else {
        last_relevant_number(&text)
    }
}

fn sum_expression(text: &str) -> f64 {
    PLUS_SPLIT_PATTERN
        .split(text)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            // "50.-" / "1.000,50" style: drop dot grouping, comma is decimal
            let cleaned = segment
                .replace(' ', "")
                .replace(".-", "")
                .replace(".–", "")
                .replace('.', "")
                .replace(',', ".");

            let numbers: Vec<&str> = SEGMENT_NUMBER_PATTERN
                .find_iter(&cleaned)
                .map(|m| m.as_str())
                .collect();

            let value = numbers.first()?.parse::<f64>().ok()?;
            if is_postal_code_like(value) && numbers.len() > 1 {
                return None;
            }
            Some(value)
        })
        .sum()
}

fn last_relevant_number(text: &str) -> f64 {
    let candidates: Vec<&str> = TEXT_NUMBER_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();
    let several = candidates.len() > 1;

    candidates
        .iter()
        .filter_map(|raw| raw.replace('.', "").replace(',', ".").parse::<f64>().ok())
        .filter(|value| !(several && is_postal_code_like(*value)))
        .last()
        .unwrap_or(0.0)
}

/// Amount for one row.
///
/// Tries the designated amount column, then any column whose header looks
/// like an amount, then every column right to left accepting the first value
/// in `(0, 50000)`.
pub fn find_amount_in_row(record: &Record<'_>, amount_column: Option<&str>) -> f64 {
    if let Some(column) = amount_column {
        if let Some(raw) = record.get(column) {
            let value = parse_amount(raw);
            if value > 0.0 {
                return value;
            }
        }
    }

    let rule = ColumnRole::Amount.rule();
    for (header, raw) in record.fields() {
        if rule.tiers.iter().any(|tier| rule.matches(tier, header)) {
            let value = parse_amount(raw);
            if value > 0.0 {
                return value;
            }
        }
    }

    record
        .fields()
        .rev()
        .map(|(_, raw)| parse_amount(raw))
        .find(|value| *value > 0.0 && *value < ROW_SCAN_CEILING)
        .unwrap_or(0.0)
}

/// Render an amount without decimals, the way receipts print it.
pub fn format_amount(value: f64) -> String {
    format!("{:.0}", value)
}
