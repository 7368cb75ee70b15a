use super::cell::{CellValue, Table};
use super::warnings::Warning;
use chrono::NaiveDate;

/// Convert `dd-mm-yyyy` (optionally wrapped in single quotes) to `mm-dd-yyyy`.
///
/// Returns `None` when the text does not have exactly that shape or is not a
/// real calendar date.
pub fn to_month_first(value: &str) -> Option<String> {
    let value = value.trim().trim_matches('\'');
    let shape_ok = value.len() == 10
        && value.char_indices().all(|(i, c)| match i {
            2 | 5 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    let date = NaiveDate::parse_from_str(value, "%d-%m-%Y").ok()?;
    Some(date.format("%m-%d-%Y").to_string())
}

/// Rewrite every date in `column` to month-first form.
///
/// Cells that do not parse are left as they are and reported. Empty cells are
/// ignored.
pub fn normalize_dates(table: &mut Table, column: &str) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for row in table.rows.iter_mut() {
        let number = row.number();
        let Some(cell) = row.get_mut(column) else {
            continue;
        };
        if cell.is_empty() {
            continue;
        }
        let text = cell.to_string();
        match to_month_first(&text) {
            Some(converted) => *cell = CellValue::Text(converted),
            None => warnings.push(Warning::MalformedDate {
                row: number,
                value: text,
            }),
        }
    }
    warnings
}
