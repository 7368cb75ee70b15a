use super::cell::{CellValue, Table};
use super::warnings::Warning;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal places kept for every monetary column.
pub const MONEY_DP: u32 = 2;

/// Coerce the given monetary columns to numbers rounded to [`MONEY_DP`].
///
/// Unparseable cells become [`CellValue::NotANumber`] and are reported, never
/// raised. Columns missing from the table are skipped. Other columns are left
/// untouched.
pub fn normalize_amounts(table: &mut Table, columns: &[String]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let present: Vec<&String> = columns.iter().filter(|c| table.has_column(c)).collect();

    for row in table.rows.iter_mut() {
        let number = row.number();
        for column in &present {
            if let Some(cell) = row.get_mut(column) {
                let normalized = to_amount(cell);
                if let CellValue::NotANumber(value) = &normalized {
                    warnings.push(Warning::MalformedNumber {
                        row: number,
                        column: column.to_string(),
                        value: value.clone(),
                    });
                }
                *cell = normalized;
            }
        }
    }
    warnings
}

fn to_amount(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(d) => CellValue::Number(d.round_dp(MONEY_DP)),
        CellValue::Text(s) if s.trim().is_empty() => CellValue::Empty,
        CellValue::Text(s) => match parse_decimal(s) {
            Some(d) => CellValue::Number(d.round_dp(MONEY_DP)),
            None => CellValue::NotANumber(s.clone()),
        },
        other => other.clone(),
    }
}

/// Strict numeric parse: plain or scientific notation, surrounding
/// whitespace allowed.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Row;
    use rust_decimal_macros::dec;

    fn table(rows: Vec<Row>) -> Table {
        Table {
            headers: vec!["Ledger Name".into(), "Ledger Amount".into(), "Sales@18%".into()],
            rows,
        }
    }

    #[test]
    fn rounds_and_parses_monetary_columns() {
        let mut t = table(vec![Row::new()
            .with("Ledger Name", "00123")
            .with("Ledger Amount", "118.004")
            .with("Sales@18%", dec!(100.126))]);

        let warnings = normalize_amounts(
            &mut t,
            &["Ledger Amount".to_string(), "Sales@18%".to_string()],
        );

        assert!(warnings.is_empty());
        let row = &t.rows[0];
        assert_eq!(row.cell("Ledger Amount"), CellValue::Number(dec!(118.00)));
        assert_eq!(row.cell("Sales@18%"), CellValue::Number(dec!(100.13)));
        // non-monetary column keeps its text form
        assert_eq!(row.cell("Ledger Name"), CellValue::text("00123"));
    }

    #[test]
    fn unparseable_value_becomes_not_a_number() {
        let mut t = table(vec![Row::numbered(7).with("Sales@18%", "n/a")]);

        let warnings = normalize_amounts(&mut t, &["Sales@18%".to_string()]);

        assert_eq!(t.rows[0].cell("Sales@18%"), CellValue::NotANumber("n/a".into()));
        assert_eq!(
            warnings,
            vec![Warning::MalformedNumber {
                row: 7,
                column: "Sales@18%".into(),
                value: "n/a".into()
            }]
        );
    }

    #[test]
    fn absent_column_is_skipped() {
        let mut t = table(vec![Row::new().with("Ledger Amount", "5")]);

        let warnings = normalize_amounts(&mut t, &["Purchase@5%".to_string()]);

        assert!(warnings.is_empty());
        assert_eq!(t.rows[0].get("Purchase@5%"), None);
    }

    #[test]
    fn blank_text_becomes_empty() {
        let mut t = table(vec![Row::new().with("Ledger Amount", "  ")]);
        normalize_amounts(&mut t, &["Ledger Amount".to_string()]);
        assert_eq!(t.rows[0].cell("Ledger Amount"), CellValue::Empty);
    }

    #[test]
    fn parse_decimal_accepts_scientific() {
        assert_eq!(parse_decimal(" 1.5e2 "), Some(dec!(150)));
        assert_eq!(parse_decimal("1,000"), None);
    }
}
