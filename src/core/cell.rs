use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Description of one output column, generated by `#[derive(SheetColumns)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetColumn {
    pub name: &'static str,
    /// False when the column is only filled on some lines.
    pub every_line: bool,
    pub description: &'static str,
}

/// A single spreadsheet cell as read from an input sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
    /// A monetary cell that could not be parsed; keeps the original text.
    NotANumber(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Exact zero test: numeric zero at any scale, or the literal string "0".
    ///
    /// Near-zero values such as `0.0001` are not zero.
    pub fn is_exact_zero(&self) -> bool {
        match self {
            CellValue::Number(d) => d.is_zero(),
            CellValue::Text(s) => s == "0",
            _ => false,
        }
    }

    /// Numeric value of the cell. Numeric text is parsed as-is, without
    /// the rounding the normalizer applies.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(d) => Some(*d),
            CellValue::Text(s) => super::normalize::parse_decimal(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::NotANumber(s) => f.write_str(s),
            CellValue::Number(d) => write!(f, "{}", d),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        CellValue::Number(d)
    }
}

/// One input row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// 1-based row number in the source sheet (the header is row 1); 0 when
    /// the row was not read from a sheet.
    number: usize,
    cells: HashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbered(number: usize) -> Self {
        Row {
            number,
            ..Self::default()
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut CellValue> {
        self.cells.get_mut(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    #[cfg(test)]
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Cell value, falling back to `Empty` when the column is absent.
    pub fn cell(&self, column: &str) -> CellValue {
        self.cells.get(column).cloned().unwrap_or_default()
    }
}

/// An in-memory sheet: ordered headers plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build a table from a raw grid whose first row is the header.
    ///
    /// Header cells are trimmed. Rows that are entirely empty are dropped but
    /// still counted, so every row keeps its sheet row number. Cells missing
    /// from short rows read as empty.
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let headers: Vec<String> = match grid.next() {
            Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => return Table::default(),
        };

        let rows = grid
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
            .map(|(index, cells)| {
                // header is sheet row 1
                let mut row = Row::numbered(index + 2);
                let mut cells = cells.into_iter();
                for header in &headers {
                    let cell = cells.next().unwrap_or_default();
                    if !header.is_empty() {
                        row.set(header.clone(), cell);
                    }
                }
                row
            })
            .collect();

        Table { headers, rows }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn exact_zero_matches_numeric_and_string_zero_only() {
        assert!(CellValue::Number(dec!(0)).is_exact_zero());
        assert!(CellValue::Number(dec!(0.00)).is_exact_zero());
        assert!(CellValue::text("0").is_exact_zero());

        assert!(!CellValue::Number(dec!(0.0001)).is_exact_zero());
        assert!(!CellValue::text("0.0").is_exact_zero());
        assert!(!CellValue::Empty.is_exact_zero());
        assert!(!CellValue::NotANumber("abc".into()).is_exact_zero());
    }

    #[test]
    fn table_from_grid_uses_first_row_as_header() {
        let grid = vec![
            vec![CellValue::text(" Ledger Name "), CellValue::text("Ledger Amount")],
            vec![CellValue::text("ACME"), CellValue::Number(dec!(118))],
            vec![CellValue::Empty, CellValue::text("  ")],
            vec![CellValue::text("Globex")],
        ];

        let table = Table::from_grid(grid);

        assert_eq!(table.headers, vec!["Ledger Name", "Ledger Amount"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cell("Ledger Amount"), CellValue::Number(dec!(118)));
        assert_eq!(table.rows[1].get("Ledger Amount"), Some(&CellValue::Empty));
        assert!(table.has_column("Ledger Name"));
        // the blank third sheet row is skipped but still counted
        assert_eq!(table.rows[0].number(), 2);
        assert_eq!(table.rows[1].number(), 4);
    }

    #[test]
    fn empty_grid_gives_empty_table() {
        assert_eq!(Table::from_grid(vec![]), Table::default());
    }
}
