use super::cell::{Row, Table};
use super::expand::{expand, line_count, Expansion, LedgerLine};
use super::schema::{VoucherSchema, VOUCHER_NUMBER};
use super::warnings::Warning;
use rust_decimal::Decimal;
use serde::Serialize;
use std::ops::Range;

/// Average lines per row used for [`Capacity::Estimate`]: principal, one
/// category block and a rounding line.
const LINES_PER_ROW_ESTIMATE: usize = 5;

/// How much room to reserve before expanding. Only affects allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Capacity {
    /// Grow as needed.
    #[default]
    Dynamic,
    /// Rows times a small constant.
    Estimate,
    /// Pre-scan every row for its exact line count.
    Exact,
}

impl Capacity {
    fn lines_for(&self, rows: &[Row], schema: &VoucherSchema) -> usize {
        match self {
            Capacity::Dynamic => 0,
            Capacity::Estimate => rows.len() * LINES_PER_ROW_ESTIMATE,
            Capacity::Exact => rows.iter().map(|r| line_count(r, schema)).sum(),
        }
    }
}

/// Reconciliation figures for one input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSummary {
    /// Sheet row number.
    pub row: usize,
    pub voucher_number: String,
    pub lines: usize,
    pub principal: Decimal,
    pub category_total: Decimal,
    pub rounding: Option<Decimal>,
}

/// The finished output table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoucherTable {
    pub lines: Vec<LedgerLine>,
    pub rows: Vec<RowSummary>,
    pub warnings: Vec<Warning>,
}

impl VoucherTable {
    pub fn rounding_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.is_rounding()).count()
    }
}

/// Appends expanded rows to the voucher table in input order.
#[derive(Debug)]
pub struct VoucherBuilder<'a> {
    schema: &'a VoucherSchema,
    table: VoucherTable,
}

impl<'a> VoucherBuilder<'a> {
    pub fn new(schema: &'a VoucherSchema) -> Self {
        VoucherBuilder {
            schema,
            table: VoucherTable::default(),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.lines.reserve(additional);
    }

    /// Next write position in the line table.
    pub fn cursor(&self) -> usize {
        self.table.lines.len()
    }

    /// Expand one row and append its lines, returning where they landed.
    pub fn push_row(&mut self, row: &Row) -> Range<usize> {
        let expansion = expand(row, self.schema);
        self.push(row.number(), row.cell(VOUCHER_NUMBER).to_string(), expansion)
    }

    fn push(&mut self, row_number: usize, voucher_number: String, expansion: Expansion) -> Range<usize> {
        debug_assert!(expansion.overflow || expansion.is_balanced());
        if expansion.principal_missing {
            self.table
                .warnings
                .push(Warning::MissingPrincipal { row: row_number });
        }
        if expansion.overflow {
            self.table
                .warnings
                .push(Warning::AmountOverflow { row: row_number });
        }
        log::debug!(
            "row {}: {} lines, principal {}, categories {}, rounding {:?}",
            row_number,
            expansion.lines.len(),
            expansion.principal,
            expansion.category_total,
            expansion.rounding
        );

        let start = self.cursor();
        self.table.rows.push(RowSummary {
            row: row_number,
            voucher_number,
            lines: expansion.lines.len(),
            principal: expansion.principal,
            category_total: expansion.category_total,
            rounding: expansion.rounding,
        });
        self.table.lines.extend(expansion.lines);
        start..self.cursor()
    }

    /// Trim reserved capacity and hand over the table.
    pub fn finish(mut self) -> VoucherTable {
        self.table.lines.shrink_to_fit();
        self.table
    }
}

/// Expand every row of `table` in file order.
pub fn build_vouchers(table: &Table, schema: &VoucherSchema, capacity: Capacity) -> VoucherTable {
    let mut builder = VoucherBuilder::new(schema);
    builder.reserve(capacity.lines_for(&table.rows, schema));
    for row in &table.rows {
        builder.push_row(row);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::CellValue;
    use crate::core::schema::{
        DrCr, SchemaRegistry, VoucherType, LEDGER_AMOUNT, LEDGER_NAME, VOUCHER_NUMBER,
    };
    use rust_decimal_macros::dec;

    fn purchase_schema() -> VoucherSchema {
        SchemaRegistry::builtin()
            .unwrap()
            .require(VoucherType::Purchase)
            .unwrap()
            .clone()
    }

    fn row(number: usize) -> Row {
        Row::numbered(number)
            .with("Purchase@28%", "0")
            .with("Purchase@18%", "0")
            .with("Purchase@12%", "0")
            .with("Purchase@5%", "0")
    }

    fn table() -> Table {
        Table {
            headers: vec![],
            rows: vec![
                row(2)
                    .with(VOUCHER_NUMBER, "P-1")
                    .with(LEDGER_NAME, "Acme")
                    .with(LEDGER_AMOUNT, dec!(118.02))
                    .with("Purchase@18%", dec!(100))
                    .with("9%CGST", dec!(9))
                    .with("9%SGST", dec!(9)),
                row(3)
                    .with(VOUCHER_NUMBER, "P-2")
                    .with(LEDGER_NAME, "Globex")
                    .with(LEDGER_AMOUNT, dec!(50)),
                row(5)
                    .with(VOUCHER_NUMBER, "P-3")
                    .with(LEDGER_NAME, "Initech")
                    .with(LEDGER_AMOUNT, CellValue::Empty)
                    .with("Purchase@5%", dec!(10))
                    .with("2.5%CGST", dec!(0.25))
                    .with("2.5%SGST", dec!(0.25)),
            ],
        }
    }

    #[test]
    fn groups_follow_input_order() {
        let schema = purchase_schema();
        let vouchers = build_vouchers(&table(), &schema, Capacity::Dynamic);

        let names: Vec<_> = vouchers.lines.iter().map(|l| l.ledger_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Acme",
                "Purchase@18%",
                "9%CGST",
                "9%SGST",
                "Rounded off",
                "Globex",
                "Rounded off",
                "Initech",
                "Purchase@5%",
                "2.5%CGST",
                "2.5%SGST",
                "Rounded off",
            ]
        );
        assert_eq!(vouchers.rows.len(), 3);
        assert_eq!(vouchers.rows[1].voucher_number, "P-2");
        assert_eq!(vouchers.rows[1].rounding, Some(dec!(50)));
        assert_eq!(vouchers.rounding_lines(), 3);
        assert_eq!(vouchers.warnings, vec![Warning::MissingPrincipal { row: 5 }]);
        assert_eq!(vouchers.rows[2].row, 5);
    }

    #[test]
    fn every_group_balances() {
        let schema = purchase_schema();
        let vouchers = build_vouchers(&table(), &schema, Capacity::Dynamic);

        let mut offset = 0;
        for summary in &vouchers.rows {
            let group = &vouchers.lines[offset..offset + summary.lines];
            let principal = group[0].amount;
            let rest: Decimal = group[1..].iter().map(|l| l.amount).sum();
            assert_eq!(principal - rest, dec!(0), "row {}", summary.row);
            assert_eq!(group[0].dr_cr, DrCr::Cr);
            assert!(group[1..].iter().all(|l| l.dr_cr == DrCr::Dr));
            offset += summary.lines;
        }
        assert_eq!(offset, vouchers.lines.len());
    }

    #[test]
    fn capacity_choice_does_not_change_output() {
        let schema = purchase_schema();
        let dynamic = build_vouchers(&table(), &schema, Capacity::Dynamic);
        let estimate = build_vouchers(&table(), &schema, Capacity::Estimate);
        let exact = build_vouchers(&table(), &schema, Capacity::Exact);

        assert_eq!(dynamic, estimate);
        assert_eq!(dynamic, exact);
        assert_eq!(Capacity::Exact.lines_for(&table().rows, &schema), exact.lines.len());
    }

    #[test]
    fn overflowing_row_is_reported_not_fatal() {
        let schema = purchase_schema();
        let table = Table {
            headers: vec![],
            rows: vec![row(2)
                .with(LEDGER_NAME, "Acme")
                .with(LEDGER_AMOUNT, Decimal::MAX)
                .with("Purchase@18%", Decimal::MIN)],
        };

        let vouchers = build_vouchers(&table, &schema, Capacity::Exact);

        assert_eq!(vouchers.lines.len(), 4);
        assert_eq!(vouchers.warnings, vec![Warning::AmountOverflow { row: 2 }]);
    }

    #[test]
    fn push_row_reports_range() {
        let schema = purchase_schema();
        let rows = table().rows;
        let mut builder = VoucherBuilder::new(&schema);

        assert_eq!(builder.push_row(&rows[0]), 0..5);
        assert_eq!(builder.push_row(&rows[1]), 5..7);
        assert_eq!(builder.cursor(), 7);
        assert_eq!(builder.finish().lines.len(), 7);
    }
}
