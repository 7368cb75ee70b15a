//! Preview command - show the expanded ledger lines without writing a file

use super::{load_vouchers, PipelineOptions};
use crate::core::voucher::RowSummary;
use crate::core::{Capacity, LedgerLine, SchemaRegistry, VoucherTable, VoucherType};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct PreviewCommand {
    /// Voucher type of the input sheet: purchase or sales
    voucher_type: VoucherType,

    /// Ledger sheet to expand (.xlsx or .csv)
    input: PathBuf,

    /// Only show the first N input rows
    #[arg(short = 'n', long)]
    rows: Option<usize>,

    /// Rewrite Voucher Date from dd-mm-yyyy to mm-dd-yyyy
    #[arg(long)]
    convert_dates: bool,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

/// Row for the ledger line table
#[derive(Debug, Clone, Tabled)]
struct LineRow {
    #[tabled(rename = "#")]
    row: String,
    #[tabled(rename = "Voucher")]
    voucher_number: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Ledger")]
    ledger: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Dr/Cr")]
    dr_cr: String,
}

/// Row for the reconciliation table
#[derive(Debug, Clone, Tabled)]
struct RemainderRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Voucher")]
    voucher_number: String,
    #[tabled(rename = "Lines")]
    lines: usize,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Categories")]
    category_total: String,
    #[tabled(rename = "Rounded off")]
    rounding: String,
}

#[derive(Debug, Serialize)]
struct PreviewOutput<'a> {
    voucher_type: VoucherType,
    rows: &'a [RowSummary],
    lines: &'a [LedgerLine],
}

impl PreviewCommand {
    pub fn exec(&self, registry: &SchemaRegistry) -> anyhow::Result<()> {
        let options = PipelineOptions {
            convert_dates: self.convert_dates,
            capacity: Capacity::Exact,
        };
        let vouchers = load_vouchers(registry, self.voucher_type, &self.input, options)?;
        let (rows, lines) = self.visible(&vouchers);

        if self.json {
            let output = PreviewOutput {
                voucher_type: self.voucher_type,
                rows,
                lines,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_lines(rows, lines);
            println!();
            print_remainders(rows);
        }
        Ok(())
    }

    /// Leading row summaries and their ledger lines, honouring `--rows`.
    fn visible<'a>(&self, vouchers: &'a VoucherTable) -> (&'a [RowSummary], &'a [LedgerLine]) {
        let count = self.rows.unwrap_or(vouchers.rows.len()).min(vouchers.rows.len());
        let rows = &vouchers.rows[..count];
        let line_count: usize = rows.iter().map(|r| r.lines).sum();
        (rows, &vouchers.lines[..line_count])
    }
}

fn print_lines(rows: &[RowSummary], lines: &[LedgerLine]) {
    if lines.is_empty() {
        println!("No ledger lines");
        return;
    }

    let mut table_rows = Vec::with_capacity(lines.len());
    let mut lines = lines.iter();
    for summary in rows {
        for (i, line) in lines.by_ref().take(summary.lines).enumerate() {
            table_rows.push(LineRow {
                row: if i == 0 { summary.row.to_string() } else { String::new() },
                voucher_number: line
                    .voucher_number
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                date: line
                    .voucher_date
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                ledger: line.ledger_name.clone(),
                amount: line.amount.to_string(),
                dr_cr: line.dr_cr.to_string(),
            });
        }
    }

    let table = Table::new(table_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..5)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn print_remainders(rows: &[RowSummary]) {
    let table_rows: Vec<RemainderRow> = rows
        .iter()
        .map(|r| RemainderRow {
            row: r.row,
            voucher_number: r.voucher_number.clone(),
            lines: r.lines,
            principal: format!("{:.2}", r.principal),
            category_total: format!("{:.2}", r.category_total),
            rounding: r.rounding.map(|d| format!("{:.2}", d)).unwrap_or_default(),
        })
        .collect();

    let table = Table::new(table_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}
