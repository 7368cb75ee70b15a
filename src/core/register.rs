//! Consolidation of a raw GST purchase register into one row per invoice.
//!
//! The register lists every tax line of an invoice on its own row. Only the
//! first row of an invoice carries the invoice number; the rows below it are
//! continuation lines. Each line is folded into a per-rate column block.

use super::cell::{CellValue, SheetColumn};
use super::normalize::{parse_decimal, MONEY_DP};
use super::warnings::Warning;
use chrono::NaiveDate;
use gst_voucher_derive::SheetColumns;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Rows above the data: a title row and the register's own header row.
pub const HEADER_ROWS: usize = 2;

const COL_SERIAL: usize = 0;
const COL_PARTY: usize = 1;
const COL_GSTIN: usize = 2;
const COL_DATE: usize = 3;
const COL_INVOICE: usize = 4;
const COL_TOTAL: usize = 5;
const COL_TAXABLE: usize = 6;
const COL_SGST_RATE: usize = 7;
const COL_SGST_AMOUNT: usize = 8;
const COL_CGST_RATE: usize = 9;
const COL_CGST_AMOUNT: usize = 10;

/// Half-rate slabs (the SGST/CGST share of 5%, 12%, 18% and 28%), in the
/// order a line's rates are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slab {
    Half5,
    Half12,
    Half18,
    Half28,
}

impl Slab {
    const MATCH_ORDER: [Slab; 4] = [Slab::Half5, Slab::Half12, Slab::Half18, Slab::Half28];

    pub fn rate(&self) -> Decimal {
        match self {
            Slab::Half5 => dec!(2.5),
            Slab::Half12 => dec!(6),
            Slab::Half18 => dec!(9),
            Slab::Half28 => dec!(14),
        }
    }

    /// First slab equal to either rate.
    pub fn for_rates(sgst_rate: Decimal, cgst_rate: Decimal) -> Option<Slab> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|slab| sgst_rate == slab.rate() || cgst_rate == slab.rate())
    }
}

/// One tax line of the register after lenient parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxLine {
    pub taxable: Decimal,
    pub sgst_rate: Decimal,
    pub sgst_amount: Decimal,
    pub cgst_rate: Decimal,
    pub cgst_amount: Decimal,
}

impl TaxLine {
    /// When a rate is given without its amount, the taxable column holds the
    /// tax-inclusive amount; split it back into base and tax.
    ///
    /// `None` when the rates cannot be applied (zero divisor or overflow).
    pub fn resolve_inclusive(self) -> Option<TaxLine> {
        let rate_without_amount = (self.sgst_rate > Decimal::ZERO && self.sgst_amount.is_zero())
            || (self.cgst_rate > Decimal::ZERO && self.cgst_amount.is_zero());
        if !rate_without_amount || self.taxable <= Decimal::ZERO {
            return Some(self);
        }
        let base = taxable_from_inclusive(self.taxable, self.sgst_rate, self.cgst_rate)?;
        Some(TaxLine {
            taxable: base,
            sgst_amount: percent_of(base, self.sgst_rate)?,
            cgst_amount: percent_of(base, self.cgst_rate)?,
            ..self
        })
    }
}

fn percent_of(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount.checked_mul(rate)?.checked_div(dec!(100))
}

/// Base amount of a tax-inclusive amount at the combined SGST+CGST rate.
pub fn taxable_from_inclusive(
    amount: Decimal,
    sgst_rate: Decimal,
    cgst_rate: Decimal,
) -> Option<Decimal> {
    if sgst_rate.is_zero() && cgst_rate.is_zero() {
        return Some(amount);
    }
    let combined = sgst_rate.checked_add(cgst_rate)?.checked_div(dec!(100))?;
    amount.checked_div(Decimal::ONE.checked_add(combined)?)
}

/// One consolidated invoice, in the register's output column layout.
#[derive(Debug, Clone, PartialEq, Serialize, SheetColumns)]
pub struct RegisterEntry {
    #[serde(rename = "SR. No.")]
    pub serial: CellValue,
    #[serde(rename = "INVOICE NO.")]
    pub invoice_number: CellValue,
    /// dd/mm/yyyy when recognisable, otherwise as read
    #[serde(rename = "INVOICE DATE")]
    pub invoice_date: CellValue,
    #[serde(rename = "PARTY NAME")]
    pub party_name: CellValue,
    /// Supplier GSTIN
    #[serde(rename = "PARTY GST NO.")]
    pub party_gstin: CellValue,
    #[serde(rename = "STATE")]
    pub state: Decimal,
    #[serde(rename = "PURCHASE 14%")]
    pub purchase_14: Decimal,
    #[serde(rename = "SGST/IGST 14%")]
    pub sgst_14: Decimal,
    #[serde(rename = "PURCHASE 9%")]
    pub purchase_9: Decimal,
    #[serde(rename = "SGST/IGST 9%")]
    pub sgst_9: Decimal,
    #[serde(rename = "PURCHASE 6%")]
    pub purchase_6: Decimal,
    #[serde(rename = "SGST/IGST 6%")]
    pub sgst_6: Decimal,
    #[serde(rename = "PURCHASE 2.5%")]
    pub purchase_2_5: Decimal,
    #[serde(rename = "SGST/IGST 2.5%")]
    pub sgst_2_5: Decimal,
    #[serde(rename = "TAXFREE")]
    pub tax_free: Decimal,
    #[serde(rename = "CGST 14%")]
    pub cgst_14: Decimal,
    #[serde(rename = "CGST 9%")]
    pub cgst_9: Decimal,
    #[serde(rename = "CGST 6%")]
    pub cgst_6: Decimal,
    #[serde(rename = "CGST 2.5%")]
    pub cgst_2_5: Decimal,
    #[serde(rename = "CRDRAMT")]
    pub credit_debit_amount: Decimal,
    #[serde(rename = "OTHERADJ")]
    pub other_adjustment: Decimal,
    #[serde(rename = "LBTRS")]
    pub lbt: Decimal,
    #[serde(rename = "CessRs")]
    pub cess: Decimal,
    #[serde(rename = "RNDOFF")]
    pub round_off: Decimal,
    /// Invoice total as printed on the register
    #[serde(rename = "TOTAL BILL AMOUNT")]
    pub total_bill_amount: Decimal,
}

impl RegisterEntry {
    fn new(cells: &[CellValue], total_bill_amount: Decimal) -> Self {
        let at = |i: usize| cells.get(i).cloned().unwrap_or_default();
        RegisterEntry {
            serial: at(COL_SERIAL),
            invoice_number: at(COL_INVOICE),
            invoice_date: invoice_date(&at(COL_DATE)),
            party_name: at(COL_PARTY),
            party_gstin: at(COL_GSTIN),
            state: Decimal::ZERO,
            purchase_14: Decimal::ZERO,
            sgst_14: Decimal::ZERO,
            purchase_9: Decimal::ZERO,
            sgst_9: Decimal::ZERO,
            purchase_6: Decimal::ZERO,
            sgst_6: Decimal::ZERO,
            purchase_2_5: Decimal::ZERO,
            sgst_2_5: Decimal::ZERO,
            tax_free: Decimal::ZERO,
            cgst_14: Decimal::ZERO,
            cgst_9: Decimal::ZERO,
            cgst_6: Decimal::ZERO,
            cgst_2_5: Decimal::ZERO,
            credit_debit_amount: Decimal::ZERO,
            other_adjustment: Decimal::ZERO,
            lbt: Decimal::ZERO,
            cess: Decimal::ZERO,
            round_off: Decimal::ZERO,
            total_bill_amount,
        }
    }

    /// Add a tax line to its slab's columns. Lines matching no slab are dropped.
    ///
    /// Returns `None`, leaving the entry unchanged, when the line's rates
    /// cannot be applied or a column would overflow.
    pub fn add(&mut self, line: TaxLine) -> Option<()> {
        let line = line.resolve_inclusive()?;
        let Some(slab) = Slab::for_rates(line.sgst_rate, line.cgst_rate) else {
            log::debug!(
                "no slab for SGST {}% / CGST {}%, line ignored",
                line.sgst_rate,
                line.cgst_rate
            );
            return Some(());
        };
        let (purchase, sgst, cgst) = match slab {
            Slab::Half5 => (&mut self.purchase_2_5, &mut self.sgst_2_5, &mut self.cgst_2_5),
            Slab::Half12 => (&mut self.purchase_6, &mut self.sgst_6, &mut self.cgst_6),
            Slab::Half18 => (&mut self.purchase_9, &mut self.sgst_9, &mut self.cgst_9),
            Slab::Half28 => (&mut self.purchase_14, &mut self.sgst_14, &mut self.cgst_14),
        };
        let sums = (
            purchase.checked_add(line.taxable)?,
            sgst.checked_add(line.sgst_amount)?,
            cgst.checked_add(line.cgst_amount)?,
        );
        (*purchase, *sgst, *cgst) = sums;
        Some(())
    }

    fn round_money(&mut self) {
        for amount in [
            &mut self.purchase_14,
            &mut self.sgst_14,
            &mut self.purchase_9,
            &mut self.sgst_9,
            &mut self.purchase_6,
            &mut self.sgst_6,
            &mut self.purchase_2_5,
            &mut self.sgst_2_5,
            &mut self.cgst_14,
            &mut self.cgst_9,
            &mut self.cgst_6,
            &mut self.cgst_2_5,
            &mut self.total_bill_amount,
        ] {
            *amount = amount.round_dp(MONEY_DP);
            amount.rescale(MONEY_DP);
        }
    }
}

fn invoice_date(cell: &CellValue) -> CellValue {
    let text = cell.to_string();
    let text = text.trim();
    ["%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(|date| CellValue::Text(date.format("%d/%m/%Y").to_string()))
        .unwrap_or_else(|| cell.clone())
}

/// Lenient numeric read: blank is zero, thousands separators are ignored,
/// anything else unparseable is zero and reported.
fn register_amount(cells: &[CellValue], column: usize, row: usize, warnings: &mut Vec<Warning>) -> Decimal {
    match cells.get(column) {
        None | Some(CellValue::Empty) => Decimal::ZERO,
        Some(CellValue::Number(d)) => *d,
        Some(cell) => {
            let text = cell.to_string();
            let cleaned = text.replace(',', "");
            if cleaned.trim().is_empty() {
                return Decimal::ZERO;
            }
            parse_decimal(&cleaned).unwrap_or_else(|| {
                warnings.push(Warning::MalformedRegisterValue {
                    row,
                    column,
                    value: text,
                });
                Decimal::ZERO
            })
        }
    }
}

/// Result of consolidating a register grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Register {
    pub entries: Vec<RegisterEntry>,
    pub warnings: Vec<Warning>,
}

/// Fold a headerless register grid into one entry per invoice, in order.
///
/// Data starts after [`HEADER_ROWS`]; reported row numbers are 1-based sheet
/// rows.
pub fn consolidate(grid: &[Vec<CellValue>]) -> Register {
    let mut register = Register::default();
    let mut current: Option<RegisterEntry> = None;

    for (index, cells) in grid.iter().enumerate().skip(HEADER_ROWS) {
        let row = index + 1;
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        let warnings = &mut register.warnings;

        let starts_invoice = cells.get(COL_INVOICE).is_some_and(|c| !c.is_empty());
        if starts_invoice {
            if let Some(done) = current.take() {
                register.entries.push(done);
            }
            let total = register_amount(cells, COL_TOTAL, row, warnings);
            current = Some(RegisterEntry::new(cells, total));
        }

        let line = TaxLine {
            taxable: register_amount(cells, COL_TAXABLE, row, warnings),
            sgst_rate: register_amount(cells, COL_SGST_RATE, row, warnings),
            sgst_amount: register_amount(cells, COL_SGST_AMOUNT, row, warnings),
            cgst_rate: register_amount(cells, COL_CGST_RATE, row, warnings),
            cgst_amount: register_amount(cells, COL_CGST_AMOUNT, row, warnings),
        };

        match current.as_mut() {
            Some(entry) => {
                if entry.add(line).is_none() {
                    warnings.push(Warning::UnusableTaxLine { row });
                }
            }
            None => warnings.push(Warning::OrphanContinuation { row }),
        }
    }

    if let Some(done) = current {
        register.entries.push(done);
    }
    for entry in &mut register.entries {
        entry.round_money();
    }
    register
}
