//! Expansion of one invoice row into balanced voucher ledger lines.

use super::cell::{CellValue, Row, SheetColumn};
use super::normalize::MONEY_DP;
use super::schema::{
    DrCr, VoucherSchema, LEDGER_AMOUNT, LEDGER_NAME, QUANTITY, ROUNDED_OFF, VOUCHER_DATE,
    VOUCHER_NUMBER, VOUCHER_TYPE_NAME,
};
use gst_voucher_derive::SheetColumns;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A remainder up to this size is absorbed without a rounding line.
pub const ROUNDING_THRESHOLD: Decimal = dec!(0.01);

/// One line of the output voucher sheet.
#[derive(Debug, Clone, PartialEq, Serialize, SheetColumns)]
pub struct LedgerLine {
    /// Copied from the invoice row, first line of each voucher only
    #[serde(rename = "Voucher Date")]
    pub voucher_date: Option<CellValue>,
    /// Copied from the invoice row, first line of each voucher only
    #[serde(rename = "Voucher Type Name")]
    pub voucher_type_name: Option<CellValue>,
    /// Copied from the invoice row, first line of each voucher only
    #[serde(rename = "Voucher Number")]
    pub voucher_number: Option<CellValue>,
    /// Party ledger, category sub-ledger or "Rounded off"
    #[serde(rename = "Ledger Name")]
    pub ledger_name: String,
    /// Signed amount, two decimal places
    #[serde(rename = "Ledger Amount")]
    pub amount: Decimal,
    /// DR or CR
    #[serde(rename = "Ledger Amount Dr/Cr")]
    pub dr_cr: DrCr,
    /// Copied from the invoice row, first line of each voucher only
    #[serde(rename = "Quantity")]
    pub quantity: Option<CellValue>,
    /// Always blank; rounding is posted as its own ledger line
    #[serde(rename = "Rounded off")]
    pub rounded_off: Option<CellValue>,
}

impl LedgerLine {
    fn posting(ledger_name: impl Into<String>, amount: Decimal, dr_cr: DrCr) -> Self {
        LedgerLine {
            voucher_date: None,
            voucher_type_name: None,
            voucher_number: None,
            ledger_name: ledger_name.into(),
            amount: money(amount),
            dr_cr,
            quantity: None,
            rounded_off: None,
        }
    }

    pub fn is_rounding(&self) -> bool {
        self.ledger_name == ROUNDED_OFF
    }
}

/// The output of expanding a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// Principal line, category blocks in canonical order, then rounding.
    pub lines: Vec<LedgerLine>,
    pub principal: Decimal,
    pub category_total: Decimal,
    pub rounding: Option<Decimal>,
    /// Sum of every emitted line amount, principal included.
    pub total: Decimal,
    /// True when the row had no usable Ledger Amount.
    pub principal_missing: bool,
    /// True when some amount was outside the decimal range and counted as zero.
    pub overflow: bool,
}

impl Expansion {
    /// `principal - categories - rounding`; zero whenever a rounding line
    /// was emitted, otherwise within [`ROUNDING_THRESHOLD`].
    pub fn imbalance(&self) -> Decimal {
        self.principal
            .saturating_sub(self.category_total)
            .saturating_sub(self.rounding.unwrap_or(Decimal::ZERO))
    }

    pub fn is_balanced(&self) -> bool {
        self.imbalance().abs() <= ROUNDING_THRESHOLD
    }
}

/// Expand one normalized invoice row.
///
/// Never fails: a missing sub-ledger amount contributes zero and a missing
/// principal is expanded as zero (flagged on the result). Amounts beyond the
/// decimal range are treated as zero and flagged as overflow.
pub fn expand(row: &Row, schema: &VoucherSchema) -> Expansion {
    let voucher_type = schema.voucher_type;
    let principal_amount = row.get(LEDGER_AMOUNT).and_then(CellValue::amount);
    let principal = principal_amount.unwrap_or(Decimal::ZERO);

    let mut first = LedgerLine::posting(
        row.cell(LEDGER_NAME).to_string(),
        principal,
        voucher_type.principal_side(),
    );
    first.voucher_date = Some(row.cell(VOUCHER_DATE));
    first.voucher_type_name = Some(row.cell(VOUCHER_TYPE_NAME));
    first.voucher_number = Some(row.cell(VOUCHER_NUMBER));
    first.quantity = Some(row.cell(QUANTITY));

    let postings = collect_postings(row, schema);
    let (rounding, remainder_overflow) = rounding_for(principal, postings.category_total);

    let mut lines = Vec::with_capacity(postings.amounts.len() + 2);
    lines.push(first);
    lines.extend(
        postings
            .amounts
            .iter()
            .map(|(ledger, amount)| LedgerLine::posting(*ledger, *amount, voucher_type.counter_side())),
    );
    if let Some(remainder) = rounding {
        lines.push(LedgerLine::posting(
            ROUNDED_OFF,
            remainder,
            voucher_type.counter_side(),
        ));
    }

    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.amount));

    Expansion {
        lines,
        principal,
        category_total: postings.category_total,
        rounding,
        total: total.unwrap_or(Decimal::ZERO),
        principal_missing: principal_amount.is_none(),
        overflow: postings.overflow || remainder_overflow || total.is_none(),
    }
}

/// Sub-ledger amounts of the contributing categories, in canonical order.
struct Postings<'s> {
    amounts: Vec<(&'s str, Decimal)>,
    category_total: Decimal,
    overflow: bool,
}

fn collect_postings<'s>(row: &Row, schema: &'s VoucherSchema) -> Postings<'s> {
    let mut postings = Postings {
        amounts: Vec::new(),
        category_total: Decimal::ZERO,
        overflow: false,
    };
    for category in &schema.categories {
        if !contributes(row.get(&category.name)) {
            continue;
        }
        for ledger in &category.ledgers {
            let amount = row
                .get(ledger)
                .and_then(CellValue::amount)
                .unwrap_or(Decimal::ZERO);
            let amount = match postings.category_total.checked_add(amount) {
                Some(total) => {
                    postings.category_total = total;
                    amount
                }
                None => {
                    postings.overflow = true;
                    Decimal::ZERO
                }
            };
            postings.amounts.push((ledger.as_str(), amount));
        }
    }
    postings
}

/// The rounding remainder when it exceeds [`ROUNDING_THRESHOLD`], and
/// whether computing it overflowed (no rounding line then).
fn rounding_for(principal: Decimal, category_total: Decimal) -> (Option<Decimal>, bool) {
    match principal.checked_sub(category_total) {
        Some(remainder) if remainder.abs() > ROUNDING_THRESHOLD => (Some(remainder), false),
        Some(_) => (None, false),
        None => (None, true),
    }
}

/// Whether a category value produces lines.
///
/// Only an exact zero (numeric zero at any scale or the string "0") skips
/// the category. Blank, absent and unparseable values still expand, with
/// their sub-ledgers posted as they stand.
fn contributes(value: Option<&CellValue>) -> bool {
    !value.is_some_and(CellValue::is_exact_zero)
}

/// Lines a row will expand to, computed without building them.
pub fn line_count(row: &Row, schema: &VoucherSchema) -> usize {
    let principal = row
        .get(LEDGER_AMOUNT)
        .and_then(CellValue::amount)
        .unwrap_or(Decimal::ZERO);
    let postings = collect_postings(row, schema);
    let (rounding, _) = rounding_for(principal, postings.category_total);
    1 + postings.amounts.len() + usize::from(rounding.is_some())
}

fn money(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp(MONEY_DP);
    amount.rescale(MONEY_DP);
    amount
}
