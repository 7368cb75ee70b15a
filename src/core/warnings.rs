use serde::Serialize;
use std::fmt;

/// Row-level anomalies recovered locally during normalization and expansion.
///
/// `row` is the 1-based row number in the source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// A monetary cell could not be parsed; it counts as zero.
    MalformedNumber {
        row: usize,
        column: String,
        value: String,
    },
    /// Voucher Date did not match `dd-mm-yyyy`; passed through unconverted.
    MalformedDate { row: usize, value: String },
    /// The row total was blank or unparseable; expanded as zero.
    MissingPrincipal { row: usize },
    /// Amounts in the row exceed the decimal range; the overflowing
    /// amounts were treated as zero.
    AmountOverflow { row: usize },
    /// A register continuation line appeared before any invoice line.
    OrphanContinuation { row: usize },
    /// A register tax line whose rates cannot be applied (zero divisor or
    /// overflow); the line was dropped.
    UnusableTaxLine { row: usize },
    /// A register value could not be parsed; it counts as zero.
    MalformedRegisterValue {
        row: usize,
        column: usize,
        value: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedNumber { row, column, value } => write!(
                f,
                "row {}: '{}' in column '{}' is not a number, treated as 0",
                row, value, column
            ),
            Warning::MalformedDate { row, value } => write!(
                f,
                "row {}: date '{}' is not dd-mm-yyyy, left unconverted",
                row, value
            ),
            Warning::MissingPrincipal { row } => {
                write!(f, "row {}: no ledger amount, principal treated as 0", row)
            }
            Warning::AmountOverflow { row } => {
                write!(f, "row {}: amounts out of range, treated as 0", row)
            }
            Warning::UnusableTaxLine { row } => {
                write!(f, "row {}: tax rates cannot be applied, line dropped", row)
            }
            Warning::OrphanContinuation { row } => {
                write!(f, "row {}: continuation line without an invoice, skipped", row)
            }
            Warning::MalformedRegisterValue { row, column, value } => write!(
                f,
                "row {}: '{}' in column {} is not a number, treated as 0",
                row, value, column
            ),
        }
    }
}

/// Log each warning at warn level.
pub fn report(warnings: &[Warning]) {
    for warning in warnings {
        log::warn!("{}", warning);
    }
}
