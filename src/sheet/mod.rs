//! Reading and writing whole sheets. Format is chosen by file extension.

mod delimited;
mod workbook;

use crate::core::{CellValue, LedgerLine, RegisterEntry, SheetColumn, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("unsupported file type '{0}', expected .csv or .xlsx")]
    UnsupportedFormat(String),
    #[error("{0} contains no worksheets")]
    NoWorksheet(PathBuf),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::Error),
    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(SheetFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Workbook),
            _ => Err(SheetError::UnsupportedFormat(ext)),
        }
    }
}

/// A record that can be written as one sheet row.
pub trait SheetRecord: Serialize {
    fn columns() -> &'static [SheetColumn];

    /// Cells in column order.
    fn cells(&self) -> Vec<CellValue>;
}

impl SheetRecord for LedgerLine {
    fn columns() -> &'static [SheetColumn] {
        LedgerLine::columns()
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.voucher_date.clone().unwrap_or_default(),
            self.voucher_type_name.clone().unwrap_or_default(),
            self.voucher_number.clone().unwrap_or_default(),
            CellValue::text(self.ledger_name.as_str()),
            CellValue::Number(self.amount),
            CellValue::text(self.dr_cr.as_str()),
            self.quantity.clone().unwrap_or_default(),
            self.rounded_off.clone().unwrap_or_default(),
        ]
    }
}

impl SheetRecord for RegisterEntry {
    fn columns() -> &'static [SheetColumn] {
        RegisterEntry::columns()
    }

    fn cells(&self) -> Vec<CellValue> {
        let mut cells = vec![
            self.serial.clone(),
            self.invoice_number.clone(),
            self.invoice_date.clone(),
            self.party_name.clone(),
            self.party_gstin.clone(),
        ];
        cells.extend(
            [
                self.state,
                self.purchase_14,
                self.sgst_14,
                self.purchase_9,
                self.sgst_9,
                self.purchase_6,
                self.sgst_6,
                self.purchase_2_5,
                self.sgst_2_5,
                self.tax_free,
                self.cgst_14,
                self.cgst_9,
                self.cgst_6,
                self.cgst_2_5,
                self.credit_debit_amount,
                self.other_adjustment,
                self.lbt,
                self.cess,
                self.round_off,
                self.total_bill_amount,
            ]
            .map(CellValue::Number),
        );
        cells
    }
}

/// Every cell of the first worksheet (or the CSV file), row by row.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<CellValue>>, SheetError> {
    let grid = match SheetFormat::from_path(path)? {
        SheetFormat::Csv => delimited::read_grid(path)?,
        SheetFormat::Workbook => workbook::read_grid(path)?,
    };
    log::info!("Read {} rows from {}", grid.len(), path.display());
    Ok(grid)
}

/// Read a sheet whose first row is the header.
pub fn read_table(path: &Path) -> Result<Table, SheetError> {
    Ok(Table::from_grid(read_grid(path)?))
}

/// Write `records` under their column header, replacing any existing file.
///
/// Only `.xlsx` is written for workbooks.
pub fn write_records<R: SheetRecord>(path: &Path, records: &[R]) -> Result<(), SheetError> {
    match SheetFormat::from_path(path)? {
        SheetFormat::Csv => delimited::write_records(path, records)?,
        SheetFormat::Workbook => {
            let is_xlsx = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
            if !is_xlsx {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
                return Err(SheetError::UnsupportedFormat(ext.to_string()));
            }
            workbook::write_records(path, records)?
        }
    }
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
