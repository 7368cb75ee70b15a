//! Validate command - check an input sheet's headers without converting it

use crate::core::{headers, SchemaRegistry, VoucherType};
use crate::sheet;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Voucher type the sheet should match: purchase or sales
    voucher_type: VoucherType,

    /// Ledger sheet to check (.xlsx or .csv)
    input: PathBuf,
}

impl ValidateCommand {
    pub fn exec(&self, registry: &SchemaRegistry) -> anyhow::Result<()> {
        let schema = registry.require(self.voucher_type)?;
        let table = sheet::read_table(&self.input)?;
        let present = || table.headers.iter().map(String::as_str);

        println!();
        println!("HEADER CHECK ({}, {})", self.voucher_type, self.input.display());
        println!();

        if headers::validate(present(), schema) {
            println!("\u{2713} All expected columns are present.");
            return Ok(());
        }

        let missing = headers::missing_columns(present(), schema);
        println!("\u{26A0} {} column(s) missing:", missing.len());
        for column in &missing {
            println!("  - {}", column);
        }
        println!();
        std::process::exit(1);
    }
}
