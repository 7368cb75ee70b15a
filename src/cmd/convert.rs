//! Convert command - expand a ledger sheet into the voucher import sheet

use super::{load_vouchers, PipelineOptions};
use crate::core::{Capacity, SchemaRegistry, VoucherType};
use crate::sheet;
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "output.xlsx";

#[derive(Args, Debug)]
pub struct ConvertCommand {
    /// Voucher type of the input sheet: purchase or sales
    voucher_type: VoucherType,

    /// Ledger sheet to convert (.xlsx or .csv)
    input: PathBuf,

    /// Where to write the voucher sheet (.xlsx or .csv); overwritten if present
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Rewrite Voucher Date from dd-mm-yyyy to mm-dd-yyyy
    #[arg(long)]
    convert_dates: bool,
}

impl ConvertCommand {
    pub fn exec(&self, registry: &SchemaRegistry) -> anyhow::Result<()> {
        let options = PipelineOptions {
            convert_dates: self.convert_dates,
            capacity: Capacity::Estimate,
        };
        let vouchers = load_vouchers(registry, self.voucher_type, &self.input, options)?;
        sheet::write_records(&self.output, &vouchers.lines)?;
        println!(
            "Wrote {} ledger lines for {} vouchers to {}",
            vouchers.lines.len(),
            vouchers.rows.len(),
            self.output.display()
        );
        Ok(())
    }
}
