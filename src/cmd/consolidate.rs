//! Consolidate command - fold a raw GST purchase register into one row per invoice

use crate::core::{consolidate, warnings};
use crate::sheet;
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "processed_gst_data.xlsx";

#[derive(Args, Debug)]
pub struct ConsolidateCommand {
    /// Raw purchase register (.xlsx or .csv); data starts on the third row
    input: PathBuf,

    /// Where to write the consolidated register (.xlsx or .csv)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

impl ConsolidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let grid = sheet::read_grid(&self.input)?;
        let register = consolidate(&grid);
        warnings::report(&register.warnings);

        sheet::write_records(&self.output, &register.entries)?;
        println!(
            "Wrote {} invoices to {}",
            register.entries.len(),
            self.output.display()
        );
        Ok(())
    }
}
