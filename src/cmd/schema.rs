//! Schema command - print the expected input columns, output layout and
//! category expansions

use crate::core::{LedgerLine, SchemaRegistry, VoucherType};
use clap::{Args, ValueEnum};

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Voucher type: purchase or sales
    voucher_type: VoucherType,

    /// What to print
    #[arg(short, long, value_enum, default_value = "input")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    /// Input header row, comma separated
    Input,
    /// Output columns with descriptions
    Output,
    /// Rate categories and the sub-ledgers they expand into
    Categories,
}

impl SchemaCommand {
    pub fn exec(&self, registry: &SchemaRegistry) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::Input => self.print_input(registry),
            SchemaFormat::Output => self.print_output(),
            SchemaFormat::Categories => self.print_categories(registry),
        }
    }

    fn print_input(&self, registry: &SchemaRegistry) -> anyhow::Result<()> {
        let schema = registry.require(self.voucher_type)?;
        let headers: Vec<String> = schema.expected_headers().into_iter().collect();
        println!("{}", headers.join(","));
        Ok(())
    }

    fn print_output(&self) -> anyhow::Result<()> {
        println!("Voucher Output Format");
        println!("=====================");
        println!();
        for column in LedgerLine::columns() {
            let filled = if column.every_line { "every line" } else { "first line" };
            println!("{:20} ({:10})  {}", column.name, filled, column.description);
        }
        println!();
        println!(
            "{}: principal line {}, category and rounding lines {}",
            self.voucher_type,
            self.voucher_type.principal_side(),
            self.voucher_type.counter_side()
        );
        Ok(())
    }

    fn print_categories(&self, registry: &SchemaRegistry) -> anyhow::Result<()> {
        let schema = registry.require(self.voucher_type)?;
        for category in &schema.categories {
            println!("{:14} -> {}", category.name, category.ledgers.join(", "));
        }
        Ok(())
    }
}
