mod cmd;
mod core;
mod sheet;

use clap::{Parser, Subcommand};
use cmd::{
    consolidate::ConsolidateCommand, convert::ConvertCommand, preview::PreviewCommand,
    schema::SchemaCommand, validate::ValidateCommand,
};
use crate::core::SchemaRegistry;

#[derive(Debug, Parser)]
#[command(name = "gstv", version, about = "Expand GST ledgers into accounting voucher sheets")]
struct Opts {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Expand a purchase or sales ledger into the voucher import sheet
    Convert(ConvertCommand),
    /// Check that a ledger sheet has every expected column
    Validate(ValidateCommand),
    /// Print the expanded ledger lines and per-row rounding
    Preview(PreviewCommand),
    /// Print expected input columns, output columns or category expansions
    Schema(SchemaCommand),
    /// Consolidate a raw GST purchase register into one row per invoice
    Consolidate(ConsolidateCommand),
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let opts = Opts::parse();
    let registry = SchemaRegistry::builtin()?;

    match opts.cmd {
        Command::Convert(convert) => convert.exec(&registry),
        Command::Validate(validate) => validate.exec(&registry),
        Command::Preview(preview) => preview.exec(&registry),
        Command::Schema(schema) => schema.exec(&registry),
        Command::Consolidate(consolidate) => consolidate.exec(),
    }
}

/// `RUST_LOG` when set, info level otherwise.
fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };
    builder.init();
}
