pub mod consolidate;
pub mod convert;
pub mod preview;
pub mod schema;
pub mod validate;

use crate::core::{
    build_vouchers, headers, normalize_amounts, normalize_dates, schema::VOUCHER_DATE, warnings,
    Capacity, SchemaRegistry, VoucherTable, VoucherType,
};
use crate::sheet;
use std::path::Path;

/// Options shared by the commands that run the voucher pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub convert_dates: bool,
    pub capacity: Capacity,
}

/// Read, validate, normalize and expand an input ledger sheet.
///
/// Header validation fails closed: no row is processed when a required
/// column is missing.
pub fn load_vouchers(
    registry: &SchemaRegistry,
    voucher_type: VoucherType,
    input: &Path,
    options: PipelineOptions,
) -> anyhow::Result<VoucherTable> {
    let schema = registry.require(voucher_type)?;
    let mut table = sheet::read_table(input)?;

    headers::check(table.headers.iter().map(String::as_str), schema)?;

    let mut row_warnings = normalize_amounts(&mut table, &schema.monetary_columns());
    if options.convert_dates {
        row_warnings.extend(normalize_dates(&mut table, VOUCHER_DATE));
    }

    let mut vouchers = build_vouchers(&table, schema, options.capacity);
    row_warnings.append(&mut vouchers.warnings);
    warnings::report(&row_warnings);
    vouchers.warnings = row_warnings;

    log::info!(
        "Expanded {} {} rows into {} ledger lines ({} with rounding)",
        vouchers.rows.len(),
        voucher_type,
        vouchers.lines.len(),
        vouchers.rounding_lines()
    );
    Ok(vouchers)
}
