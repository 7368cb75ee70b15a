pub mod cell;
pub mod dates;
pub mod expand;
pub mod headers;
pub mod normalize;
pub mod register;
pub mod schema;
pub mod voucher;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use cell::{CellValue, SheetColumn, Table};
pub use dates::normalize_dates;
pub use expand::LedgerLine;
pub use normalize::normalize_amounts;
pub use register::{consolidate, RegisterEntry};
pub use schema::{SchemaRegistry, VoucherType};
pub use voucher::{build_vouchers, Capacity, VoucherTable};
