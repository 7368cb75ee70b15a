use super::schema::VoucherSchema;
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("input is missing required columns: {}", format_missing(.missing))]
    Missing { missing: BTreeSet<String> },
}

fn format_missing(missing: &BTreeSet<String>) -> String {
    missing
        .iter()
        .map(|m| format!("'{}'", m))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Expected headers absent from `headers`, sorted by name.
pub fn missing_columns<'a, I>(headers: I, schema: &VoucherSchema) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: BTreeSet<&str> = headers.into_iter().map(str::trim).collect();
    schema
        .expected_headers()
        .into_iter()
        .filter(|expected| !present.contains(expected.as_str()))
        .collect()
}

/// Check the header set, failing closed with the exact missing names.
pub fn check<'a, I>(headers: I, schema: &VoucherSchema) -> Result<(), HeaderError>
where
    I: IntoIterator<Item = &'a str>,
{
    let missing = missing_columns(headers, schema);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(HeaderError::Missing { missing })
    }
}

/// Boolean form of [`check`]; logs the missing columns on failure.
pub fn validate<'a, I>(headers: I, schema: &VoucherSchema) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    match check(headers, schema) {
        Ok(()) => {
            log::info!("All expected {} columns are present", schema.voucher_type);
            true
        }
        Err(err) => {
            log::error!("{}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{SchemaRegistry, VoucherType};

    fn purchase_headers() -> Vec<String> {
        let registry = SchemaRegistry::builtin().unwrap();
        registry
            .require(VoucherType::Purchase)
            .unwrap()
            .expected_headers()
            .into_iter()
            .collect()
    }

    #[test]
    fn complete_header_set_passes() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.require(VoucherType::Purchase).unwrap();
        let mut headers = purchase_headers();
        // extra columns are fine
        headers.push("Narration".into());

        assert!(validate(headers.iter().map(String::as_str), schema));
    }

    #[test]
    fn reports_exact_missing_column() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.require(VoucherType::Purchase).unwrap();
        let headers: Vec<String> = purchase_headers()
            .into_iter()
            .filter(|h| h != "Purchase@5%")
            .collect();

        let err = check(headers.iter().map(String::as_str), schema).unwrap_err();

        let expected: BTreeSet<String> = ["Purchase@5%".to_string()].into_iter().collect();
        assert_eq!(err, HeaderError::Missing { missing: expected });
        assert_eq!(
            err.to_string(),
            "input is missing required columns: 'Purchase@5%'"
        );
        assert!(!validate(headers.iter().map(String::as_str), schema));
    }

    #[test]
    fn voucher_and_misc_columns_are_required() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.require(VoucherType::Purchase).unwrap();
        let headers: Vec<String> = purchase_headers()
            .into_iter()
            .filter(|h| !matches!(h.as_str(), "RNDOFF" | "Ledger Amount Dr/Cr" | "Rounded off"))
            .collect();

        let missing = missing_columns(headers.iter().map(String::as_str), schema);

        let expected: BTreeSet<String> = ["Ledger Amount Dr/Cr", "RNDOFF", "Rounded off"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(missing, expected);
    }

    #[test]
    fn sales_sheet_fails_purchase_validation() {
        let registry = SchemaRegistry::builtin().unwrap();
        let sales = registry.require(VoucherType::Sales).unwrap().expected_headers();
        let purchase = registry.require(VoucherType::Purchase).unwrap();

        let missing = missing_columns(sales.iter().map(String::as_str), purchase);

        assert_eq!(missing.len(), 4);
        assert!(missing.iter().all(|m| m.starts_with("Purchase@")));
    }
}
