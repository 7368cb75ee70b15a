//! Chart-of-accounts contract: column names, rate categories and the
//! sub-ledgers each category expands into.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

pub const VOUCHER_DATE: &str = "Voucher Date";
pub const VOUCHER_TYPE_NAME: &str = "Voucher Type Name";
pub const VOUCHER_NUMBER: &str = "Voucher Number";
pub const LEDGER_NAME: &str = "Ledger Name";
pub const LEDGER_AMOUNT: &str = "Ledger Amount";
pub const LEDGER_AMOUNT_DR_CR: &str = "Ledger Amount Dr/Cr";
pub const QUANTITY: &str = "Quantity";
pub const ROUNDED_OFF: &str = "Rounded off";

/// The voucher sheet layout. Input sheets carry the same columns.
pub const VOUCHER_COLUMNS: &[&str] = &[
    VOUCHER_DATE,
    VOUCHER_TYPE_NAME,
    VOUCHER_NUMBER,
    LEDGER_NAME,
    LEDGER_AMOUNT,
    LEDGER_AMOUNT_DR_CR,
    QUANTITY,
    ROUNDED_OFF,
];

/// Miscellaneous monetary columns; rounded, never expanded.
pub const MISC_COLUMNS: &[&str] = &["TAXFREE", "CessRs", "RNDOFF"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown voucher type '{0}', expected 'purchase' or 'sales'")]
    UnknownVoucherType(String),
    #[error("rate category '{0}' has no sub-ledger expansion")]
    MissingExpansion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VoucherType {
    Purchase,
    Sales,
}

impl VoucherType {
    pub const ALL: [VoucherType; 2] = [VoucherType::Purchase, VoucherType::Sales];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherType::Purchase => "purchase",
            VoucherType::Sales => "sales",
        }
    }

    /// Side of the principal (party) line.
    pub fn principal_side(&self) -> DrCr {
        match self {
            VoucherType::Sales => DrCr::Dr,
            VoucherType::Purchase => DrCr::Cr,
        }
    }

    /// Side of the category and rounding lines, always opposite the principal.
    pub fn counter_side(&self) -> DrCr {
        self.principal_side().opposite()
    }

    fn category_prefix(&self) -> &'static str {
        match self {
            VoucherType::Purchase => "Purchase",
            VoucherType::Sales => "Sales",
        }
    }
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "purchase" => Ok(VoucherType::Purchase),
            "sales" => Ok(VoucherType::Sales),
            _ => Err(SchemaError::UnknownVoucherType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrCr {
    #[serde(rename = "DR")]
    Dr,
    #[serde(rename = "CR")]
    Cr,
}

impl DrCr {
    pub fn opposite(self) -> Self {
        match self {
            DrCr::Dr => DrCr::Cr,
            DrCr::Cr => DrCr::Dr,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrCr::Dr => "DR",
            DrCr::Cr => "CR",
        }
    }
}

impl fmt::Display for DrCr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GST rate brackets in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateBracket {
    Rate28,
    Rate18,
    Rate12,
    Rate5,
}

impl RateBracket {
    pub const ALL: [RateBracket; 4] = [
        RateBracket::Rate28,
        RateBracket::Rate18,
        RateBracket::Rate12,
        RateBracket::Rate5,
    ];

    pub fn percent(&self) -> &'static str {
        match self {
            RateBracket::Rate28 => "28%",
            RateBracket::Rate18 => "18%",
            RateBracket::Rate12 => "12%",
            RateBracket::Rate5 => "5%",
        }
    }

    pub fn cgst_ledger(&self) -> &'static str {
        match self {
            RateBracket::Rate28 => "14%CGST",
            RateBracket::Rate18 => "9%CGST",
            RateBracket::Rate12 => "6%CGST",
            RateBracket::Rate5 => "2.5%CGST",
        }
    }

    pub fn sgst_ledger(&self) -> &'static str {
        match self {
            RateBracket::Rate28 => "14%SGST",
            RateBracket::Rate18 => "9%SGST",
            RateBracket::Rate12 => "6%SGST",
            RateBracket::Rate5 => "2.5%SGST",
        }
    }

    /// Category column name, e.g. `Purchase@18%`.
    pub fn category_name(&self, voucher_type: VoucherType) -> String {
        format!("{}@{}", voucher_type.category_prefix(), self.percent())
    }
}

/// One rate category and the ordered sub-ledgers it expands into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub ledgers: Vec<String>,
}

/// Everything the pipeline needs to know about one voucher type.
#[derive(Debug, Clone)]
pub struct VoucherSchema {
    pub voucher_type: VoucherType,
    pub categories: Vec<Category>,
}

impl VoucherSchema {
    /// Headers an input sheet for this voucher type must carry: the voucher
    /// columns, the miscellaneous columns, and this type's categories with
    /// their CGST/SGST ledgers.
    ///
    /// Categories of the other voucher type are not expected.
    pub fn expected_headers(&self) -> BTreeSet<String> {
        let mut expected: BTreeSet<String> = VOUCHER_COLUMNS
            .iter()
            .chain(MISC_COLUMNS)
            .map(|c| c.to_string())
            .collect();
        for category in &self.categories {
            expected.extend(category.ledgers.iter().cloned());
        }
        expected
    }

    /// Columns holding money: the row total plus every category ledger,
    /// and the miscellaneous adjustment columns.
    pub fn monetary_columns(&self) -> Vec<String> {
        let mut columns = vec![LEDGER_AMOUNT.to_string()];
        for category in &self.categories {
            for ledger in &category.ledgers {
                if !columns.contains(ledger) {
                    columns.push(ledger.clone());
                }
            }
        }
        columns.extend(MISC_COLUMNS.iter().map(|c| c.to_string()));
        columns
    }
}

/// Immutable lookup of voucher type to schema, built once at startup.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<VoucherType, VoucherSchema>,
}

impl SchemaRegistry {
    /// The compiled-in chart of accounts.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut category_names = HashMap::new();
        let mut expansions = HashMap::new();
        for voucher_type in VoucherType::ALL {
            let names: Vec<String> = RateBracket::ALL
                .iter()
                .map(|b| b.category_name(voucher_type))
                .collect();
            for (bracket, name) in RateBracket::ALL.iter().zip(&names) {
                expansions.insert(
                    name.clone(),
                    vec![
                        name.clone(),
                        bracket.cgst_ledger().to_string(),
                        bracket.sgst_ledger().to_string(),
                    ],
                );
            }
            category_names.insert(voucher_type, names);
        }
        Self::from_parts(category_names, expansions)
    }

    /// Assemble a registry, failing if any referenced category lacks an
    /// expansion entry.
    pub fn from_parts(
        category_names: HashMap<VoucherType, Vec<String>>,
        mut expansions: HashMap<String, Vec<String>>,
    ) -> Result<Self, SchemaError> {
        let mut schemas = HashMap::new();
        for (voucher_type, names) in category_names {
            let categories = names
                .into_iter()
                .map(|name| match expansions.remove(&name) {
                    Some(ledgers) => Ok(Category { name, ledgers }),
                    None => Err(SchemaError::MissingExpansion(name)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            schemas.insert(
                voucher_type,
                VoucherSchema {
                    voucher_type,
                    categories,
                },
            );
        }
        Ok(SchemaRegistry { schemas })
    }

    pub fn schema(&self, voucher_type: VoucherType) -> Option<&VoucherSchema> {
        self.schemas.get(&voucher_type)
    }

    /// Like [`SchemaRegistry::schema`], for callers that hold a registry
    /// built by [`SchemaRegistry::builtin`], which covers every voucher type.
    pub fn require(&self, voucher_type: VoucherType) -> Result<&VoucherSchema, SchemaError> {
        self.schema(voucher_type)
            .ok_or_else(|| SchemaError::UnknownVoucherType(voucher_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_voucher_type() {
        assert_eq!("purchase".parse::<VoucherType>(), Ok(VoucherType::Purchase));
        assert_eq!("Sales".parse::<VoucherType>(), Ok(VoucherType::Sales));
        assert_eq!(
            "journal".parse::<VoucherType>(),
            Err(SchemaError::UnknownVoucherType("journal".into()))
        );
    }

    #[test]
    fn sides_are_opposite_per_voucher_type() {
        assert_eq!(VoucherType::Sales.principal_side(), DrCr::Dr);
        assert_eq!(VoucherType::Sales.counter_side(), DrCr::Cr);
        assert_eq!(VoucherType::Purchase.principal_side(), DrCr::Cr);
        assert_eq!(VoucherType::Purchase.counter_side(), DrCr::Dr);
    }

    #[test]
    fn builtin_categories_in_canonical_order() {
        let registry = SchemaRegistry::builtin().unwrap();
        let purchase = registry.require(VoucherType::Purchase).unwrap();
        let names: Vec<_> = purchase.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Purchase@28%", "Purchase@18%", "Purchase@12%", "Purchase@5%"]
        );

        let sales = registry.require(VoucherType::Sales).unwrap();
        assert_eq!(
            sales.categories[1].ledgers,
            vec!["Sales@18%", "9%CGST", "9%SGST"]
        );
        assert_eq!(
            sales.categories[3].ledgers,
            vec!["Sales@5%", "2.5%CGST", "2.5%SGST"]
        );
    }

    #[test]
    fn missing_expansion_is_a_configuration_error() {
        let mut names = HashMap::new();
        names.insert(
            VoucherType::Sales,
            vec!["Sales@18%".to_string(), "Sales@40%".to_string()],
        );
        let mut expansions = HashMap::new();
        expansions.insert(
            "Sales@18%".to_string(),
            vec!["Sales@18%".to_string(), "9%CGST".to_string(), "9%SGST".to_string()],
        );

        let err = SchemaRegistry::from_parts(names, expansions).unwrap_err();
        assert_eq!(err, SchemaError::MissingExpansion("Sales@40%".into()));
    }

    #[test]
    fn expected_headers_exclude_other_voucher_type() {
        let registry = SchemaRegistry::builtin().unwrap();
        let expected = registry.require(VoucherType::Purchase).unwrap().expected_headers();

        assert!(expected.contains("Purchase@5%"));
        assert!(expected.contains("2.5%SGST"));
        assert!(expected.contains(LEDGER_AMOUNT));
        assert!(expected.contains(LEDGER_AMOUNT_DR_CR));
        assert!(expected.contains(ROUNDED_OFF));
        assert!(expected.contains("RNDOFF"));
        assert!(!expected.contains("Sales@5%"));
        assert!(!expected.contains("Sales@18%"));
        // eight voucher columns, three misc, own four categories, eight CGST/SGST ledgers
        assert_eq!(expected.len(), 8 + 3 + 4 + 8);
    }

    #[test]
    fn monetary_columns_are_unique() {
        let registry = SchemaRegistry::builtin().unwrap();
        let columns = registry.require(VoucherType::Sales).unwrap().monetary_columns();
        let unique: BTreeSet<_> = columns.iter().collect();
        assert_eq!(unique.len(), columns.len());
        assert_eq!(columns[0], LEDGER_AMOUNT);
        assert!(columns.iter().any(|c| c == "CessRs"));
    }
}
