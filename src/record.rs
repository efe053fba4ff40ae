//! Typed row models for the two supported exports.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::data::{format_date, format_decimal, format_optional};

/// Canonical cafe headers, in input order. The raw header row is discarded and
/// these names are used instead.
pub const CAFE_COLUMNS: [&str; 8] = [
    "Txn_ID",
    "Item",
    "Quantity",
    "Unit_Price",
    "Total",
    "Payment",
    "Location",
    "Date",
];

/// Name of the positional index column prepended to cleaned cafe output.
pub const INDEX_COLUMN: &str = "index";

/// One cafe sale. Every field except the identifier may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CafeRecord {
    pub txn_id: String,
    pub item: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Decimal>,
    pub total: Option<Decimal>,
    pub payment: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

impl CafeRecord {
    pub fn to_row(&self, index: usize) -> Vec<String> {
        vec![
            index.to_string(),
            self.txn_id.clone(),
            self.item.clone().unwrap_or_default(),
            format_optional(self.quantity.as_ref(), i64::to_string),
            format_optional(self.unit_price.as_ref(), format_decimal),
            format_optional(self.total.as_ref(), format_decimal),
            self.payment.clone().unwrap_or_default(),
            self.location.clone().unwrap_or_default(),
            format_optional(self.date.as_ref(), format_date),
        ]
    }

    pub fn missing(&self, field: CafeField) -> bool {
        match field {
            CafeField::Item => self.item.is_none(),
            CafeField::Quantity => self.quantity.is_none(),
            CafeField::UnitPrice => self.unit_price.is_none(),
            CafeField::Total => self.total.is_none(),
            CafeField::Payment => self.payment.is_none(),
            CafeField::Location => self.location.is_none(),
            CafeField::Date => self.date.is_none(),
        }
    }
}

/// The nullable cafe fields, used for missingness patterns and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CafeField {
    Item,
    Quantity,
    UnitPrice,
    Total,
    Payment,
    Location,
    Date,
}

impl CafeField {
    pub const ALL: [CafeField; 7] = [
        CafeField::Item,
        CafeField::Quantity,
        CafeField::UnitPrice,
        CafeField::Total,
        CafeField::Payment,
        CafeField::Location,
        CafeField::Date,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            CafeField::Item => "Item",
            CafeField::Quantity => "Quantity",
            CafeField::UnitPrice => "Unit_Price",
            CafeField::Total => "Total",
            CafeField::Payment => "Payment",
            CafeField::Location => "Location",
            CafeField::Date => "Date",
        }
    }
}

pub fn cafe_output_headers() -> Vec<String> {
    std::iter::once(INDEX_COLUMN)
        .chain(CAFE_COLUMNS)
        .map(str::to_string)
        .collect()
}

/// Source headers the warehouse loader looks up by name.
pub mod warehouse_columns {
    pub const ID: &str = "Product ID";
    pub const NAME: &str = "Product Name";
    pub const QUANTITY: &str = "Quantity";
    pub const PRICE: &str = "Price";
    pub const CATEGORY: &str = "Category";
    pub const RESTOCKED: &str = "Last Restocked";
}

/// One output column of a cleaned warehouse file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseColumn {
    Id,
    Quantity,
    Price,
    Category,
    Restocked,
    /// An input column carried through untouched, by position in
    /// [`WarehouseRecord::extra`].
    Extra { header: String, slot: usize },
}

impl WarehouseColumn {
    pub fn output_name(&self) -> &str {
        match self {
            WarehouseColumn::Id => "ID",
            WarehouseColumn::Quantity => "Quantity",
            WarehouseColumn::Price => "Price",
            WarehouseColumn::Category => "Category",
            WarehouseColumn::Restocked => "Restocked",
            WarehouseColumn::Extra { header, .. } => header,
        }
    }
}

/// One inventory line. The product name column is not carried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WarehouseRecord {
    pub id: String,
    pub quantity: Option<i64>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub restocked: Option<NaiveDate>,
    /// Cells of columns the cleaner does not interpret, in input order.
    pub extra: Vec<String>,
}

impl WarehouseRecord {
    pub fn to_row(&self, columns: &[WarehouseColumn]) -> Vec<String> {
        columns
            .iter()
            .map(|column| match column {
                WarehouseColumn::Id => self.id.clone(),
                WarehouseColumn::Quantity => format_optional(self.quantity.as_ref(), i64::to_string),
                WarehouseColumn::Price => format_optional(self.price.as_ref(), format_decimal),
                WarehouseColumn::Category => self.category.clone().unwrap_or_default(),
                WarehouseColumn::Restocked => format_optional(self.restocked.as_ref(), format_date),
                WarehouseColumn::Extra { slot, .. } => self.extra.get(*slot).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cafe_row_renders_missing_as_empty_cells() {
        let record = CafeRecord {
            txn_id: "TXN_1".to_string(),
            item: Some("Tea".to_string()),
            quantity: Some(2),
            unit_price: Some(Decimal::new(15, 1)),
            total: None,
            payment: None,
            location: Some("Takeaway".to_string()),
            date: NaiveDate::from_ymd_opt(2023, 3, 1),
        };
        assert_eq!(
            record.to_row(7),
            vec!["7", "TXN_1", "Tea", "2", "1.5", "", "", "Takeaway", "2023-03-01"]
        );
    }

    #[test]
    fn output_headers_lead_with_index() {
        let headers = cafe_output_headers();
        assert_eq!(headers.len(), 9);
        assert_eq!(headers[0], INDEX_COLUMN);
        assert_eq!(headers[8], "Date");
    }

    #[test]
    fn warehouse_row_follows_column_order() {
        let record = WarehouseRecord {
            id: "P1".to_string(),
            quantity: Some(3),
            price: None,
            category: Some("Tools".to_string()),
            restocked: None,
            extra: vec!["W1".to_string()],
        };
        let columns = vec![
            WarehouseColumn::Id,
            WarehouseColumn::Extra {
                header: "Warehouse".to_string(),
                slot: 0,
            },
            WarehouseColumn::Quantity,
            WarehouseColumn::Price,
            WarehouseColumn::Extra {
                header: "Supplier".to_string(),
                slot: 1,
            },
        ];
        assert_eq!(record.to_row(&columns), vec!["P1", "W1", "3", "", ""]);
        assert_eq!(columns[1].output_name(), "Warehouse");
        assert_eq!(columns[0].output_name(), "ID");
    }
}
