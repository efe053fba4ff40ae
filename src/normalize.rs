//! Type normalization: raw string rows to typed records.
//!
//! Parsing never fails. Sentinel tokens and unreadable cells become `None`.

use log::debug;

use crate::{
    data::{parse_date, parse_decimal, parse_integer, parse_label},
    record::CafeRecord,
};

/// Converts fixed-order cafe rows into typed records.
///
/// Rows shorter than eight fields are padded with missing cells.
pub fn normalize_cafe(rows: Vec<Vec<String>>, sentinels: &[String]) -> Vec<CafeRecord> {
    let records = rows
        .into_iter()
        .map(|row| normalize_cafe_row(&row, sentinels))
        .collect::<Vec<_>>();
    debug!("Normalized {} cafe row(s)", records.len());
    records
}

fn normalize_cafe_row(row: &[String], sentinels: &[String]) -> CafeRecord {
    let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
    CafeRecord {
        txn_id: cell(0).to_string(),
        item: parse_label(cell(1), sentinels),
        quantity: parse_integer(cell(2)),
        unit_price: parse_decimal(cell(3)),
        total: parse_decimal(cell(4)),
        payment: parse_label(cell(5), sentinels),
        location: parse_label(cell(6), sentinels),
        date: parse_date(cell(7)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sentinels() -> Vec<String> {
        vec!["UNKNOWN".to_string(), "ERROR".to_string()]
    }

    #[test]
    fn sentinels_and_junk_become_missing() {
        let records = normalize_cafe(
            vec![row(&[
                "TXN_1", "ERROR", "UNKNOWN", "ERROR", "", "UNKNOWN", "ERROR", "not a date",
            ])],
            &sentinels(),
        );
        let record = &records[0];
        assert_eq!(record.txn_id, "TXN_1");
        assert_eq!(record.item, None);
        assert_eq!(record.quantity, None);
        assert_eq!(record.unit_price, None);
        assert_eq!(record.total, None);
        assert_eq!(record.payment, None);
        assert_eq!(record.location, None);
        assert_eq!(record.date, None);
    }

    #[test]
    fn well_formed_cells_are_typed() {
        let records = normalize_cafe(
            vec![row(&[
                "TXN_2",
                "Coffee",
                "3",
                "2.0",
                "6.0",
                "Credit Card",
                "In-store",
                "2023-06-11",
            ])],
            &sentinels(),
        );
        let record = &records[0];
        assert_eq!(record.item.as_deref(), Some("Coffee"));
        assert_eq!(record.quantity, Some(3));
        assert_eq!(record.unit_price, Some(Decimal::new(2, 0)));
        assert_eq!(record.total, Some(Decimal::new(6, 0)));
        assert_eq!(record.payment.as_deref(), Some("Credit Card"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 6, 11));
    }

    #[test]
    fn short_rows_pad_with_missing() {
        let records = normalize_cafe(vec![row(&["TXN_3", "Tea"])], &sentinels());
        assert_eq!(records[0].item.as_deref(), Some("Tea"));
        assert_eq!(records[0].date, None);
    }
}
