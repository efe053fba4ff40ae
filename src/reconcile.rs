//! Backfills quantity, unit price, or total from the other two using
//! `total = quantity * unit_price`.

use log::{debug, info, warn};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::record::CafeRecord;

/// Relative tolerance used when checking `total = quantity * unit_price`.
pub const RELATIVE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub quantities: usize,
    pub unit_prices: usize,
    pub totals: usize,
    /// Fills abandoned because the arithmetic had no usable answer.
    pub degenerate: usize,
    /// Records whose three present values disagree.
    pub inconsistent: usize,
}

impl ReconcileReport {
    pub fn filled(&self) -> usize {
        self.quantities + self.unit_prices + self.totals
    }
}

/// Runs the three derivations in order (quantity, then unit price, then
/// total) and only ever fills missing fields.
///
/// A zero divisor, a non-integral quantity, or an overflow leaves the target
/// missing, so a record with two of the three values present can still leave
/// this stage incomplete. Quantities are whole units; a fractional result such
/// as `5 / 2` is counted as degenerate rather than written as `2.5`.
/// Records that arrive with all three values present are checked but never
/// rewritten.
pub fn reconcile(records: Vec<CafeRecord>) -> (Vec<CafeRecord>, ReconcileReport) {
    let mut report = ReconcileReport::default();
    let records = records
        .into_iter()
        .map(|record| reconcile_record(record, &mut report))
        .collect::<Vec<_>>();
    info!(
        "Derived {} quantity, {} unit price, {} total value(s); {} degenerate, {} inconsistent",
        report.quantities,
        report.unit_prices,
        report.totals,
        report.degenerate,
        report.inconsistent
    );
    (records, report)
}

fn reconcile_record(mut record: CafeRecord, report: &mut ReconcileReport) -> CafeRecord {
    let complete_on_entry =
        record.quantity.is_some() && record.unit_price.is_some() && record.total.is_some();

    if record.quantity.is_none()
        && let (Some(price), Some(total)) = (record.unit_price, record.total)
    {
        match total.checked_div(price).and_then(whole_quantity) {
            Some(quantity) => {
                record.quantity = Some(quantity);
                report.quantities += 1;
            }
            None => {
                debug!("{}: cannot derive quantity from {total} / {price}", record.txn_id);
                report.degenerate += 1;
            }
        }
    }

    if record.unit_price.is_none()
        && let (Some(quantity), Some(total)) = (record.quantity, record.total)
    {
        match total.checked_div(Decimal::from(quantity)) {
            Some(price) => {
                record.unit_price = Some(price);
                report.unit_prices += 1;
            }
            None => {
                debug!("{}: cannot derive unit price from {total} / {quantity}", record.txn_id);
                report.degenerate += 1;
            }
        }
    }

    if record.total.is_none()
        && let (Some(quantity), Some(price)) = (record.quantity, record.unit_price)
    {
        match Decimal::from(quantity).checked_mul(price) {
            Some(total) => {
                record.total = Some(total);
                report.totals += 1;
            }
            None => {
                debug!("{}: total overflows for {quantity} x {price}", record.txn_id);
                report.degenerate += 1;
            }
        }
    }

    if complete_on_entry && is_consistent(&record) == Some(false) {
        warn!(
            "{}: quantity {:?} x unit price {:?} does not match total {:?}; left as is",
            record.txn_id, record.quantity, record.unit_price, record.total
        );
        report.inconsistent += 1;
    }

    record
}

fn whole_quantity(value: Decimal) -> Option<i64> {
    if value.fract().is_zero() {
        value.to_i64()
    } else {
        None
    }
}

/// `None` unless all three values are present; otherwise whether the
/// identity holds within [`RELATIVE_TOLERANCE`].
pub fn is_consistent(record: &CafeRecord) -> Option<bool> {
    let quantity = Decimal::from(record.quantity?);
    let price = record.unit_price?;
    let total = record.total?;
    let Some(product) = quantity.checked_mul(price) else {
        return Some(false);
    };
    let Some(difference) = product.checked_sub(total) else {
        return Some(false);
    };
    let scale = total.abs().max(product.abs());
    let allowed = scale.checked_mul(RELATIVE_TOLERANCE).unwrap_or(Decimal::MAX);
    Some(difference.abs() <= allowed)
}
