//! Group-level fallback fills for whatever the imputers could not recover.

use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, info};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

use crate::{
    frequency::ValueCounts,
    record::{CafeRecord, WarehouseRecord},
    stats::median_date,
};

/// Per-group fill for a categorical field of [`CafeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryField {
    Payment,
    Location,
}

impl SecondaryField {
    pub const ALL: [SecondaryField; 2] = [SecondaryField::Payment, SecondaryField::Location];

    fn get(self, record: &CafeRecord) -> Option<&str> {
        match self {
            SecondaryField::Payment => record.payment.as_deref(),
            SecondaryField::Location => record.location.as_deref(),
        }
    }

    fn slot(self, record: &mut CafeRecord) -> &mut Option<String> {
        match self {
            SecondaryField::Payment => &mut record.payment,
            SecondaryField::Location => &mut record.location,
        }
    }
}

/// Fills missing payment and location values with the most frequent value
/// among records sharing the same item.
///
/// Records without an item belong to no group and are left alone, as are
/// groups with no observed value for the field. Ties go to the smallest value.
pub fn fill_cafe_modes(records: Vec<CafeRecord>) -> (Vec<CafeRecord>, usize) {
    let mut records = records;
    let groups = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| record.item.clone().map(|item| (item, idx)))
        .into_group_map();

    let mut filled = 0;
    for field in SecondaryField::ALL {
        for (item, members) in &groups {
            let counts = members
                .iter()
                .filter_map(|&idx| field.get(&records[idx]))
                .collect::<ValueCounts>();
            let Some(mode) = counts.mode().map(str::to_string) else {
                continue;
            };
            for &idx in members {
                let slot = field.slot(&mut records[idx]);
                if slot.is_none() {
                    *slot = Some(mode.clone());
                    filled += 1;
                }
            }
            debug!("{field:?} mode for '{item}' is '{mode}'");
        }
    }
    info!("Filled {filled} categorical value(s) from item group modes");
    (records, filled)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarehouseFillReport {
    pub quantities: usize,
    pub prices: usize,
    pub dates: usize,
}

/// Fills warehouse gaps: quantity and price from their category mean
/// (rounded half to even to a whole number), then restock dates from the
/// median of all present dates.
pub fn fill_warehouse(records: Vec<WarehouseRecord>) -> (Vec<WarehouseRecord>, WarehouseFillReport) {
    let mut records = records;
    let mut report = WarehouseFillReport::default();

    let quantity_means = category_means(&records, |r| r.quantity.map(Decimal::from));
    let price_means = category_means(&records, |r| r.price);

    for record in &mut records {
        let Some(category) = record.category.as_deref() else {
            continue;
        };
        if record.quantity.is_none()
            && let Some(mean) = quantity_means.get(category)
            && let Some(quantity) = mean.to_i64()
        {
            record.quantity = Some(quantity);
            report.quantities += 1;
        }
        if record.price.is_none()
            && let Some(mean) = price_means.get(category)
        {
            record.price = Some(*mean);
            report.prices += 1;
        }
    }

    let present = records.iter().filter_map(|r| r.restocked).collect::<Vec<_>>();
    if let Some(median) = median_date(&present) {
        for record in records.iter_mut().filter(|r| r.restocked.is_none()) {
            record.restocked = Some(median);
            report.dates += 1;
        }
        debug!("Median restock date is {median}");
    }

    info!(
        "Filled {} quantity, {} price, {} restock date value(s)",
        report.quantities, report.prices, report.dates
    );
    (records, report)
}

/// Rounded mean of `value` per category, skipping missing values.
fn category_means<F>(records: &[WarehouseRecord], value: F) -> HashMap<String, Decimal>
where
    F: Fn(&WarehouseRecord) -> Option<Decimal>,
{
    records
        .iter()
        .filter_map(|record| Some((record.category.clone()?, value(record)?)))
        .into_group_map()
        .into_iter()
        .filter_map(|(category, values)| {
            let sum = values
                .iter()
                .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
            let mean = sum.checked_div(Decimal::from(values.len()))?;
            Some((
                category,
                mean.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven),
            ))
        })
        .collect()
}
