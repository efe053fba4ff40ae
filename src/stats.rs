//! Summary statistics for the numeric and date columns of a cleaned table.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::record::{CafeRecord, WarehouseRecord};

pub const SUMMARY_HEADERS: [&str; 7] = ["column", "count", "min", "max", "mean", "median", "std_dev"];

#[derive(Debug, Clone)]
pub struct ColumnStats {
    name: String,
    values: Vec<f64>,
    sum: f64,
    sum_squares: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl ColumnStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            sum: 0.0,
            sum_squares: 0.0,
            min: None,
            max: None,
        }
    }

    pub fn add_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.sum += value;
        self.sum_squares += value * value;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
        self.values.push(value);
    }

    pub fn add_decimal(&mut self, value: &Decimal) {
        if let Some(numeric) = value.to_f64() {
            self.add_value(numeric);
        }
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.count() as f64)
        }
    }

    pub fn median(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len().is_multiple_of(2) {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    pub fn std_dev(&self) -> Option<f64> {
        let count = self.count();
        if count < 2 {
            return None;
        }
        let mean = self.mean()?;
        let variance = (self.sum_squares - count as f64 * mean * mean) / (count as f64 - 1.0);
        Some(variance.max(0.0).sqrt())
    }

    pub fn render_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.count().to_string(),
            format_metric(self.min),
            format_metric(self.max),
            format_metric(self.mean()),
            format_metric(self.median()),
            format_metric(self.std_dev()),
        ]
    }
}

fn format_metric(metric: Option<f64>) -> String {
    metric.map(format_number).unwrap_or_default()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

/// Median of a set of dates, truncated to a whole day when the two middle
/// dates are an odd number of days apart. A timestamp median would keep the
/// extra half day as `12:00` on the same date; here it is dropped.
pub fn median_date(dates: &[NaiveDate]) -> Option<NaiveDate> {
    if dates.is_empty() {
        return None;
    }
    let mut days = dates.iter().map(|d| d.num_days_from_ce()).collect::<Vec<_>>();
    days.sort_unstable();
    let mid = days.len() / 2;
    let median = if days.len().is_multiple_of(2) {
        let low = i64::from(days[mid - 1]);
        let high = i64::from(days[mid]);
        i32::try_from((low + high).div_euclid(2)).ok()?
    } else {
        days[mid]
    };
    NaiveDate::from_num_days_from_ce_opt(median)
}

pub fn summarize_cafe(records: &[CafeRecord]) -> Vec<Vec<String>> {
    let mut quantity = ColumnStats::new("Quantity");
    let mut unit_price = ColumnStats::new("Unit_Price");
    let mut total = ColumnStats::new("Total");
    for record in records {
        if let Some(q) = record.quantity {
            quantity.add_value(q as f64);
        }
        if let Some(p) = &record.unit_price {
            unit_price.add_decimal(p);
        }
        if let Some(t) = &record.total {
            total.add_decimal(t);
        }
    }
    vec![quantity.render_row(), unit_price.render_row(), total.render_row()]
}

pub fn summarize_warehouse(records: &[WarehouseRecord]) -> Vec<Vec<String>> {
    let mut quantity = ColumnStats::new("Quantity");
    let mut price = ColumnStats::new("Price");
    for record in records {
        if let Some(q) = record.quantity {
            quantity.add_value(q as f64);
        }
        if let Some(p) = &record.price {
            price.add_decimal(p);
        }
    }
    vec![quantity.render_row(), price.render_row()]
}
