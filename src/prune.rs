//! Row pruning by missingness pattern.

use log::{debug, info};

use crate::record::{CafeField, CafeRecord};

/// A combination of simultaneously missing fields that leaves a record with
/// no reconstruction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPattern {
    NoItemQuantityPrice,
    NoQuantityPriceTotal,
    NoItemPriceTotal,
    NoItemQuantityTotal,
    NoQuantityTotal,
    NoDate,
}

impl DropPattern {
    /// Filters in application order.
    pub const ALL: [DropPattern; 6] = [
        DropPattern::NoItemQuantityPrice,
        DropPattern::NoQuantityPriceTotal,
        DropPattern::NoItemPriceTotal,
        DropPattern::NoItemQuantityTotal,
        DropPattern::NoQuantityTotal,
        DropPattern::NoDate,
    ];

    pub fn fields(self) -> &'static [CafeField] {
        use CafeField::*;
        match self {
            DropPattern::NoItemQuantityPrice => &[Item, Quantity, UnitPrice],
            DropPattern::NoQuantityPriceTotal => &[Quantity, UnitPrice, Total],
            DropPattern::NoItemPriceTotal => &[Item, UnitPrice, Total],
            DropPattern::NoItemQuantityTotal => &[Item, Quantity, Total],
            DropPattern::NoQuantityTotal => &[Quantity, Total],
            DropPattern::NoDate => &[Date],
        }
    }

    pub fn matches(self, record: &CafeRecord) -> bool {
        self.fields().iter().all(|field| record.missing(*field))
    }

    pub fn describe(self) -> String {
        let names = self
            .fields()
            .iter()
            .map(|f| f.column_name())
            .collect::<Vec<_>>();
        format!("missing {}", names.join(" + "))
    }
}

/// Rows removed by each filter, in [`DropPattern::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub dropped: Vec<(DropPattern, usize)>,
}

impl PruneReport {
    pub fn total(&self) -> usize {
        self.dropped.iter().map(|(_, count)| count).sum()
    }
}

/// Applies the six filters one after another, each to the already reduced
/// table.
pub fn prune(records: Vec<CafeRecord>) -> (Vec<CafeRecord>, PruneReport) {
    let mut report = PruneReport::default();
    let mut current = records;
    for pattern in DropPattern::ALL {
        let before = current.len();
        current.retain(|record| {
            let drop = pattern.matches(record);
            if drop {
                debug!("Dropping {} ({})", record.txn_id, pattern.describe());
            }
            !drop
        });
        report.dropped.push((pattern, before - current.len()));
    }
    info!(
        "Pruned {} unrecoverable row(s), {} remain",
        report.total(),
        current.len()
    );
    (current, report)
}
