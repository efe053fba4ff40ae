//! Diagnostics collected while a table moves through the pipeline.

use std::path::Path;

use crate::{
    fallback::WarehouseFillReport,
    prune::PruneReport,
    reconcile::ReconcileReport,
    record::{CafeField, CafeRecord},
    stats::{self, SUMMARY_HEADERS},
    table,
};

/// Row count and per-field missing counts after one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSnapshot {
    pub stage: &'static str,
    pub rows: usize,
    pub missing: Vec<usize>,
}

impl StageSnapshot {
    pub fn capture(stage: &'static str, records: &[CafeRecord]) -> Self {
        let missing = CafeField::ALL
            .iter()
            .map(|field| records.iter().filter(|r| r.missing(*field)).count())
            .collect();
        Self {
            stage,
            rows: records.len(),
            missing,
        }
    }

    pub fn missing_of(&self, field: CafeField) -> usize {
        CafeField::ALL
            .iter()
            .position(|f| *f == field)
            .and_then(|idx| self.missing.get(idx).copied())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CafeReport {
    pub snapshots: Vec<StageSnapshot>,
    pub prune: PruneReport,
    pub reconcile: ReconcileReport,
    pub modes_filled: usize,
}

impl CafeReport {
    pub fn stage_headers() -> Vec<String> {
        std::iter::once("stage")
            .chain(std::iter::once("rows"))
            .chain(CafeField::ALL.iter().map(|f| f.column_name()))
            .map(str::to_string)
            .collect()
    }

    pub fn stage_rows(&self) -> Vec<Vec<String>> {
        self.snapshots
            .iter()
            .map(|snapshot| {
                let mut row = vec![snapshot.stage.to_string(), snapshot.rows.to_string()];
                row.extend(snapshot.missing.iter().map(|m| m.to_string()));
                row
            })
            .collect()
    }

    pub fn prune_rows(&self) -> Vec<Vec<String>> {
        self.prune
            .dropped
            .iter()
            .map(|(pattern, count)| vec![pattern.describe(), count.to_string()])
            .collect()
    }
}

fn banner(output: &Path, rows: usize, columns: usize) {
    println!("\n{}", "=".repeat(50));
    println!("DATA CLEANING SUMMARY");
    println!("{}", "=".repeat(50));
    println!("✓ Data cleaning completed successfully!");
    println!("✓ Cleaned data saved to: {}", output.display());
    println!("✓ Final dataset shape: ({rows}, {columns})\n");
}

fn owned(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

pub fn print_cafe_summary(output: &Path, records: &[CafeRecord], columns: usize, report: &CafeReport) {
    banner(output, records.len(), columns);
    println!("Missing values by stage:");
    table::print_table(&CafeReport::stage_headers(), &report.stage_rows());
    println!("\nRows dropped by pattern:");
    table::print_table(&owned(&["pattern", "rows"]), &report.prune_rows());
    println!(
        "\nDerived {} value(s); {} degenerate, {} inconsistent. Mode-filled {} value(s).\n",
        report.reconcile.filled(),
        report.reconcile.degenerate,
        report.reconcile.inconsistent,
        report.modes_filled
    );
    table::print_table(&owned(&SUMMARY_HEADERS), &stats::summarize_cafe(records));
}

pub fn print_warehouse_summary(
    output: &Path,
    records: &[crate::record::WarehouseRecord],
    columns: usize,
    report: &WarehouseFillReport,
) {
    banner(output, records.len(), columns);
    table::print_table(
        &owned(&["filled", "count"]),
        &[
            vec!["Quantity".to_string(), report.quantities.to_string()],
            vec!["Price".to_string(), report.prices.to_string()],
            vec!["Restocked".to_string(), report.dates.to_string()],
        ],
    );
    println!();
    table::print_table(&owned(&SUMMARY_HEADERS), &stats::summarize_warehouse(records));
}
