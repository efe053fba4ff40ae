//! Warehouse inventory variant: worded quantities and group-average fills.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::WarehouseArgs,
    data::{parse_date, parse_decimal, parse_label, parse_worded_integer},
    error::LayoutError,
    fallback::{self, WarehouseFillReport},
    io_utils::{self, RawTable},
    record::{WarehouseColumn, WarehouseRecord, warehouse_columns},
    report,
};

struct WarehouseLayout {
    id: usize,
    quantity: usize,
    price: usize,
    category: usize,
    restocked: usize,
    extras: Vec<usize>,
    columns: Vec<WarehouseColumn>,
}

impl WarehouseLayout {
    fn resolve(headers: &[String]) -> Result<Self, LayoutError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LayoutError::MissingColumn(name.to_string()))
        };
        let id = find(warehouse_columns::ID)?;
        let quantity = find(warehouse_columns::QUANTITY)?;
        let price = find(warehouse_columns::PRICE)?;
        let category = find(warehouse_columns::CATEGORY)?;
        let restocked = find(warehouse_columns::RESTOCKED)?;

        let mut extras = Vec::new();
        let mut columns = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let column = match idx {
                _ if idx == id => WarehouseColumn::Id,
                _ if idx == quantity => WarehouseColumn::Quantity,
                _ if idx == price => WarehouseColumn::Price,
                _ if idx == category => WarehouseColumn::Category,
                _ if idx == restocked => WarehouseColumn::Restocked,
                _ if header.trim() == warehouse_columns::NAME => continue,
                _ => {
                    extras.push(idx);
                    WarehouseColumn::Extra {
                        header: header.clone(),
                        slot: extras.len() - 1,
                    }
                }
            };
            columns.push(column);
        }
        Ok(Self {
            id,
            quantity,
            price,
            category,
            restocked,
            extras,
            columns,
        })
    }
}

/// Typed warehouse rows plus the column layout they are written back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseTable {
    pub columns: Vec<WarehouseColumn>,
    pub records: Vec<WarehouseRecord>,
}

impl WarehouseTable {
    /// Output header: input order with `Product Name` removed and the id and
    /// restock columns renamed.
    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.output_name().to_string())
            .collect()
    }
}

/// Types warehouse rows by header name. `Product Name` is discarded; any
/// column the cleaner does not interpret is kept verbatim.
pub fn normalize_warehouse(table: RawTable) -> Result<WarehouseTable, LayoutError> {
    let layout = WarehouseLayout::resolve(&table.headers)?;
    let records = table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
            WarehouseRecord {
                id: cell(layout.id).to_string(),
                quantity: parse_worded_integer(cell(layout.quantity)),
                price: parse_decimal(cell(layout.price)),
                category: parse_label(cell(layout.category), &[]),
                restocked: parse_date(cell(layout.restocked)),
                extra: layout.extras.iter().map(|idx| cell(*idx).to_string()).collect(),
            }
        })
        .collect();
    Ok(WarehouseTable {
        columns: layout.columns,
        records,
    })
}

pub fn clean_warehouse(table: RawTable) -> Result<(WarehouseTable, WarehouseFillReport), LayoutError> {
    let WarehouseTable { columns, records } = normalize_warehouse(table)?;
    let (records, report) = fallback::fill_warehouse(records);
    Ok((WarehouseTable { columns, records }, report))
}

pub fn execute(args: &WarehouseArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.io.delimiter);
    let input_encoding = io_utils::resolve_encoding(args.io.input_encoding.as_deref())?;
    let output_delimiter =
        io_utils::resolve_output_delimiter(&args.output, args.io.output_delimiter, delimiter);
    let output_encoding = io_utils::resolve_encoding(args.io.output_encoding.as_deref())?;
    info!(
        "Cleaning warehouse inventory '{}' -> '{}' (delimiter '{}')",
        args.input.display(),
        args.output.display(),
        crate::printable_delimiter(delimiter)
    );

    let table = io_utils::read_table(&args.input, delimiter, input_encoding)?;
    let (cleaned, fill_report) =
        clean_warehouse(table).with_context(|| format!("Checking layout of {:?}", args.input))?;

    let headers = cleaned.headers();
    let records = &cleaned.records;
    io_utils::write_table_atomically(
        &args.output,
        &headers,
        records.iter().map(|record| record.to_row(&cleaned.columns)),
        output_delimiter,
        output_encoding,
    )
    .with_context(|| format!("Writing cleaned data to {:?}", args.output))?;
    info!("Wrote {} row(s) to {:?}", records.len(), args.output);

    if !args.io.quiet {
        report::print_warehouse_summary(&args.output, records, headers.len(), &fill_report);
    }
    Ok(())
}
