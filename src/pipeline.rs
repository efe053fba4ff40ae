//! The cafe cleaning pipeline, from raw rows to a written file.

use anyhow::{Context, Result};
use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    cli::CafeArgs,
    config::CleaningConfig,
    error::LayoutError,
    fallback, impute, io_utils,
    io_utils::RawTable,
    normalize, prune, reconcile,
    record::{CAFE_COLUMNS, CafeRecord, INDEX_COLUMN, cafe_output_headers},
    report::{self, CafeReport, StageSnapshot},
};

/// Strips the header and checks the column layout.
///
/// A leading `index` column, as written by a previous run, is dropped so
/// cleaned output can be fed back in.
pub fn cafe_rows(table: RawTable) -> Result<Vec<Vec<String>>, LayoutError> {
    let RawTable { headers, rows } = table;
    let carries_index = headers.len() == CAFE_COLUMNS.len() + 1
        && headers.first().map(|h| h.trim()) == Some(INDEX_COLUMN);
    if carries_index {
        debug!("Ignoring leading '{INDEX_COLUMN}' column");
        return Ok(rows
            .into_iter()
            .map(|row| row.into_iter().skip(1).collect())
            .collect());
    }
    if headers.len() != CAFE_COLUMNS.len() {
        return Err(LayoutError::ColumnCount {
            expected: CAFE_COLUMNS.len(),
            found: headers.len(),
        });
    }
    Ok(rows)
}

/// Runs all six stages in order and returns the surviving records.
pub fn clean_cafe<R: Rng + ?Sized>(
    rows: Vec<Vec<String>>,
    config: &CleaningConfig,
    rng: &mut R,
) -> (Vec<CafeRecord>, CafeReport) {
    let mut report = CafeReport::default();

    let records = normalize::normalize_cafe(rows, &config.sentinels);
    report.snapshots.push(StageSnapshot::capture("normalize", &records));

    let (records, pruned) = prune::prune(records);
    report.prune = pruned;
    report.snapshots.push(StageSnapshot::capture("prune", &records));

    let records = impute::impute_unit_price(records, &config.menu);
    report.snapshots.push(StageSnapshot::capture("menu price", &records));

    let (records, reconciled) = reconcile::reconcile(records);
    report.reconcile = reconciled;
    report.snapshots.push(StageSnapshot::capture("reconcile", &records));

    let records = impute::impute_item(records, &config.menu.inverse(), rng);
    report.snapshots.push(StageSnapshot::capture("menu item", &records));

    let (records, modes_filled) = fallback::fill_cafe_modes(records);
    report.modes_filled = modes_filled;
    report.snapshots.push(StageSnapshot::capture("group mode", &records));

    (records, report)
}

pub fn cafe_output_rows(records: &[CafeRecord]) -> impl Iterator<Item = Vec<String>> + '_ {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_row(index))
}

pub fn execute(args: &CafeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.io.delimiter);
    let input_encoding = io_utils::resolve_encoding(args.io.input_encoding.as_deref())?;
    let output_delimiter =
        io_utils::resolve_output_delimiter(&args.output, args.io.output_delimiter, delimiter);
    let output_encoding = io_utils::resolve_encoding(args.io.output_encoding.as_deref())?;
    let config = CleaningConfig::from_args(args)?;
    info!(
        "Cleaning cafe sales '{}' -> '{}' (delimiter '{}', {} menu item(s))",
        args.input.display(),
        args.output.display(),
        crate::printable_delimiter(delimiter),
        config.menu.len()
    );

    let table = io_utils::read_table(&args.input, delimiter, input_encoding)?;
    let input_rows = table.rows.len();
    let rows = cafe_rows(table).with_context(|| format!("Checking layout of {:?}", args.input))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (records, cleaning_report) = clean_cafe(rows, &config, &mut rng);

    let headers = cafe_output_headers();
    io_utils::write_table_atomically(
        &args.output,
        &headers,
        cafe_output_rows(&records),
        output_delimiter,
        output_encoding,
    )
    .with_context(|| format!("Writing cleaned data to {:?}", args.output))?;
    info!(
        "Kept {} of {} row(s); wrote {:?}",
        records.len(),
        input_rows,
        args.output
    );

    if !args.io.quiet {
        report::print_cafe_summary(&args.output, &records, headers.len(), &cleaning_report);
    }
    Ok(())
}
