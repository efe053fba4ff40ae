pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod fallback;
pub mod frequency;
pub mod impute;
pub mod io_utils;
pub mod normalize;
pub mod pipeline;
pub mod prune;
pub mod reconcile;
pub mod record;
pub mod reference;
pub mod report;
pub mod stats;
pub mod table;
pub mod warehouse;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_cleanse", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Cafe(args) => pipeline::execute(&args),
        Commands::Warehouse(args) => warehouse::execute(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
