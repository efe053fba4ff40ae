use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean and impute messy sales and inventory CSV exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean a cafe sales export (prune, impute prices/items/quantities, fill by item)
    Cafe(CafeArgs),
    /// Clean a warehouse inventory export (worded quantities, category means, median dates)
    Warehouse(WarehouseArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CafeArgs {
    /// Raw cafe sales CSV (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination for the cleaned CSV
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Seed for the random item draw (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
    /// JSON object of `item: price` pairs replacing the built-in menu
    #[arg(long)]
    pub menu: Option<PathBuf>,
    /// Tokens treated as missing in categorical columns (defaults to UNKNOWN,ERROR)
    #[arg(long = "sentinel", action = clap::ArgAction::Append)]
    pub sentinels: Vec<String>,
    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Debug, Clone, Args)]
pub struct WarehouseArgs {
    /// Raw warehouse inventory CSV (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination for the cleaned CSV
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct IoArgs {
    /// CSV delimiter character for reading input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Character encoding for the output file (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    /// Skip the console summary
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_single_characters() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn cafe_args_collect_repeated_sentinels() {
        let cli = Cli::parse_from([
            "csv-cleanse",
            "cafe",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "--sentinel",
            "N/A",
            "--sentinel",
            "ERROR",
            "--seed",
            "7",
        ]);
        match cli.command {
            Commands::Cafe(args) => {
                assert_eq!(args.sentinels, vec!["N/A", "ERROR"]);
                assert_eq!(args.seed, Some(7));
                assert!(!args.io.quiet);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
