//! I/O utilities for CSV reading, writing, encoding, and delimiter resolution.
//!
//! All file I/O in csv-cleanse flows through this module. It provides:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding and output transcoding via `encoding_rs`,
//!   defaulting to UTF-8.
//! - **Whole-table reads**: [`read_table`] loads the header and every row into
//!   memory; the `-` path reads stdin.
//! - **Atomic writes**: [`write_table_atomically`] renders the full table into a
//!   temporary file beside the target and renames it into place.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::warn;
use tempfile::NamedTempFile;

use crate::error::LayoutError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: &Path, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// An input file held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads the header and all rows of `path`, decoding with `encoding`.
///
/// Ragged rows are accepted. Short rows are returned as read and cells past
/// the header width are discarded.
pub fn read_table(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<RawTable> {
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    let header_record = reader
        .byte_headers()
        .with_context(|| format!("Reading header of {path:?}"))?
        .clone();
    let headers = decode_record(&header_record, encoding)?;
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LayoutError::EmptyInput).with_context(|| format!("Reading {path:?}"));
    }
    let width = headers.len();
    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let mut decoded = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        if decoded.len() != width {
            ragged += 1;
            decoded.truncate(width);
        }
        rows.push(decoded);
    }
    if ragged > 0 {
        warn!("{ragged} row(s) in {path:?} do not match the {width}-column header");
    }
    Ok(RawTable { headers, rows })
}

/// Writes the whole table at once: rows go to a temporary file in the target
/// directory, which then replaces `path`. A failed write leaves any existing
/// file at `path` intact.
pub fn write_table_atomically(
    path: &Path,
    headers: &[String],
    rows: impl IntoIterator<Item = Vec<String>>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(directory)
        .with_context(|| format!("Creating temporary file in {directory:?}"))?;
    {
        let base: Box<dyn Write + '_> = Box::new(BufWriter::new(staging.as_file()));
        let sink: Box<dyn Write + '_> = if encoding == UTF_8 {
            base
        } else {
            Box::new(TranscodingWriter::new(base, encoding))
        };
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Necessary)
            .double_quote(true)
            .from_writer(sink);
        writer
            .write_record(headers)
            .context("Writing output header")?;
        for row in rows {
            writer.write_record(&row).context("Writing output row")?;
        }
        writer.flush().context("Flushing output")?;
    }
    staging
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Moving output into place at {path:?}"))?;
    Ok(())
}

struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    buffer: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            buffer: Vec::new(),
        }
    }

    fn flush_buffer(&mut self, force: bool) -> io::Result<()> {
        match std::str::from_utf8(&self.buffer) {
            Ok(valid) => {
                let text = valid.to_owned();
                self.encode_and_write(&text)?;
                self.buffer.clear();
                Ok(())
            }
            Err(err) => {
                if let Some(error_len) = err.error_len() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("Invalid UTF-8 sequence in output stream ({error_len} bytes)"),
                    ));
                }
                let valid_up_to = err.valid_up_to();
                if valid_up_to > 0 {
                    let text = String::from_utf8_lossy(&self.buffer[..valid_up_to]).into_owned();
                    self.encode_and_write(&text)?;
                    self.buffer.drain(..valid_up_to);
                }
                if force && !self.buffer.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "Incomplete UTF-8 sequence at end of output stream",
                    ));
                }
                Ok(())
            }
        }
    }

    fn encode_and_write(&mut self, text: &str) -> io::Result<()> {
        let (encoded, _output_encoding, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to encode text using {}", self.encoding.name()),
            ));
        }
        self.inner.write_all(encoded.as_ref())
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.flush_buffer(false)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer(true)?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("a.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), Some(b';')), b';');
        assert_eq!(resolve_output_delimiter(Path::new("out.txt"), None, b'|'), b'|');
    }

    #[test]
    fn read_table_rejects_empty_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        let err = read_table(&path, b',', UTF_8).unwrap_err();
        assert!(err.downcast_ref::<LayoutError>().is_some());
    }

    #[test]
    fn write_then_read_preserves_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string(), "x, y".to_string()]];
        write_table_atomically(&path, &headers, rows.clone(), b',', UTF_8).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,\"x, y\"\n");
        let table = read_table(&path, b',', UTF_8).unwrap();
        assert_eq!(table.headers, headers);
        assert_eq!(table.rows, rows);
    }

    #[test]
    fn ragged_rows_are_kept_and_clipped_to_header_width() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b,c\n1\n1,2,3,4,5\n").unwrap();
        let table = read_table(&path, b',', UTF_8).unwrap();
        assert_eq!(table.rows[0], vec!["1".to_string()]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn transcoding_writer_emits_target_encoding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        write_table_atomically(
            &path,
            &["café".to_string()],
            vec![vec!["crème".to_string()]],
            b',',
            encoding,
        )
        .unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, b"caf\xe9\ncr\xe8me\n");
        let table = read_table(&path, b',', encoding).unwrap();
        assert_eq!(table.rows[0][0], "crème");
    }
}
