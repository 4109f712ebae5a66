//! Tabular output in the four supported formats.
//!
//! Listing commands turn records into [`Row`]s and hand them to [`render`],
//! which writes an aligned table, JSON, CSV or TSV to stdout.

use std::io::{self, Write};

use serde::Serialize;
use tabling::config::OutputFormat;

use crate::error::CliError;

/// A record that can be listed.
pub trait Row: Serialize {
    /// Column headers, lowercase.
    const HEADERS: &'static [&'static str];

    /// Field values in header order; empty for missing values.
    fn fields(&self) -> Vec<String>;
}

/// Writes `rows` to stdout in `format`.
pub fn render<R: Row>(rows: &[R], format: OutputFormat) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_rows(&mut handle, rows, format)
}

/// Writes `rows` to `out` in `format`.
pub fn write_rows<R: Row, W: Write>(
    out: &mut W,
    rows: &[R],
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => write_table(out, rows),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => write_delimited(out, rows, b','),
        OutputFormat::Tsv => write_delimited(out, rows, b'\t'),
    }
}

fn write_table<R: Row, W: Write>(out: &mut W, rows: &[R]) -> Result<(), CliError> {
    let headers: Vec<String> = R::HEADERS.iter().map(|h| h.to_uppercase()).collect();
    let records: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.fields()
                .into_iter()
                .map(|f| if f.is_empty() { "-".to_string() } else { f })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for record in &records {
        for (width, field) in widths.iter_mut().zip(record) {
            *width = (*width).max(field.chars().count());
        }
    }

    for line in std::iter::once(&headers).chain(&records) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(field, &width)| format!("{field:<width$}"))
            .collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }
    Ok(())
}

fn write_delimited<R: Row, W: Write>(
    out: &mut W,
    rows: &[R],
    delimiter: u8,
) -> Result<(), CliError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    Ok(())
}
