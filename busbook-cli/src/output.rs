//! Listing output in table, JSON, CSV and TSV formats.
//!
//! Commands build their rows once as strings for the tabular formats and
//! as a JSON value for `--format json`, then hand both to [`print_listing`].

use crate::error::CliError;
use busbook::config::OutputFormat;
use std::io::Write;

/// Writes a listing to stdout in the requested format.
///
/// `rows` must have one entry per header; `json` is written as-is.
pub fn print_listing(
    format: OutputFormat,
    headers: &[&str],
    rows: &[Vec<String>],
    json: &serde_json::Value,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_listing(&mut handle, format, headers, rows, json)
}

/// Writes a listing to any writer.
pub fn write_listing<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    headers: &[&str],
    rows: &[Vec<String>],
    json: &serde_json::Value,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => format_as_table(writer, headers, rows),
        OutputFormat::Json => format_as_json(writer, json),
        OutputFormat::Csv => format_as_delimited(writer, headers, rows, b','),
        OutputFormat::Tsv => format_as_delimited(writer, headers, rows, b'\t'),
    }
}

/// Format rows as a human-readable table.
fn format_as_table<W: Write>(
    writer: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<(), CliError> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    // Print header (uppercase for table display)
    writeln!(
        writer,
        "{}",
        render(headers.iter().map(|h| h.to_uppercase()).collect())
    )?;

    for row in rows {
        let cells = row
            .iter()
            .map(|cell| if cell.is_empty() { "-".to_string() } else { cell.clone() })
            .collect();
        writeln!(writer, "{}", render(cells))?;
    }

    Ok(())
}

/// Format a JSON value, pretty-printed.
fn format_as_json<W: Write>(writer: &mut W, json: &serde_json::Value) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, json)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    writeln!(writer)?;
    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Format rows as delimited output (CSV or TSV).
fn format_as_delimited<W: Write>(
    writer: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<(), CliError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(headers).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}
