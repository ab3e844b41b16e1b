//! Output formatting for table, JSON and JSONL output.
//!
//! Provides a writer that can output single records or batches in a
//! human-readable table or in either JSON or JSON Lines format.

use std::io::{self, Write};

use crate::types::ImageRecord;

/// Column headers of the results table.
pub const TABLE_HEADERS: [&str; 5] = ["name", "size", "dpi", "color depth", "compression"];

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pipe-separated table for humans
    Table,
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Some(Self::Table),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// The cells of one table row, in column order.
pub fn table_cells(record: &ImageRecord) -> [String; 5] {
    [
        record.name.clone(),
        format!("{} × {}", record.width, record.height),
        record.dpi.to_string(),
        record.color_depth.to_string(),
        record.compression.to_string(),
    ]
}

/// Format a single record as an unaligned table row.
pub fn format_row(record: &ImageRecord) -> String {
    table_cells(record).join(" | ")
}

/// Render records as a table with aligned columns and a header line.
pub fn render_table(records: &[ImageRecord]) -> String {
    let rows: Vec<[String; 5]> = records.iter().map(table_cells).collect();

    // Width in chars, not bytes: the size column contains '×'
    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = TABLE_HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

/// A writer that serializes records as a table, JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer (file, stdout, etc.)
    /// * `format` - Output format
    /// * `pretty` - Whether to pretty-print JSON (only affects JSON format)
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single record.
    ///
    /// Table rows are written unaligned since later rows are not known yet.
    pub fn write(&mut self, record: &ImageRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Table => {
                writeln!(self.writer, "{}", format_row(record))?;
            }
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, record)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines => {
                // JSONL is never pretty-printed (one object per line)
                serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch of records.
    ///
    /// For table format, writes an aligned table with a header.
    /// For JSON format, writes a JSON array.
    /// For JSONL format, writes one object per line.
    pub fn write_all(&mut self, records: &[ImageRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Table => {
                self.writer.write_all(render_table(records).as_bytes())?;
                self.items_written += records.len();
            }
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, records)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, records).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += records.len();
            }
            OutputFormat::JsonLines => {
                for record in records {
                    self.write(record)?;
                }
            }
        }
        Ok(())
    }

    /// Get the number of records written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
