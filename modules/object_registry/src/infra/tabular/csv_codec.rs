//! CSV container

use crate::domain::tabular::{Cell, Grid, TabularCodec};
use anyhow::{anyhow, Context, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvCodec;

impl CsvCodec {
    /// Spreadsheet locales that use a decimal comma export with ';'
    fn sniff_delimiter(text: &str) -> u8 {
        let first_line = text.lines().next().unwrap_or_default();
        if first_line.contains(';') && !first_line.contains(',') {
            b';'
        } else {
            b','
        }
    }
}

/// 1-based line numbers of records, given the ascending byte offsets the
/// reader reports for them
struct LineCounter<'a> {
    text: &'a str,
    scanned: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            scanned: 0,
            line: 1,
        }
    }

    /// A record's reported offset sits before any blank lines skipped
    /// ahead of it, so step over line terminators first
    fn line_at(&mut self, offset: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut end = offset.min(bytes.len());
        while end < bytes.len() && matches!(bytes[end], b'\r' | b'\n') {
            end += 1;
        }
        if end > self.scanned {
            self.line += bytes[self.scanned..end]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.scanned = end;
        }
        self.line
    }
}

impl TabularCodec for CsvCodec {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn accepts(&self, payload: &[u8]) -> bool {
        std::str::from_utf8(payload.strip_prefix(UTF8_BOM).unwrap_or(payload)).is_ok()
    }

    fn encode(&self, grid: &[Vec<Cell>]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        for row in grid {
            writer.write_record(row.iter().map(Cell::to_text))?;
        }

        writer
            .into_inner()
            .map_err(|e| anyhow!("failed to flush CSV output: {}", e.error()))
    }

    fn decode(&self, payload: &[u8]) -> Result<Grid> {
        let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
        let text = std::str::from_utf8(payload).context("CSV payload is not valid UTF-8")?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(Self::sniff_delimiter(text))
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut grid = Grid::new();
        let mut lines = LineCounter::new(text);
        for result in reader.records() {
            let record = result.context("malformed CSV record")?;

            // The reader skips blank lines; keep their slots so grid
            // positions stay equal to line numbers
            if let Some(position) = record.position() {
                let offset = usize::try_from(position.byte()).unwrap_or(text.len());
                let line = lines.line_at(offset);
                while grid.len() + 1 < line {
                    grid.push(Vec::new());
                }
            }

            grid.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        tracing::debug!(rows = grid.len(), "Decoded CSV payload");
        Ok(grid)
    }
}
