//! XLSX container: calamine reads, rust_xlsxwriter writes

use crate::domain::tabular::{Cell, Grid, TabularCodec};
use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;

/// Every XLSX file is a ZIP archive
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

const SHEET_NAME: &str = "objects";

pub struct XlsxCodec;

impl TabularCodec for XlsxCodec {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn accepts(&self, payload: &[u8]) -> bool {
        payload.starts_with(ZIP_SIGNATURE)
    }

    fn encode(&self, grid: &[Vec<Cell>]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (r, row) in grid.iter().enumerate() {
            let r = u32::try_from(r).context("too many rows for a worksheet")?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).context("too many columns for a worksheet")?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        sheet.write_string(r, c, s)?;
                    }
                    Cell::Int(i) => {
                        sheet.write_number(r, c, *i as f64)?;
                    }
                    Cell::Float(f) => {
                        sheet.write_number(r, c, *f)?;
                    }
                    Cell::Bool(b) => {
                        sheet.write_boolean(r, c, *b)?;
                    }
                    Cell::DateTime(_) => {
                        sheet.write_string(r, c, cell.to_text())?;
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn decode(&self, payload: &[u8]) -> Result<Grid> {
        let mut workbook =
            Xlsx::new(Cursor::new(payload)).context("payload is not a readable XLSX workbook")?;

        let range = workbook
            .worksheet_range_at(0)
            .context("workbook has no worksheets")?
            .context("first worksheet is unreadable")?;

        // A range starts at its first used cell; pad back to A1 so grid
        // positions line up with sheet rows and columns
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let lead = vec![Cell::Empty; first_col as usize];

        let mut grid: Grid = vec![Vec::new(); first_row as usize];
        for row in range.rows() {
            let mut cells = lead.clone();
            cells.extend(row.iter().map(to_cell));
            grid.push(cells);
        }

        tracing::debug!(rows = grid.len(), "Decoded XLSX worksheet");
        Ok(grid)
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#ERR:{:?}", e)),
    }
}
