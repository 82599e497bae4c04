//! Spreadsheet output for collected articles.
//!
//! The table always starts with the fixed [`HEADER`] row, followed by one
//! row per [`ArticleRecord`] in extraction order.

use crate::error::SheetError;
use crate::models::ArticleRecord;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const OUTPUT_FILE_NAME: &str = "news_data.xlsx";
pub const SHEET_NAME: &str = "News";

pub const HEADER: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image Filename",
    "Search Phrase Count",
    "Contains Money",
];

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// A typed spreadsheet cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    DateTime(&'a NaiveDateTime),
    Count(usize),
    Flag(bool),
}

/// A single-sheet table that rows are appended to, then saved once.
pub trait Spreadsheet {
    fn append_row(&mut self, row: &[Cell<'_>]) -> Result<(), SheetError>;
    fn save(&mut self) -> Result<(), SheetError>;
}

/// [`Spreadsheet`] backed by an `.xlsx` workbook on disk.
pub struct XlsxSpreadsheet {
    workbook: Workbook,
    path: PathBuf,
    next_row: u32,
    date_format: Format,
}

impl XlsxSpreadsheet {
    /// Start a workbook with one sheet named `sheet_name`, to be saved at `path`.
    pub fn create(path: impl Into<PathBuf>, sheet_name: &str) -> Result<Self, SheetError> {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name(sheet_name)?;
        Ok(Self {
            workbook,
            path: path.into(),
            next_row: 0,
            date_format: Format::new().set_num_format(DATE_FORMAT),
        })
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn append_row(&mut self, row: &[Cell<'_>]) -> Result<(), SheetError> {
        let sheet = self.workbook.worksheet_from_index(0)?;
        let row_num = self.next_row;
        for (col, cell) in (0u16..).zip(row) {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row_num, col, *text)?;
                }
                Cell::DateTime(at) => {
                    sheet.write_datetime_with_format(row_num, col, *at, &self.date_format)?;
                }
                Cell::Count(n) => {
                    sheet.write_number(row_num, col, *n as f64)?;
                }
                Cell::Flag(flag) => {
                    sheet.write_boolean(row_num, col, *flag)?;
                }
            }
        }
        self.next_row += 1;
        Ok(())
    }

    fn save(&mut self) -> Result<(), SheetError> {
        self.workbook.save(&self.path)?;
        Ok(())
    }
}

fn record_row(record: &ArticleRecord) -> [Cell<'_>; 6] {
    [
        Cell::Text(&record.title),
        Cell::DateTime(&record.date),
        Cell::Text(&record.description),
        Cell::Text(&record.image_filename),
        Cell::Count(record.search_phrase_count),
        Cell::Flag(record.contains_money),
    ]
}

/// Write the header and one row per record, in order.
pub fn write_records<S: Spreadsheet>(
    sheet: &mut S,
    records: &[ArticleRecord],
) -> Result<(), SheetError> {
    sheet.append_row(&HEADER.map(Cell::Text))?;
    for record in records {
        sheet.append_row(&record_row(record))?;
    }
    Ok(())
}

/// Write `records` to `<output_dir>/news_data.xlsx` and return its path.
#[instrument(
    level = "info",
    skip_all,
    fields(output_dir = %output_dir.display(), count = records.len())
)]
pub fn save_news(output_dir: &Path, records: &[ArticleRecord]) -> Result<PathBuf, SheetError> {
    let path = output_dir.join(OUTPUT_FILE_NAME);
    let mut sheet = XlsxSpreadsheet::create(&path, SHEET_NAME)?;
    write_records(&mut sheet, records)?;
    sheet.save()?;
    info!(path = %path.display(), "Saved news data");
    Ok(path)
}
