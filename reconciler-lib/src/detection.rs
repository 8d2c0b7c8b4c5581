use serde::Serialize;
use std::ops::RangeInclusive;

use crate::columns::{column_to_index, format_column_range, index_to_column, parse_column_range};
use crate::error::{DetectionTarget, ReconError};
use crate::grid::{Cell, SheetGrid};
use crate::titles::normalize_title;
use crate::utils::parse_date_dayfirst;

/// Rows inspected by the detection scans.
pub const DETECTION_ROW_WINDOW: usize = 120;

/// Candidate band for the period header ("D" through "L").
pub const PERIOD_COLUMN_BAND: RangeInclusive<usize> = 3..=11;

/// Candidate band for title columns ("A" through "F").
pub const TITLE_COLUMN_BAND: RangeInclusive<usize> = 0..=5;

/// Where titles and period values live in one sheet.
///
/// `prior_column` is always `current_column + 1`. Neither column is checked
/// against the sheet here; extraction validates them against the concrete
/// grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionConfig {
    /// Inclusive bounding interval of the title columns.
    pub title_range: (usize, usize),
    pub current_column: usize,
    pub prior_column: usize,
}

impl DetectionConfig {
    pub fn new(title_range: (usize, usize), current_column: usize) -> Self {
        DetectionConfig {
            title_range,
            current_column,
            prior_column: current_column + 1,
        }
    }

    /// Build a fixed configuration from letters, e.g. ("A:F", "D").
    pub fn from_letters(title_range: &str, current_column: &str) -> Result<Self, ReconError> {
        let columns = parse_column_range(title_range)?;
        let (Some(&first), Some(&last)) = (columns.first(), columns.last()) else {
            return Err(ReconError::format(
                title_range,
                "title range must cover at least one column",
            ));
        };
        let current = column_to_index(current_column)?;
        Ok(DetectionConfig::new((first, last), current))
    }

    /// Title columns in scan order.
    pub fn title_columns(&self) -> Vec<usize> {
        (self.title_range.0..=self.title_range.1).collect()
    }

    pub fn title_range_letters(&self) -> String {
        format_column_range(self.title_range.0, self.title_range.1)
    }

    pub fn current_letters(&self) -> String {
        index_to_column(self.current_column)
    }

    pub fn prior_letters(&self) -> String {
        index_to_column(self.prior_column)
    }
}

/// Hit returned by [`scan_window`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit<T> {
    pub column: usize,
    pub row: usize,
    pub value: T,
}

/// Scan a bounded window column by column, top to bottom, and return the
/// first cell the probe accepts.
///
/// Columns past the grid's width are skipped. Only the first `row_window`
/// rows are visited.
pub fn scan_window<T>(
    grid: &SheetGrid,
    columns: impl IntoIterator<Item = usize>,
    row_window: usize,
    mut probe: impl FnMut(&Cell) -> Option<T>,
) -> Option<ScanHit<T>> {
    let rows = grid.height().min(row_window);
    for column in columns {
        if column >= grid.width() {
            continue;
        }
        for row in 0..rows {
            if let Some(value) = probe(grid.cell(row, column)) {
                return Some(ScanHit { column, row, value });
            }
        }
    }
    None
}

/// Locates period and title columns for one requested year/month.
#[derive(Debug, Clone)]
pub struct ColumnDetector {
    year: i32,
    month: u32,
    row_window: usize,
}

impl ColumnDetector {
    pub fn new(year: i32, month: u32) -> Self {
        ColumnDetector {
            year,
            month,
            row_window: DETECTION_ROW_WINDOW,
        }
    }

    pub fn with_row_window(mut self, row_window: usize) -> Self {
        self.row_window = row_window;
        self
    }

    /// Detect both halves of the configuration for one sheet.
    ///
    /// # Arguments
    /// * `grid` - The sheet, usually already capped to the detection window
    /// * `workbook` - Workbook label used in error messages
    /// * `sheet_index` - Zero-based sheet index used in error messages
    pub fn detect(
        &self,
        grid: &SheetGrid,
        workbook: &str,
        sheet_index: usize,
    ) -> Result<DetectionConfig, ReconError> {
        let (current_column, _) = self.detect_period_columns(grid, workbook, sheet_index)?;
        let title_range = self.detect_title_range(grid, workbook, sheet_index)?;
        Ok(DetectionConfig::new(title_range, current_column))
    }

    /// Find the column whose header dates to the requested period.
    ///
    /// A header such as "2024-01-01 - 2024-01-31" is judged by its end date.
    /// Returns (current, prior) where prior is the next column to the right.
    pub fn detect_period_columns(
        &self,
        grid: &SheetGrid,
        workbook: &str,
        sheet_index: usize,
    ) -> Result<(usize, usize), ReconError> {
        let hit = scan_window(grid, PERIOD_COLUMN_BAND, self.row_window, |cell| {
            self.header_matches_period(cell).then_some(())
        });

        match hit {
            Some(ScanHit { column, .. }) => Ok((column, column + 1)),
            None => Err(ReconError::Detection {
                target: DetectionTarget::Period,
                workbook: workbook.to_string(),
                sheet: sheet_index + 1,
                message: format!(
                    "no date column for {:02}/{} in columns {}",
                    self.month,
                    self.year,
                    band_letters(&PERIOD_COLUMN_BAND)
                ),
            }),
        }
    }

    /// Bounding interval of every candidate column holding at least one title.
    pub fn detect_title_range(
        &self,
        grid: &SheetGrid,
        workbook: &str,
        sheet_index: usize,
    ) -> Result<(usize, usize), ReconError> {
        let found: Vec<usize> = TITLE_COLUMN_BAND
            .filter(|&column| {
                scan_window(grid, [column], self.row_window, normalize_title).is_some()
            })
            .collect();

        match (found.iter().min(), found.iter().max()) {
            (Some(&min), Some(&max)) => Ok((min, max)),
            _ => Err(ReconError::Detection {
                target: DetectionTarget::Titles,
                workbook: workbook.to_string(),
                sheet: sheet_index + 1,
                message: format!(
                    "no column with titles in columns {}",
                    band_letters(&TITLE_COLUMN_BAND)
                ),
            }),
        }
    }

    fn header_matches_period(&self, cell: &Cell) -> bool {
        let text = cell.to_text();
        let end_date = text.split(" - ").last().unwrap_or_default().trim();
        match parse_date_dayfirst(end_date) {
            Some(date) => {
                use chrono::Datelike;
                date.year() == self.year && date.month() == self.month
            }
            None => false,
        }
    }
}

fn band_letters(band: &RangeInclusive<usize>) -> String {
    format!("{}-{}", index_to_column(*band.start()), index_to_column(*band.end()))
}
