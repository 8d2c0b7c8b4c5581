use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::ReconError;

/// A single worksheet cell as the engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text form used by the period-header scan.
    ///
    /// Whole numbers render without a fractional part, empty cells as "".
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
        }
    }

    /// Numeric coercion used for period values.
    ///
    /// Numbers pass through, numeric-looking text is parsed, everything else
    /// is absent. Absent is never folded into zero here.
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => return None,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.is_finite() { Some(value) } else { None }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Render a number the way report lines show amounts.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Rectangular, row-major grid of cells anchored at A1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl SheetGrid {
    /// Build a grid from ragged rows; short rows are padded with empty cells.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        SheetGrid { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at (row, col); anything outside the grid reads as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Copy of the first `max_rows` rows (or the whole grid if shorter).
    pub fn truncated(&self, max_rows: usize) -> SheetGrid {
        SheetGrid {
            rows: self.rows.iter().take(max_rows).cloned().collect(),
            width: self.width,
        }
    }
}

/// Source of sheet names and sheet grids for one workbook.
///
/// Sheet indices are zero-based. `row_cap` limits how many rows are read
/// for the bounded detection scans.
pub trait WorkbookSource {
    /// Label used in diagnostics (usually the file name).
    fn label(&self) -> String;

    fn sheet_names(&mut self) -> Result<Vec<String>, ReconError>;

    fn sheet(&mut self, index: usize, row_cap: Option<usize>) -> Result<SheetGrid, ReconError>;
}

//////////////////////////////////////////////////////////////
///  Calamine-backed workbooks
//////////////////////////////////////////////////////////////

/// Workbook read from disk through calamine (xlsx, xls, xlsb, ods).
pub struct CalamineWorkbook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        let workbook = open_workbook_auto(path).map_err(|e| {
            ReconError::io(&display_name(path), format!("failed to open workbook: {e}"))
        })?;
        Ok(CalamineWorkbook {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn label(&self) -> String {
        display_name(&self.path)
    }

    fn sheet_names(&mut self) -> Result<Vec<String>, ReconError> {
        Ok(self.workbook.sheet_names())
    }

    fn sheet(&mut self, index: usize, row_cap: Option<usize>) -> Result<SheetGrid, ReconError> {
        let label = self.label();
        let range = match self.workbook.worksheet_range_at(index) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                return Err(ReconError::io(
                    &label,
                    format!("error reading sheet {}: {e}", index + 1),
                ));
            }
            None => {
                return Err(ReconError::io(
                    &label,
                    format!("sheet {} does not exist", index + 1),
                ));
            }
        };

        let grid = range_to_grid(&range);
        Ok(match row_cap {
            Some(cap) => grid.truncated(cap),
            None => grid,
        })
    }
}

/// Convert a calamine range into a grid anchored at A1.
///
/// Calamine ranges begin at the first used cell, so leading empty rows and
/// columns are restored to keep column letters meaningful.
pub fn range_to_grid(range: &Range<Data>) -> SheetGrid {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().map(data_to_cell));
        rows.push(cells);
    }

    SheetGrid::from_rows(rows)
}

/// Map a calamine cell onto the engine's three-state cell.
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match excel_serial_to_chrono(dt.as_f64()) {
            Some(datetime) => Cell::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            // Serial outside chrono's calendar: keep the raw number
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn excel_serial_to_chrono(value: f64) -> Option<chrono::NaiveDateTime> {
    use chrono::{NaiveDate, TimeDelta};
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    excel_base
        .checked_add_signed(TimeDelta::try_days(days)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

//////////////////////////////////////////////////////////////
///  In-memory workbooks
//////////////////////////////////////////////////////////////

/// Workbook held in memory as named grids.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    label: String,
    sheets: Vec<(String, SheetGrid)>,
}

impl InMemoryWorkbook {
    pub fn new(label: &str) -> Self {
        InMemoryWorkbook {
            label: label.to_string(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, name: &str, grid: SheetGrid) -> Self {
        self.sheets.push((name.to_string(), grid));
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn sheet_names(&mut self) -> Result<Vec<String>, ReconError> {
        Ok(self.sheets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn sheet(&mut self, index: usize, row_cap: Option<usize>) -> Result<SheetGrid, ReconError> {
        let (_, grid) = self.sheets.get(index).ok_or_else(|| {
            ReconError::io(&self.label, format!("sheet {} does not exist", index + 1))
        })?;
        Ok(match row_cap {
            Some(cap) => grid.truncated(cap),
            None => grid.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_number() {
        assert_eq!(Cell::Number(12.5).to_number(), Some(12.5));
        assert_eq!(Cell::from(" 1500 ").to_number(), Some(1500.0));
        assert_eq!(Cell::from("-3.25").to_number(), Some(-3.25));
        assert_eq!(Cell::from("1,500").to_number(), None);
        assert_eq!(Cell::from("n/a").to_number(), None);
        assert_eq!(Cell::Empty.to_number(), None);
        assert_eq!(Cell::Number(f64::NAN).to_number(), None);
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(Cell::Number(45322.0).to_text(), "45322");
        assert_eq!(Cell::Number(1.5).to_text(), "1.5");
        assert_eq!(Cell::Empty.to_text(), "");
        assert_eq!(Cell::from("2024-01-31").to_text(), "2024-01-31");
    }

    #[test]
    fn test_grid_pads_ragged_rows() {
        let grid = SheetGrid::from_rows(vec![
            vec![Cell::from("a")],
            vec![Cell::Empty, Cell::Empty, Cell::Number(3.0)],
        ]);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(0, 2), &Cell::Empty);
        assert_eq!(grid.cell(1, 2), &Cell::Number(3.0));
        assert_eq!(grid.cell(10, 10), &Cell::Empty);
    }

    #[test]
    fn test_truncated_keeps_width() {
        let grid = SheetGrid::from_rows(vec![vec![Cell::Number(1.0); 4]; 10]);
        let head = grid.truncated(3);
        assert_eq!(head.height(), 3);
        assert_eq!(head.width(), 4);
        assert_eq!(grid.truncated(50).height(), 10);
    }

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(data_to_cell(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(data_to_cell(&Data::Bool(true)), Cell::from("TRUE"));
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(
            data_to_cell(&Data::String("1.1 Caja".to_string())),
            Cell::from("1.1 Caja")
        );
    }

    #[test]
    fn test_excel_serial_to_chrono() {
        // 45322 is 2024-01-31
        let dt = excel_serial_to_chrono(45322.0).unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-31 00:00:00");
        let noon = excel_serial_to_chrono(45322.5).unwrap();
        assert_eq!(noon.format("%H:%M").to_string(), "12:00");
        assert_eq!(excel_serial_to_chrono(150000000.0), None);
        assert_eq!(excel_serial_to_chrono(-1e18), None);
    }

    #[test]
    fn test_out_of_calendar_date_cell_keeps_its_number() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};
        let far_future = ExcelDateTime::new(150000000.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            data_to_cell(&Data::DateTime(far_future)),
            Cell::Number(150000000.0)
        );
        let in_range = ExcelDateTime::new(45322.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            data_to_cell(&Data::DateTime(in_range)),
            Cell::from("2024-01-31 00:00:00")
        );
    }

    #[test]
    fn test_in_memory_workbook_missing_sheet_is_io_error() {
        let mut workbook = InMemoryWorkbook::new("client.xlsx")
            .with_sheet("Balance", SheetGrid::default());
        assert_eq!(workbook.sheet_names().unwrap(), vec!["Balance".to_string()]);
        assert!(matches!(workbook.sheet(3, None), Err(ReconError::Io { .. })));
    }
}
