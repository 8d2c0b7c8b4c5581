use reconciler_lib::Cell;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::{Path, PathBuf};

// Re-export shared test utilities from src/test_utils.rs
#[allow(unused_imports)]
pub use reconciler_lib::test_utils::{num, statement_rows, text};

/// Cell written to a fixture workbook.
#[allow(dead_code)]
pub enum FixtureCell {
    Empty,
    Text(String),
    Number(f64),
    /// Real date cell (year, month, day), formatted as a date.
    Date(u16, u8, u8),
}

impl From<&Cell> for FixtureCell {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Empty => FixtureCell::Empty,
            Cell::Text(value) => FixtureCell::Text(value.clone()),
            Cell::Number(value) => FixtureCell::Number(*value),
        }
    }
}

/// Write an .xlsx file with one worksheet per (name, rows) entry.
///
/// Row and column zero map to cell A1 unless `origin` shifts them.
#[allow(dead_code)]
pub fn write_workbook(
    path: &Path,
    sheets: &[(&str, Vec<Vec<FixtureCell>>)],
    origin: (u32, u16),
) -> Result<(), anyhow::Error> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;

        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let row_num = origin.0 + r as u32;
                let col_num = origin.1 + c as u16;
                match cell {
                    FixtureCell::Empty => {}
                    FixtureCell::Text(value) => {
                        worksheet.write_string(row_num, col_num, value)?;
                    }
                    FixtureCell::Number(value) => {
                        worksheet.write_number(row_num, col_num, *value)?;
                    }
                    FixtureCell::Date(year, month, day) => {
                        let date = ExcelDateTime::from_ymd(*year, *month, *day)?;
                        worksheet.write_datetime_with_format(row_num, col_num, &date, &date_format)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Convert grid rows into fixture rows.
#[allow(dead_code)]
pub fn fixture_rows(rows: &[Vec<Cell>]) -> Vec<Vec<FixtureCell>> {
    rows.iter()
        .map(|row| row.iter().map(FixtureCell::from).collect())
        .collect()
}

/// Write a client and an output workbook, each with a single sheet, laid out
/// as usual statements for January 2024.
///
/// Output amounts are the given amounts multiplied by 1000.
#[allow(dead_code)]
pub fn write_statement_pair(
    dir: &Path,
    client_items: &[(&str, f64, f64)],
    output_items: &[(&str, f64, f64)],
) -> Result<(PathBuf, PathBuf), anyhow::Error> {
    let client_path = dir.join("client.xlsx");
    let output_path = dir.join("output.xlsx");

    write_workbook(
        &client_path,
        &[("Balance", fixture_rows(&statement_rows("2024-01-31", client_items, 1.0)))],
        (0, 0),
    )?;
    write_workbook(
        &output_path,
        &[("ESF", fixture_rows(&statement_rows("2024-01-31", output_items, 1000.0)))],
        (0, 0),
    )?;

    Ok((client_path, output_path))
}

/// Items of a small balance sheet used by the end-to-end scenarios.
#[allow(dead_code)]
pub fn balance_items() -> Vec<(&'static str, f64, f64)> {
    vec![
        ("1. Activos", 1500.0, 1400.0),
        ("1.1 Caja", 500.0, 450.0),
        ("1.2 Bancos", 1000.0, 950.0),
        ("2. Pasivos", 700.0, 600.0),
        ("2.1 Proveedores", 700.0, 600.0),
    ]
}
