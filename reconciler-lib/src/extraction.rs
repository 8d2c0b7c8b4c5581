use serde::Serialize;
use std::collections::HashMap;

use crate::detection::DetectionConfig;
use crate::error::{ReconError, Warning};
use crate::grid::{Cell, SheetGrid};
use crate::titles::normalize_title;

/// One extracted line item.
///
/// Values stay `None` when the cell is empty or not numeric; absence is only
/// folded into zero when amounts are compared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub code: String,
    pub label: String,
    /// Title text exactly as found in the cell, trimmed.
    pub full_title: String,
    pub current_value: Option<f64>,
    pub prior_value: Option<f64>,
    /// One-based row number in the source sheet.
    pub source_row: usize,
}

/// Records read from one sheet plus the soft warnings raised on the way.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub warnings: Vec<Warning>,
}

/// Index of the first row (whole sheet, no window) holding a title in any of
/// `title_columns`. `None` when the sheet has no titles at all.
pub fn find_start_row(grid: &SheetGrid, title_columns: &[usize]) -> Option<usize> {
    (0..grid.height()).find(|&row| {
        title_columns
            .iter()
            .filter(|&&column| column < grid.width())
            .any(|&column| normalize_title(grid.cell(row, column)).is_some())
    })
}

/// Walk the sheet from `start_row` and emit one record per titled row.
///
/// Rows without a title are skipped. Fails with a configuration error when
/// the period columns fall outside the sheet; a title range reaching past the
/// sheet only produces a warning.
pub fn extract_records(
    grid: &SheetGrid,
    start_row: usize,
    config: &DetectionConfig,
) -> Result<Extraction, ReconError> {
    let width = grid.width();
    if config.current_column >= width || config.prior_column >= width {
        return Err(ReconError::Configuration {
            message: format!(
                "period columns (current: {}, prior: {}) are out of bounds. The sheet only has {} columns.",
                config.current_letters(),
                config.prior_letters(),
                width
            ),
        });
    }

    let mut extraction = Extraction::default();

    let title_columns = config.title_columns();
    if config.title_range.1 >= width {
        extraction.warnings.push(Warning::TitleRangeOutOfBounds {
            title_range: config.title_range_letters(),
            max_column: config.title_range.1,
            width,
        });
    }

    // First row each code was seen in, for duplicate reporting
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for row in start_row..grid.height() {
        let Some((key, full_title)) = title_columns
            .iter()
            .filter(|&&column| column < width)
            .find_map(|&column| {
                let cell = grid.cell(row, column);
                let key = normalize_title(cell)?;
                let Cell::Text(text) = cell else {
                    return None;
                };
                Some((key, text.trim().to_string()))
            })
        else {
            continue;
        };

        let source_row = row + 1;
        match first_seen.get(&key.code) {
            Some(&first_row) => extraction.warnings.push(Warning::DuplicateTitle {
                code: key.code.clone(),
                first_row,
                duplicate_row: source_row,
            }),
            None => {
                first_seen.insert(key.code.clone(), source_row);
            }
        }

        extraction.records.push(Record {
            code: key.code,
            label: key.label,
            full_title,
            current_value: grid.cell(row, config.current_column).to_number(),
            prior_value: grid.cell(row, config.prior_column).to_number(),
            source_row,
        });
    }

    Ok(extraction)
}
