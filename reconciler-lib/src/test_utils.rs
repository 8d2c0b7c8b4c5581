// Test utilities available to both unit and integration tests
// Only compiled when testing

use crate::grid::{Cell, SheetGrid};
use crate::values::OUTPUT_SCALE;

/// Header written above the prior-period column of every statement.
pub const PRIOR_PERIOD_HEADER: &str = "2023-12-31";

pub fn text(value: &str) -> Cell {
    Cell::from(value)
}

pub fn num(value: f64) -> Cell {
    Cell::Number(value)
}

/// Rows of a statement laid out the usual way: a heading row with the period
/// headers in D and E, then one row per item with its title in A.
///
/// # Arguments
/// * `period_header` - Header of the current-period column, e.g. "2024-01-31"
/// * `items` - (title, current, prior) per row
/// * `scale` - Factor applied to every amount
pub fn statement_rows(period_header: &str, items: &[(&str, f64, f64)], scale: f64) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![
        text("Estado de situación financiera"),
        Cell::Empty,
        Cell::Empty,
        text(period_header),
        text(PRIOR_PERIOD_HEADER),
    ]];

    for (title, current, prior) in items {
        rows.push(vec![
            text(title),
            Cell::Empty,
            Cell::Empty,
            num(current * scale),
            num(prior * scale),
        ]);
    }

    rows
}

/// Client-side statement: amounts as given.
pub fn client_statement(period_header: &str, items: &[(&str, f64, f64)]) -> SheetGrid {
    SheetGrid::from_rows(statement_rows(period_header, items, 1.0))
}

/// Output-side statement: every amount multiplied by the output scale.
pub fn output_statement(period_header: &str, items: &[(&str, f64, f64)]) -> SheetGrid {
    SheetGrid::from_rows(statement_rows(period_header, items, OUTPUT_SCALE))
}
