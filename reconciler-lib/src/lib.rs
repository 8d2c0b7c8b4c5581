#![allow(clippy::needless_return)]

mod columns;
mod comparator;
mod detection;
mod error;
mod extraction;
mod grid;
mod matcher;
mod report;
mod titles;
mod values;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use columns::{column_to_index, format_column_range, index_to_column, parse_column_range};
pub use comparator::{Comparator, ComparatorBuilder, DEFAULT_SHEET_MAP, RunConfig, YEAR_RANGE};
pub use detection::{
    ColumnDetector, DETECTION_ROW_WINDOW, DetectionConfig, PERIOD_COLUMN_BAND, ScanHit,
    TITLE_COLUMN_BAND, scan_window,
};
pub use error::{DetectionTarget, ReconError, Warning};
pub use extraction::{Extraction, Record, extract_records, find_start_row};
pub use grid::{
    CalamineWorkbook, Cell, InMemoryWorkbook, SheetGrid, WorkbookSource, data_to_cell,
    format_number, range_to_grid,
};
pub use matcher::{MatchKind, MatchOutcome, MatchedPair, match_records, reconcile_records};
pub use report::{INCONSISTENCIES_HEADER, LineKind, NO_INCONSISTENCIES_MESSAGE, Report, ReportLine};
pub use titles::{TitleKey, normalize_title, normalize_title_text};
pub use values::{Discrepancy, OUTPUT_SCALE, Period, compare_values, round_client, scale_output};

pub const ERRORS_LOG_FILE: &str = "errors.log";
