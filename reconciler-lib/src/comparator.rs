use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::ERRORS_LOG_FILE;
use crate::detection::{ColumnDetector, DETECTION_ROW_WINDOW, DetectionConfig};
use crate::error::{ReconError, Warning};
use crate::extraction::{Extraction, extract_records, find_start_row};
use crate::grid::{CalamineWorkbook, SheetGrid, WorkbookSource};
use crate::matcher::reconcile_records;
use crate::report::Report;
use crate::utils::write_error_to_log_at;

/// Sheet pairs compared when the caller does not give any, as zero-based
/// (client, output) indices.
pub const DEFAULT_SHEET_MAP: [(usize, usize); 3] = [(2, 1), (3, 2), (4, 3)];

/// Years accepted for the requested period.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1901..=2099;

/// Everything one reconciliation run needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub client_path: PathBuf,
    pub output_path: PathBuf,
    pub year: i32,
    pub month: u32,
    /// Ordered (client, output) zero-based sheet indices.
    pub sheet_map: Vec<(usize, usize)>,
    /// Fixed output-side layout; auto-detected when `None`.
    pub output_detection: Option<DetectionConfig>,
}

/// Builder for [`Comparator`]
pub struct ComparatorBuilder {
    client_path: PathBuf,
    output_path: PathBuf,
    year: i32,
    month: u32,
    sheet_map: Option<Vec<(usize, usize)>>,
    output_detection: Option<DetectionConfig>,
    row_window: usize,
    log_path: PathBuf,
}

impl ComparatorBuilder {
    /// Create a new ComparatorBuilder
    ///
    /// # Arguments
    /// * `client_path` - Workbook holding amounts in full currency units
    /// * `output_path` - Workbook whose amounts are divided by 1000 before comparison
    /// * `year` - Year of the requested period
    /// * `month` - Month of the requested period (1-12)
    pub fn new(
        client_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        year: i32,
        month: u32,
    ) -> Self {
        ComparatorBuilder {
            client_path: client_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            year,
            month,
            sheet_map: None,
            output_detection: None,
            row_window: DETECTION_ROW_WINDOW,
            log_path: PathBuf::from(ERRORS_LOG_FILE),
        }
    }

    pub fn sheet_map(mut self, sheet_map: Vec<(usize, usize)>) -> Self {
        self.sheet_map = Some(sheet_map);
        self
    }

    /// Skip detection on the output side and use this layout instead.
    pub fn output_config(mut self, config: DetectionConfig) -> Self {
        self.output_detection = Some(config);
        self
    }

    pub fn row_window(mut self, row_window: usize) -> Self {
        self.row_window = row_window;
        self
    }

    /// File that receives warnings and per-pair failures.
    pub fn error_log(mut self, log_path: impl AsRef<Path>) -> Self {
        self.log_path = log_path.as_ref().to_path_buf();
        self
    }

    /// Validate the period and sheet map and build the comparator.
    pub fn build(self) -> Result<Comparator, ReconError> {
        if !YEAR_RANGE.contains(&self.year) {
            return Err(ReconError::InvalidPeriod {
                year: self.year,
                month: self.month,
                message: format!(
                    "year must be between {} and {}",
                    YEAR_RANGE.start(),
                    YEAR_RANGE.end()
                ),
            });
        }
        if !(1..=12).contains(&self.month) {
            return Err(ReconError::InvalidPeriod {
                year: self.year,
                month: self.month,
                message: "month must be between 1 and 12".to_string(),
            });
        }

        let sheet_map = self
            .sheet_map
            .unwrap_or_else(|| DEFAULT_SHEET_MAP.to_vec());
        if sheet_map.is_empty() {
            return Err(ReconError::Configuration {
                message: "the sheet map must contain at least one sheet pair".to_string(),
            });
        }

        Ok(Comparator {
            detector: ColumnDetector::new(self.year, self.month).with_row_window(self.row_window),
            row_window: self.row_window,
            log_path: self.log_path,
            config: RunConfig {
                client_path: self.client_path,
                output_path: self.output_path,
                year: self.year,
                month: self.month,
                sheet_map,
                output_detection: self.output_detection,
            },
        })
    }
}

/// Runs detection, extraction and matching over every configured sheet pair.
pub struct Comparator {
    config: RunConfig,
    detector: ColumnDetector,
    row_window: usize,
    log_path: PathBuf,
}

/// Both sides of one sheet pair, read and laid out.
struct PreparedPair {
    client_grid: SheetGrid,
    client_config: DetectionConfig,
    output_grid: SheetGrid,
    output_config: DetectionConfig,
}

impl Comparator {
    //////////////////////////////////////////////////////////////
    ///  Public API
    //////////////////////////////////////////////////////////////

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Open both workbooks from disk and compare them.
    ///
    /// A workbook that cannot be opened produces a report with a single
    /// critical line.
    pub fn run(&self) -> Report {
        let opened = CalamineWorkbook::open(&self.config.client_path).and_then(|client| {
            CalamineWorkbook::open(&self.config.output_path).map(|output| (client, output))
        });

        match opened {
            Ok((mut client, mut output)) => self.compare(&mut client, &mut output),
            Err(e) => self.critical_report(&e),
        }
    }

    /// Compare two already opened workbooks, sheet pair by sheet pair.
    ///
    /// Per-pair failures become report lines and the run moves on; only a
    /// failure to list the sheets of either workbook ends the run early.
    pub fn compare<C, O>(&self, client: &mut C, output: &mut O) -> Report
    where
        C: WorkbookSource,
        O: WorkbookSource,
    {
        let names = client
            .sheet_names()
            .and_then(|client_names| output.sheet_names().map(|output_names| (client_names, output_names)));

        let (client_names, output_names) = match names {
            Ok(names) => names,
            Err(e) => return self.critical_report(&e),
        };

        let mut report = Report::new();
        for &(client_sheet, output_sheet) in &self.config.sheet_map {
            self.compare_pair(
                client,
                output,
                (client_sheet, client_names.get(client_sheet)),
                (output_sheet, output_names.get(output_sheet)),
                &mut report,
            );
        }

        return report;
    }

    //////////////////////////////////////////////////////////////
    ///  Private helpers
    //////////////////////////////////////////////////////////////

    fn critical_report(&self, error: &ReconError) -> Report {
        let message = format!("CRITICAL ERROR: could not open one of the workbooks. Detail: {error}");
        write_error_to_log_at(&self.log_path, "Workbook Open Error", &message);

        let mut report = Report::new();
        report.critical(message);
        report
    }

    fn compare_pair<C, O>(
        &self,
        client: &mut C,
        output: &mut O,
        (client_sheet, client_name): (usize, Option<&String>),
        (output_sheet, output_name): (usize, Option<&String>),
        report: &mut Report,
    ) where
        C: WorkbookSource,
        O: WorkbookSource,
    {
        let context = match (client_name, output_name) {
            (Some(client_name), Some(output_name)) => {
                format!("Sheet '{client_name}' vs Sheet '{output_name}'")
            }
            _ => format!(
                "(Client sheet idx {} vs Output sheet idx {})",
                client_sheet + 1,
                output_sheet + 1
            ),
        };

        let prepared = match (client_name, output_name) {
            (None, _) => Err(missing_sheet(&client.label(), client_sheet)),
            (_, None) => Err(missing_sheet(&output.label(), output_sheet)),
            _ => self.prepare_pair(client, client_sheet, output, output_sheet, report),
        };
        let pair = match prepared {
            Ok(pair) => pair,
            Err(e) => return self.pair_error(&context, &e, report),
        };

        let Some(client_start) = find_start_row(&pair.client_grid, &pair.client_config.title_columns())
        else {
            return self.pair_warning(&format!("WARNING: no titles found in {context} (Client)."), report);
        };
        let Some(output_start) = find_start_row(&pair.output_grid, &pair.output_config.title_columns())
        else {
            return self.pair_warning(&format!("WARNING: no titles found in {context} (Output)."), report);
        };

        let extracted = extract_records(&pair.client_grid, client_start, &pair.client_config).and_then(
            |client_records| {
                extract_records(&pair.output_grid, output_start, &pair.output_config)
                    .map(|output_records| (client_records, output_records))
            },
        );
        let (client_records, output_records) = match extracted {
            Ok(records) => records,
            Err(e) => return self.pair_error(&context, &e, report),
        };

        self.extraction_warnings(&context, "Client", &client_records, report);
        self.extraction_warnings(&context, "Output", &output_records, report);

        if client_records.records.is_empty() {
            return self.pair_warning(&format!("WARNING: no data extracted from Client in {context}."), report);
        }
        if output_records.records.is_empty() {
            return self.pair_warning(&format!("WARNING: no data extracted from Output in {context}."), report);
        }

        reconcile_records(&context, &client_records.records, &output_records.records, report);
    }

    /// Detect both layouts on capped reads, then read both sheets in full.
    fn prepare_pair<C, O>(
        &self,
        client: &mut C,
        client_sheet: usize,
        output: &mut O,
        output_sheet: usize,
        report: &mut Report,
    ) -> Result<PreparedPair, ReconError>
    where
        C: WorkbookSource,
        O: WorkbookSource,
    {
        let client_window = client.sheet(client_sheet, Some(self.row_window))?;
        let client_config = self
            .detector
            .detect(&client_window, &client.label(), client_sheet)?;
        report.progress(format!(
            "  -> Client OK: titles in '{}', current in '{}'",
            client_config.title_range_letters(),
            client_config.current_letters()
        ));

        let output_config = match &self.config.output_detection {
            Some(fixed) => {
                report.progress(format!(
                    "  -> Output uses fixed layout: titles in '{}', current in '{}'",
                    fixed.title_range_letters(),
                    fixed.current_letters()
                ));
                fixed.clone()
            }
            None => {
                let output_window = output.sheet(output_sheet, Some(self.row_window))?;
                let detected = self
                    .detector
                    .detect(&output_window, &output.label(), output_sheet)?;
                report.progress(format!(
                    "  -> Output OK: titles in '{}', current in '{}'",
                    detected.title_range_letters(),
                    detected.current_letters()
                ));
                detected
            }
        };

        Ok(PreparedPair {
            client_grid: client.sheet(client_sheet, None)?,
            client_config,
            output_grid: output.sheet(output_sheet, None)?,
            output_config,
        })
    }

    fn extraction_warnings(
        &self,
        context: &str,
        side: &str,
        extraction: &Extraction,
        report: &mut Report,
    ) {
        for warning in &extraction.warnings {
            let message = format!("WARNING: [{context}] ({side}) {warning}");
            match warning {
                // Columns past the sheet edge read as empty; log it but keep it out of the findings
                Warning::TitleRangeOutOfBounds { .. } => {
                    write_error_to_log_at(&self.log_path, "Sheet Pair Warning", &message);
                    report.progress(message);
                }
                Warning::DuplicateTitle { .. } => self.pair_warning(&message, report),
            }
        }
    }

    fn pair_warning(&self, message: &str, report: &mut Report) {
        write_error_to_log_at(&self.log_path, "Sheet Pair Warning", message);
        report.warning(message);
    }

    fn pair_error(&self, context: &str, error: &ReconError, report: &mut Report) {
        let message = format!("ERROR: could not process/detect {context}. Detail: {error}");
        write_error_to_log_at(&self.log_path, "Sheet Pair Error", &message);
        report.error(message);
    }
}

fn missing_sheet(workbook: &str, index: usize) -> ReconError {
    ReconError::io(workbook, format!("sheet {} does not exist", index + 1))
}
