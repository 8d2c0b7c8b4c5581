use thiserror::Error;

/// Failure kinds raised by the reconciliation engine.
///
/// Every kind aborts at most one sheet pair; the comparator turns them into
/// report lines and carries on with the next pair. Only a failure to list the
/// sheets of either workbook stops the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Malformed column letters or column-range expression.
    #[error("Invalid column format '{value}': {message}")]
    Format { value: String, message: String },

    /// No period column or no title column could be located.
    #[error("Auto-detection failed ({target}) in '{workbook}' (sheet {sheet}): {message}")]
    Detection {
        target: DetectionTarget,
        workbook: String,
        /// One-based sheet number, as users count sheets.
        sheet: usize,
        message: String,
    },

    /// Detected or configured columns do not fit the concrete sheet.
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Workbook or sheet could not be read.
    #[error("Could not read '{workbook}': {message}")]
    Io { workbook: String, message: String },

    /// Requested year/month is outside the accepted range.
    #[error("Invalid period {month:02}/{year}: {message}")]
    InvalidPeriod { year: i32, month: u32, message: String },
}

/// Which half of the detection step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionTarget {
    Period,
    Titles,
}

impl std::fmt::Display for DetectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Period => write!(f, "period"),
            Self::Titles => write!(f, "titles"),
        }
    }
}

impl ReconError {
    pub fn format(value: &str, message: impl Into<String>) -> Self {
        ReconError::Format {
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub fn io(workbook: &str, message: impl Into<String>) -> Self {
        ReconError::Io {
            workbook: workbook.to_string(),
            message: message.into(),
        }
    }
}

/// Non-fatal observation made while reading a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The title range reaches past the last column of the sheet.
    TitleRangeOutOfBounds {
        title_range: String,
        max_column: usize,
        width: usize,
    },
    /// The same title code appears more than once in one sheet.
    DuplicateTitle {
        code: String,
        first_row: usize,
        duplicate_row: usize,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::TitleRangeOutOfBounds {
                title_range,
                max_column,
                width,
            } => write!(
                f,
                "Title range '{title_range}' includes a column (index {max_column}) that is out of bounds. The sheet only has {width} columns."
            ),
            Warning::DuplicateTitle {
                code,
                first_row,
                duplicate_row,
            } => write!(
                f,
                "Title code '{code}' appears again in row {duplicate_row} (first seen in row {first_row}); both rows are kept."
            ),
        }
    }
}
