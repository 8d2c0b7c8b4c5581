use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::utils::get_utc_iso_datetime;

/// Centralized function to write warnings and per-sheet failures to an errors log file
///
/// Logging is best effort: a log file that cannot be opened is skipped.
///
/// # Arguments
/// * `log_path` - Log file to append to, usually [`crate::ERRORS_LOG_FILE`]
/// * `error_type` - A description of the error type/category (e.g., "Sheet Pair Detection Error")
/// * `error_message` - The actual error message content
pub fn write_error_to_log_at(log_path: &Path, error_type: &str, error_message: &str) {
    let timestamp = get_utc_iso_datetime();
    let log_entry = format!("\n[{}] {}:\n{}\n", timestamp, error_type, error_message);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        let _ = writeln!(file, "{}", log_entry);
    }
}
