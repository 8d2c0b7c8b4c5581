//! Spreadsheet column letters <-> zero-based indices.
//!
//! Letters are a bijective base-26 numeral (A=1 .. Z=26, no zero digit), so
//! the column after "Z" is "AA".

use crate::error::ReconError;

/// Convert column letters ("A", "aa", "XFD") into a zero-based index.
pub fn column_to_index(letters: &str) -> Result<usize, ReconError> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(ReconError::format(letters, "column letters are empty"));
    }

    let mut number: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(ReconError::format(
                letters,
                format!("'{ch}' is not a column letter"),
            ));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| ReconError::format(letters, "column index overflows"))?;
    }

    Ok(number - 1)
}

/// Convert a zero-based index back into column letters.
pub fn index_to_column(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Expand a range such as "C:H" into every index it covers, in order.
pub fn parse_column_range(range: &str) -> Result<Vec<usize>, ReconError> {
    let mut parts = range.split(':');
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ReconError::format(
            range,
            "expected exactly one ':' separator, e.g. 'A:F'",
        ));
    };

    let start = column_to_index(start).map_err(|e| with_range(range, e))?;
    let end = column_to_index(end).map_err(|e| with_range(range, e))?;

    Ok((start..=end).collect())
}

/// Render an inclusive index interval as "A:F".
pub fn format_column_range(start: usize, end: usize) -> String {
    format!("{}:{}", index_to_column(start), index_to_column(end))
}

fn with_range(range: &str, error: ReconError) -> ReconError {
    match error {
        ReconError::Format { message, .. } => ReconError::format(range, message),
        other => other,
    }
}
