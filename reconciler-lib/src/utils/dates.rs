use chrono::NaiveDate;

/// Month-name formats with an explicit day. `%B` accepts both the full and
/// the abbreviated English month name when parsing.
const NAMED_MONTH_FORMATS: [&str; 2] = ["%d %B %Y", "%B %d %Y"];

/// Parse a header cell's text as a calendar date, resolving ambiguous
/// numeric dates day-first.
///
/// Year-first text always reads year-month-day. When the day-first reading of
/// a numeric date is impossible ("12/31/2024") the month-first reading is
/// used. An optional trailing time ("2024-01-31 00:00:00") is ignored. Text
/// that is not recognisably a date (plain numbers, labels) returns `None`.
pub fn parse_date_dayfirst(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    // Plain numbers are amounts, not dates
    if text.is_empty() || text.parse::<f64>().is_ok() {
        return None;
    }

    let date_part = strip_time(text);

    if let Some(parts) = numeric_parts(date_part) {
        return resolve_numeric(parts);
    }
    if let Some(date) = month_year(date_part) {
        return Some(date);
    }

    parse_named_month(date_part)
}

/// "31 January 2024", "31-Jan-2024", "January 31, 2024", "Jan-2024".
fn parse_named_month(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ' ' || c == '-' || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    // The year must be spelled out in full
    let year = tokens.last()?;
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    match tokens.len() {
        // Month and year only: the day defaults to the first
        2 => NaiveDate::parse_from_str(&format!("1 {} {}", tokens[0], tokens[1]), "%d %B %Y").ok(),
        3 => {
            let joined = tokens.join(" ");
            NAMED_MONTH_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&joined, format).ok())
        }
        _ => None,
    }
}

/// Split "31/01/2024", "2024-01-31" or "31.01.24" into its three digit runs.
fn numeric_parts(text: &str) -> Option<[&str; 3]> {
    let parts = digit_runs(text)?;
    match parts[..] {
        [a, b, c] => Some([a, b, c]),
        _ => None,
    }
}

/// Digit runs of a numeric date, split on its first separator.
fn digit_runs(text: &str) -> Option<Vec<&str>> {
    let separator = text.chars().find(|c| matches!(c, '/' | '-' | '.'))?;
    let parts: Vec<&str> = text.split(separator).collect();
    let all_digits = parts
        .iter()
        .all(|p| !p.is_empty() && p.len() <= 4 && p.chars().all(|c| c.is_ascii_digit()));
    if all_digits { Some(parts) } else { None }
}

/// "01/2024", "1-2024", "2024-01" or "2024/01": the first day of that month.
fn month_year(text: &str) -> Option<NaiveDate> {
    let parts = digit_runs(text)?;
    let [first, second] = parts[..] else {
        return None;
    };
    let (year, month) = match (first.len(), second.len()) {
        (4, 1..=2) => (first, second),
        (1..=2, 4) => (second, first),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn resolve_numeric(parts: [&str; 3]) -> Option<NaiveDate> {
    let [a, b, c] = parts;
    let (na, nb, nc): (u32, u32, u32) = (a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);

    if a.len() == 4 {
        return NaiveDate::from_ymd_opt(na as i32, nb, nc);
    }

    let year = match c.len() {
        4 => nc as i32,
        2 => expand_two_digit_year(nc),
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, nb, na).or_else(|| NaiveDate::from_ymd_opt(year, na, nb))
}

fn expand_two_digit_year(year: u32) -> i32 {
    if year < 70 {
        2000 + year as i32
    } else {
        1900 + year as i32
    }
}

fn strip_time(text: &str) -> &str {
    for separator in [' ', 'T'] {
        if let Some((date, time)) = text.split_once(separator) {
            if time.contains(':') && !date.is_empty() {
                return date;
            }
        }
    }
    text
}
