mod dates;
mod datetime;
mod filesystem;

pub use dates::parse_date_dayfirst;
pub use datetime::get_utc_iso_datetime;
pub use filesystem::write_error_to_log_at;
