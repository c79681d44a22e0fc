use chrono::NaiveDate;

use crate::errors::{CoreResult, TournamentError};

/// Parses a calendar date written either `DD-MM-YYYY` or `YYYY-MM-DD`.
pub fn parse_date(field: &'static str, date_str: &str) -> CoreResult<NaiveDate> {
    let trimmed = date_str.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d-%m-%Y") {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    Err(TournamentError::invalid_record(
        field,
        format!("'{}' is not a DD-MM-YYYY or YYYY-MM-DD date", trimmed),
    ))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
