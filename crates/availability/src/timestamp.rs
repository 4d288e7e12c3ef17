use chrono::{NaiveDate, NaiveTime};

use crate::prelude::AvailabilityError;

/// Reorders a service timestamp `MM/DD/YYYY HH:MM[:SS]` into ISO 8601 date
/// order, `YYYY-MM-DD HH:MM[:SS]`.
///
/// Every field must be zero padded so the output sorts chronologically as a
/// string. The time of day is carried over verbatim; no timezone conversion
/// happens.
pub fn to_iso8601(raw: &str) -> Result<String, AvailabilityError> {
    let malformed = |reason| AvailabilityError::MalformedTimestamp {
        raw: raw.to_owned(),
        reason,
    };

    let (date, time) = raw
        .split_once(' ')
        .ok_or_else(|| malformed("expected `<date> <time>`"))?;

    let mut parts = date.split('/');
    let (Some(month), Some(day), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed("expected a `MM/DD/YYYY` date"));
    };

    if [(month, 2), (day, 2), (year, 4)]
        .iter()
        .any(|(part, width)| part.len() != *width || !is_digits(part))
    {
        return Err(malformed("expected a zero padded `MM/DD/YYYY` date"));
    }

    if NaiveDate::parse_from_str(date, "%m/%d/%Y").is_err() {
        return Err(malformed("date is not on the calendar"));
    }

    let time_format = match time.len() {
        5 => "%H:%M",
        8 => "%H:%M:%S",
        _ => return Err(malformed("expected a `HH:MM` or `HH:MM:SS` time")),
    };

    let padded = time
        .split(':')
        .all(|field| field.len() == 2 && is_digits(field));
    if !padded || NaiveTime::parse_from_str(time, time_format).is_err() {
        return Err(malformed("expected a `HH:MM` or `HH:MM:SS` time"));
    }

    Ok(format!("{year}-{month}-{day} {time}"))
}

fn is_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}
