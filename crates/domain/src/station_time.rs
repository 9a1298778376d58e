// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Station-local wall-clock handling.
//!
//! All trip and ticket times are naive station-local values. They are stored
//! as `YYYY-MM-DD HH:MM:SS` text so that lexical order matches chronological
//! order on every backend.
//!
//! The station's timezone is an IANA name resolved through `chrono-tz`; the
//! resulting local time is converted into a `time::PrimitiveDateTime`.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

/// Storage format for station-local date-times.
pub const STATION_DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Formats a station-local date-time for storage.
///
/// # Errors
///
/// Returns an error if the value cannot be formatted (e.g. a year outside
/// four digits).
pub fn format_station_datetime(value: PrimitiveDateTime) -> Result<String, DomainError> {
    value
        .format(STATION_DATETIME_FORMAT)
        .map_err(|e| DomainError::DateTimeParseError {
            value: value.to_string(),
            error: e.to_string(),
        })
}

/// Parses a stored station-local date-time.
///
/// # Errors
///
/// Returns an error if the string is not in `YYYY-MM-DD HH:MM:SS` form.
pub fn parse_station_datetime(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    PrimitiveDateTime::parse(value, STATION_DATETIME_FORMAT).map_err(|e| {
        DomainError::DateTimeParseError {
            value: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Returns midnight at the start of `date`.
#[must_use]
pub const fn start_of_day(date: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT)
}

/// Returns the exclusive upper bound of a whole-day range ending on `date`,
/// i.e. midnight of the following day.
///
/// # Errors
///
/// Returns an error if `date` is the last representable day.
pub fn end_of_day_exclusive(date: Date) -> Result<PrimitiveDateTime, DomainError> {
    let next: Date = date
        .checked_add(Duration::days(1))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing the day after {date}"),
        })?;
    Ok(start_of_day(next))
}

/// Resolves an IANA timezone name.
///
/// # Errors
///
/// Returns an error if the name is not a known zone.
pub fn parse_timezone(timezone: &str) -> Result<Tz, DomainError> {
    timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}

/// Converts a UTC instant into the station's local wall clock.
///
/// Sub-second precision is dropped, matching the storage format.
///
/// # Errors
///
/// Returns an error if the local calendar fields cannot be represented.
pub fn to_station_local(instant: DateTime<Utc>, tz: Tz) -> Result<PrimitiveDateTime, DomainError> {
    let local = instant.with_timezone(&tz).naive_local();

    let month_number: u8 =
        u8::try_from(local.month()).map_err(|_| DomainError::DateArithmeticOverflow {
            operation: String::from("converting local month"),
        })?;
    let month: Month =
        Month::try_from(month_number).map_err(|e| DomainError::DateTimeParseError {
            value: local.to_string(),
            error: e.to_string(),
        })?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("converting local day"),
    })?;

    let date: Date = Date::from_calendar_date(local.year(), month, day).map_err(|e| {
        DomainError::DateTimeParseError {
            value: local.to_string(),
            error: e.to_string(),
        }
    })?;

    let hour: u8 = u8::try_from(local.hour()).unwrap_or_default();
    let minute: u8 = u8::try_from(local.minute()).unwrap_or_default();
    let second: u8 = u8::try_from(local.second()).unwrap_or_default();
    let time: Time =
        Time::from_hms(hour, minute, second).map_err(|e| DomainError::DateTimeParseError {
            value: local.to_string(),
            error: e.to_string(),
        })?;

    Ok(PrimitiveDateTime::new(date, time))
}

/// Returns the current station-local wall-clock time.
///
/// # Errors
///
/// Returns an error if the local time cannot be represented.
pub fn station_now(tz: Tz) -> Result<PrimitiveDateTime, DomainError> {
    to_station_local(Utc::now(), tz)
}
