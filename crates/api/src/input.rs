// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of the string fields carried by requests.

use bus_station_domain::{PaymentType, parse_station_datetime};
use num_traits::ToPrimitive;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time, Weekday};

use crate::error::{ApiError, translate_domain_error};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MINUTE_DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");
const TIME_WITH_SECONDS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| {
        ApiError::invalid(field, format!("Invalid date '{value}': {e}. Expected YYYY-MM-DD"))
    })
}

/// Parses a station-local `YYYY-MM-DD HH:MM[:SS]` date-time.
pub fn parse_datetime(field: &str, value: &str) -> Result<PrimitiveDateTime, ApiError> {
    let trimmed: &str = value.trim();
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, MINUTE_DATETIME_FORMAT) {
        return Ok(parsed);
    }
    parse_station_datetime(trimmed).map_err(|e| ApiError::invalid(field, e.to_string()))
}

/// Parses an `HH:MM[:SS]` time of day.
pub fn parse_time(field: &str, value: &str) -> Result<Time, ApiError> {
    let trimmed: &str = value.trim();
    Time::parse(trimmed, TIME_FORMAT)
        .or_else(|_| Time::parse(trimmed, TIME_WITH_SECONDS_FORMAT))
        .map_err(|e| {
            ApiError::invalid(field, format!("Invalid time '{value}': {e}. Expected HH:MM"))
        })
}

/// Parses an English weekday name or its three-letter abbreviation.
pub fn parse_weekday(value: &str) -> Result<Weekday, ApiError> {
    let lower: String = value.trim().to_lowercase();
    let weekday: Weekday = match lower.as_str() {
        "monday" | "mon" => Weekday::Monday,
        "tuesday" | "tue" => Weekday::Tuesday,
        "wednesday" | "wed" => Weekday::Wednesday,
        "thursday" | "thu" => Weekday::Thursday,
        "friday" | "fri" => Weekday::Friday,
        "saturday" | "sat" => Weekday::Saturday,
        "sunday" | "sun" => Weekday::Sunday,
        _ => {
            return Err(ApiError::invalid(
                "days_of_week",
                format!("Unknown weekday '{value}'"),
            ));
        }
    };
    Ok(weekday)
}

/// Parses a list of weekday names, dropping repeats.
pub fn parse_weekdays(values: &[String]) -> Result<Vec<Weekday>, ApiError> {
    let mut weekdays: Vec<Weekday> = Vec::with_capacity(values.len());
    for value in values {
        let weekday: Weekday = parse_weekday(value)?;
        if !weekdays.contains(&weekday) {
            weekdays.push(weekday);
        }
    }
    Ok(weekdays)
}

/// Parses a payment type.
pub fn parse_payment_type(value: &str) -> Result<PaymentType, ApiError> {
    value.parse().map_err(translate_domain_error)
}

/// Parses a comma-separated list of ids. Blank input gives an empty list.
///
/// # Errors
///
/// Returns `InvalidInput` naming `field` if any part is not an integer.
pub fn parse_id_list(field: &str, value: &str) -> Result<Vec<i64>, ApiError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ApiError::invalid(field, format!("Invalid id '{part}'")))
        })
        .collect()
}

/// Narrows a request count to `u32`, rejecting negatives.
pub fn to_count(field: &str, value: i64) -> Result<u32, ApiError> {
    value
        .to_u32()
        .ok_or_else(|| ApiError::invalid(field, format!("{value} is out of range")))
}
