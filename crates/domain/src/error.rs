// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The first day of the range.
        start: time::Date,
        /// The last day of the range.
        end: time::Date,
    },
    /// A weekly recurrence was requested without any weekdays.
    NoWeekdaysSelected,
    /// A ticket quantity must be positive.
    InvalidQuantity {
        /// The rejected quantity.
        quantity: u32,
    },
    /// Payment type is missing or unknown.
    InvalidPaymentType(String),
    /// Ticket status string is unknown.
    InvalidTicketStatus(String),
    /// Trip status string is unknown.
    InvalidTripStatus(String),
    /// City name is empty or invalid.
    InvalidCityName(String),
    /// Route distance or duration is invalid.
    InvalidRouteMetrics(String),
    /// Bus seat count must be positive.
    InvalidSeatsCount {
        /// The rejected seat count.
        seats_count: i64,
    },
    /// Prices cannot be negative.
    InvalidPrice {
        /// The rejected price in minor currency units.
        price_cents: i64,
    },
    /// Login name is empty or malformed.
    InvalidLoginName(String),
    /// A person or vehicle name is empty or invalid.
    InvalidName(String),
    /// Timezone identifier is not a known IANA zone.
    InvalidTimezone(String),
    /// Failed to parse a station date-time value.
    DateTimeParseError {
        /// The invalid input.
        value: String,
        /// The parser's message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateRange { start, end } => {
                write!(f, "Start date {start} must not be after end date {end}")
            }
            Self::NoWeekdaysSelected => write!(f, "At least one weekday must be selected"),
            Self::InvalidQuantity { quantity } => {
                write!(f, "Invalid ticket quantity: {quantity}. Must be greater than 0")
            }
            Self::InvalidPaymentType(msg) => write!(f, "Invalid payment type: {msg}"),
            Self::InvalidTicketStatus(status) => write!(f, "Invalid ticket status: {status}"),
            Self::InvalidTripStatus(status) => write!(f, "Invalid trip status: {status}"),
            Self::InvalidCityName(msg) => write!(f, "Invalid city name: {msg}"),
            Self::InvalidRouteMetrics(msg) => write!(f, "Invalid route: {msg}"),
            Self::InvalidSeatsCount { seats_count } => {
                write!(f, "Invalid seats count: {seats_count}. Must be greater than 0")
            }
            Self::InvalidPrice { price_cents } => {
                write!(f, "Invalid price: {price_cents}. Must not be negative")
            }
            Self::InvalidLoginName(msg) => write!(f, "Invalid login name: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DateTimeParseError { value, error } => {
                write!(f, "Failed to parse date-time '{value}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
