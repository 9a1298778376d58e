// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Date;

/// Maximum accepted length for free-text names (cities, drivers, users).
const MAX_NAME_LENGTH: usize = 100;

/// Validates and normalizes a city name.
///
/// # Arguments
///
/// * `name` - The raw city name
///
/// # Returns
///
/// The trimmed name.
///
/// # Errors
///
/// Returns an error if the name is empty after trimming or too long.
pub fn validate_city_name(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidCityName(String::from(
            "City name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidCityName(format!(
            "City name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates route distance and duration.
///
/// # Errors
///
/// Returns an error if either value is zero.
pub fn validate_route_metrics(distance_km: u32, duration_minutes: u32) -> Result<(), DomainError> {
    if distance_km == 0 {
        return Err(DomainError::InvalidRouteMetrics(String::from(
            "Distance must be greater than 0 km",
        )));
    }
    if duration_minutes == 0 {
        return Err(DomainError::InvalidRouteMetrics(String::from(
            "Duration must be greater than 0 minutes",
        )));
    }
    Ok(())
}

/// Validates the fields of a new bus.
///
/// Plate and model may individually be blank, but not both.
///
/// # Errors
///
/// Returns an error if the seat count is zero or the bus has neither a
/// plate nor a model.
pub fn validate_bus_fields(
    plate_number: &str,
    model: &str,
    seats_count: u32,
) -> Result<(), DomainError> {
    if seats_count == 0 {
        return Err(DomainError::InvalidSeatsCount {
            seats_count: i64::from(seats_count),
        });
    }
    if plate_number.trim().is_empty() && model.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Bus requires a plate number or a model",
        )));
    }
    Ok(())
}

/// Validates a person's full name.
///
/// # Errors
///
/// Returns an error if the name is empty after trimming or too long.
pub fn validate_full_name(full_name: &str) -> Result<(), DomainError> {
    let trimmed: &str = full_name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidName(format!(
            "Name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates an operator login name.
///
/// # Errors
///
/// Returns an error if the login is empty or contains whitespace.
pub fn validate_login_name(login_name: &str) -> Result<(), DomainError> {
    let trimmed: &str = login_name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidLoginName(String::from(
            "Login name is required",
        )));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidLoginName(String::from(
            "Login name cannot contain whitespace",
        )));
    }
    Ok(())
}

/// Validates an inclusive date range.
///
/// # Errors
///
/// Returns `InvalidDateRange` if `start` is after `end`.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), DomainError> {
    if start > end {
        return Err(DomainError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Validates a price in minor currency units.
///
/// # Errors
///
/// Returns an error if the price is negative.
pub const fn validate_price(price_cents: i64) -> Result<(), DomainError> {
    if price_cents < 0 {
        return Err(DomainError::InvalidPrice { price_cents });
    }
    Ok(())
}

/// Validates the number of tickets requested in a sale.
///
/// # Errors
///
/// Returns an error if `quantity` is zero.
pub const fn validate_ticket_quantity(quantity: u32) -> Result<(), DomainError> {
    if quantity == 0 {
        return Err(DomainError::InvalidQuantity { quantity });
    }
    Ok(())
}
