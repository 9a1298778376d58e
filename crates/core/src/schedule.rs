// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule generation.
//!
//! A weekly recurrence (date range, weekdays, time of day) is expanded into
//! concrete departures, and each departure is turned into a planned trip.
//! This module is pure; the persistence layer resolves the route, bus, and
//! driver and runs the insert inside a transaction.

use std::collections::HashSet;

use bus_station_domain::{
    Bus, DomainError, NewTrip, Route, TripStatus, validate_date_range, validate_price,
};
use serde::{Deserialize, Serialize};
use time::macros::time;
use time::{Date, Duration, PrimitiveDateTime, Time, Weekday};

use crate::error::CoreError;

/// Departure time used when a request does not name one.
pub const DEFAULT_DEPARTURE_TIME: Time = time!(08:00);

/// A request to generate trips for a route over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// The route to schedule.
    pub route_id: i64,
    /// First day of the range (inclusive).
    pub start_date: Date,
    /// Last day of the range (inclusive).
    pub end_date: Date,
    /// Weekdays on which the route runs.
    pub days_of_week: Vec<Weekday>,
    /// Departure time of day; defaults to 08:00.
    pub departure_time: Option<Time>,
    /// Skip departures that already exist for the route.
    pub skip_existing: bool,
    /// Bus to assign; defaults to the bus with the lowest id.
    pub bus_id: Option<i64>,
    /// Driver to assign; defaults to the driver with the lowest id.
    pub driver_id: Option<i64>,
    /// Ticket price; defaults to 0.
    pub price_cents: Option<i64>,
}

impl ScheduleRequest {
    /// Returns the departure time, applying the default.
    #[must_use]
    pub fn time_of_day(&self) -> Time {
        self.departure_time.unwrap_or(DEFAULT_DEPARTURE_TIME)
    }

    /// Returns the ticket price, applying the default.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price_cents.unwrap_or(0)
    }

    /// Checks the request's own fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the range is inverted, no weekdays are
    /// selected, or the price is negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_date_range(self.start_date, self.end_date)?;
        if self.days_of_week.is_empty() {
            return Err(DomainError::NoWeekdaysSelected.into());
        }
        validate_price(self.price())?;
        Ok(())
    }

    /// Expands this request into candidate departures.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the request is invalid.
    pub fn departures(&self) -> Result<Vec<PrimitiveDateTime>, CoreError> {
        self.validate()?;
        expand_departures(
            self.start_date,
            self.end_date,
            &self.days_of_week,
            self.time_of_day(),
        )
    }
}

/// Enumerates every date in `[start, end]` whose weekday is selected and
/// combines it with `time_of_day`.
///
/// Departures are returned in chronological order.
///
/// # Errors
///
/// Returns a validation error if `start > end` or `days_of_week` is empty.
pub fn expand_departures(
    start: Date,
    end: Date,
    days_of_week: &[Weekday],
    time_of_day: Time,
) -> Result<Vec<PrimitiveDateTime>, CoreError> {
    validate_date_range(start, end)?;
    if days_of_week.is_empty() {
        return Err(DomainError::NoWeekdaysSelected.into());
    }

    let mut departures: Vec<PrimitiveDateTime> = Vec::new();
    let mut current: Date = start;
    loop {
        if days_of_week.contains(&current.weekday()) {
            departures.push(PrimitiveDateTime::new(current, time_of_day));
        }
        if current >= end {
            break;
        }
        current = current
            .next_day()
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("advancing past {current}"),
            })?;
    }

    Ok(departures)
}

/// Returns the earliest and latest departure, used to bound the lookup of
/// already scheduled trips.
#[must_use]
pub fn departure_window(
    departures: &[PrimitiveDateTime],
) -> Option<(PrimitiveDateTime, PrimitiveDateTime)> {
    let first: PrimitiveDateTime = *departures.iter().min()?;
    let last: PrimitiveDateTime = *departures.iter().max()?;
    Some((first, last))
}

/// Computes the arrival for a departure on `route`.
///
/// # Errors
///
/// Returns an error if the addition overflows the calendar.
pub fn arrival_for(
    route: &Route,
    departure: PrimitiveDateTime,
) -> Result<PrimitiveDateTime, CoreError> {
    departure
        .checked_add(Duration::minutes(i64::from(route.duration_minutes)))
        .ok_or_else(|| {
            DomainError::DateArithmeticOverflow {
                operation: format!("adding route duration to {departure}"),
            }
            .into()
        })
}

/// Turns candidate departures into trips ready for insertion.
///
/// Departures present in `existing` (exact match to the second) are dropped.
/// Each trip starts with all of the bus's seats available.
///
/// # Arguments
///
/// * `route` - The route being scheduled
/// * `bus` - The bus assigned to every trip
/// * `driver_id` - The driver assigned to every trip
/// * `price_cents` - The ticket price for every trip
/// * `departures` - Candidate departures
/// * `existing` - Departures the route already has
///
/// # Errors
///
/// Returns an error if an arrival time overflows.
pub fn plan_trips(
    route: &Route,
    bus: &Bus,
    driver_id: i64,
    price_cents: i64,
    departures: &[PrimitiveDateTime],
    existing: &HashSet<PrimitiveDateTime>,
) -> Result<Vec<NewTrip>, CoreError> {
    validate_price(price_cents)?;

    let mut seen: HashSet<PrimitiveDateTime> = HashSet::new();
    let mut trips: Vec<NewTrip> = Vec::with_capacity(departures.len());

    for departure in departures {
        if existing.contains(departure) || !seen.insert(*departure) {
            continue;
        }
        trips.push(NewTrip {
            route_id: route.route_id,
            bus_id: bus.bus_id,
            driver_id,
            departure_at: *departure,
            arrival_at: arrival_for(route, *departure)?,
            price_cents,
            available_seats: bus.seats_count,
            status: TripStatus::Planned,
        });
    }

    Ok(trips)
}
