// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod station_time;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use station_time::{
    STATION_DATETIME_FORMAT, end_of_day_exclusive, format_station_datetime,
    parse_station_datetime, parse_timezone, start_of_day, station_now, to_station_local,
};
pub use types::{
    Bus, City, Driver, NewTrip, PaymentType, Route, Ticket, TicketStatus, Trip, TripStatus,
    route_title,
};
pub use validation::{
    validate_bus_fields, validate_city_name, validate_date_range, validate_full_name,
    validate_login_name, validate_price, validate_route_metrics, validate_ticket_quantity,
};

// Timezone type used throughout station configuration.
pub use chrono_tz::Tz;
