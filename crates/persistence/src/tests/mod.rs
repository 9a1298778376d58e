// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod backend_validation_tests;
mod schedule_tests;

use bus_station::{ScheduleRequest, TicketSaleRequest};
use bus_station_domain::PaymentType;
use time::macros::{date, time};
use time::{PrimitiveDateTime, Weekday};

use crate::Persistence;

pub const TEST_TIMESTAMP: &str = "2026-03-01T09:00:00.000000000Z";

/// Ids of a minimal catalog: one city, one route, one bus, one driver, and
/// one cashier.
pub struct Seed {
    pub city_id: i64,
    pub route_id: i64,
    pub bus_id: i64,
    pub driver_id: i64,
    pub cashier_id: i64,
}

pub fn seed_catalog(persistence: &mut Persistence, seats: u32) -> Seed {
    let city_id = persistence.create_city("Kostroma", true).unwrap();
    let route_id = persistence.create_route(city_id, 105, 120).unwrap();
    let bus_id = persistence.create_bus("A123BC", "PAZ 3205", seats).unwrap();
    let driver_id = persistence.create_driver("Ivan Petrov").unwrap();
    let cashier_id = persistence
        .create_user("cashier", "Anna Smirnova", "Secret123", "Cashier", TEST_TIMESTAMP)
        .unwrap();

    Seed {
        city_id,
        route_id,
        bus_id,
        driver_id,
        cashier_id,
    }
}

/// Schedules Mon/Wed departures at 09:30 for 2026-03-02 through 2026-03-04.
pub fn monday_wednesday_request(route_id: i64) -> ScheduleRequest {
    ScheduleRequest {
        route_id,
        start_date: date!(2026 - 03 - 02),
        end_date: date!(2026 - 03 - 04),
        days_of_week: vec![Weekday::Monday, Weekday::Wednesday],
        departure_time: Some(time!(09:30)),
        skip_existing: true,
        bus_id: None,
        driver_id: None,
        price_cents: Some(45_000),
    }
}

pub fn sale_request(trip_id: i64, quantity: u32, cashier_id: i64) -> TicketSaleRequest {
    TicketSaleRequest {
        trip_id,
        quantity,
        sold_by_user_id: cashier_id,
        payment_type: PaymentType::Cash,
    }
}

pub fn sold_at() -> PrimitiveDateTime {
    PrimitiveDateTime::new(date!(2026 - 03 - 01), time!(10:15))
}

/// Creates a single trip departing at 2026-03-02 09:30 and returns its id.
pub fn create_test_trip(persistence: &mut Persistence, seed: &Seed) -> i64 {
    persistence
        .create_trip(
            seed.route_id,
            PrimitiveDateTime::new(date!(2026 - 03 - 02), time!(09:30)),
            seed.bus_id,
            seed.driver_id,
            45_000,
        )
        .unwrap()
}
