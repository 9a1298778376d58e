// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bus_station::CoreError;
use bus_station_domain::{DomainError, TripStatus};
use time::macros::{date, time};
use time::{Duration, PrimitiveDateTime};

use super::{create_test_trip, monday_wednesday_request, sale_request, seed_catalog, sold_at};
use crate::{Persistence, PersistenceError};

#[test]
fn test_generate_monday_wednesday_creates_two_trips() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);

    let created = persistence
        .create_trips_for_route(&monday_wednesday_request(seed.route_id))
        .unwrap();
    assert_eq!(created, 2);

    let trips = persistence
        .list_trips_in_range(
            PrimitiveDateTime::new(date!(2026 - 03 - 01), time!(00:00)),
            PrimitiveDateTime::new(date!(2026 - 03 - 08), time!(00:00)),
        )
        .unwrap();
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].departure_at.date(), date!(2026 - 03 - 02));
    assert_eq!(trips[1].departure_at.date(), date!(2026 - 03 - 04));
    for trip in &trips {
        assert_eq!(trip.arrival_at - trip.departure_at, Duration::minutes(120));
        assert_eq!(trip.available_seats, 30);
        assert_eq!(trip.price_cents, 45_000);
        assert_eq!(trip.bus_id, seed.bus_id);
        assert_eq!(trip.driver_id, seed.driver_id);
        assert_eq!(trip.status, TripStatus::Planned);
    }
}

#[test]
fn test_generate_twice_with_skip_existing_creates_nothing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    let request = monday_wednesday_request(seed.route_id);

    assert_eq!(persistence.create_trips_for_route(&request).unwrap(), 2);
    assert_eq!(persistence.create_trips_for_route(&request).unwrap(), 0);
}

#[test]
fn test_generate_skips_only_matching_departures() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    create_test_trip(&mut persistence, &seed);

    let created = persistence
        .create_trips_for_route(&monday_wednesday_request(seed.route_id))
        .unwrap();

    assert_eq!(created, 1);
}

#[test]
fn test_generate_without_skip_existing_duplicates_departures() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    let mut request = monday_wednesday_request(seed.route_id);
    request.skip_existing = false;

    assert_eq!(persistence.create_trips_for_route(&request).unwrap(), 2);
    assert_eq!(persistence.create_trips_for_route(&request).unwrap(), 2);
}

#[test]
fn test_generate_rejects_inverted_range() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    let mut request = monday_wednesday_request(seed.route_id);
    request.end_date = date!(2026 - 03 - 01);

    let result = persistence.create_trips_for_route(&request);

    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::Validation(
            DomainError::InvalidDateRange { .. }
        )))
    ));
}

#[test]
fn test_generate_without_buses_reports_missing_resource() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let city_id = persistence.create_city("Kostroma", true).unwrap();
    let route_id = persistence.create_route(city_id, 105, 120).unwrap();
    persistence.create_driver("Ivan Petrov").unwrap();

    let result = persistence.create_trips_for_route(&monday_wednesday_request(route_id));

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::ResourceMissing {
            resource: String::from("buses"),
        }))
    );
}

#[test]
fn test_generate_with_unknown_driver_writes_nothing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    let mut request = monday_wednesday_request(seed.route_id);
    request.driver_id = Some(999);

    let result = persistence.create_trips_for_route(&request);

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::not_found("Driver", 999)))
    );
    request.driver_id = None;
    assert_eq!(persistence.create_trips_for_route(&request).unwrap(), 2);
}

#[test]
fn test_generate_for_unknown_route_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence, 30);

    let result = persistence.create_trips_for_route(&monday_wednesday_request(77));

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::not_found("Route", 77)))
    );
}

#[test]
fn test_trips_for_city_today_excludes_departed() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    let mut request = monday_wednesday_request(seed.route_id);
    request.end_date = date!(2026 - 03 - 02);
    persistence.create_trips_for_route(&request).unwrap();
    request.departure_time = Some(time!(18:00));
    persistence.create_trips_for_route(&request).unwrap();

    let all_day = persistence
        .trips_for_city_on_date(seed.city_id, date!(2026 - 03 - 02), None)
        .unwrap();
    let after_noon = persistence
        .trips_for_city_on_date(
            seed.city_id,
            date!(2026 - 03 - 02),
            Some(PrimitiveDateTime::new(date!(2026 - 03 - 02), time!(12:00))),
        )
        .unwrap();
    let other_day_now = persistence
        .trips_for_city_on_date(
            seed.city_id,
            date!(2026 - 03 - 02),
            Some(PrimitiveDateTime::new(date!(2026 - 03 - 01), time!(23:00))),
        )
        .unwrap();

    assert_eq!(all_day.len(), 2);
    assert_eq!(after_noon.len(), 1);
    assert_eq!(after_noon[0].departure_at.time(), time!(18:00));
    assert_eq!(other_day_now.len(), 2);
}

#[test]
fn test_delete_trips_in_range_keeps_ticketed_trips() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 30);
    persistence
        .create_trips_for_route(&monday_wednesday_request(seed.route_id))
        .unwrap();
    let start = PrimitiveDateTime::new(date!(2026 - 03 - 02), time!(00:00));
    let end = PrimitiveDateTime::new(date!(2026 - 03 - 05), time!(00:00));
    let first = persistence.list_trips_in_range(start, end).unwrap()[0].trip_id;
    persistence
        .sell_tickets(&sale_request(first, 1, seed.cashier_id), sold_at())
        .unwrap();

    let deleted = persistence.delete_trips_in_range(start, end).unwrap();

    assert_eq!(deleted, 1);
    let remaining = persistence.list_trips_in_range(start, end).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].trip_id, first);
}

#[test]
fn test_create_trip_sets_arrival_and_capacity() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seed = seed_catalog(&mut persistence, 42);

    let trip_id = create_test_trip(&mut persistence, &seed);

    let trip = persistence.get_trip(trip_id).unwrap().unwrap();
    assert_eq!(trip.arrival_at.time(), time!(11:30));
    assert_eq!(trip.available_seats, 42);
}
