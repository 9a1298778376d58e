// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Bus, DomainError, Driver, PaymentType, Route, TicketStatus, TripStatus};
use std::str::FromStr;

#[test]
fn test_payment_type_parsing_ignores_case() {
    assert_eq!(PaymentType::from_str("cash").unwrap(), PaymentType::Cash);
    assert_eq!(PaymentType::from_str("CARD").unwrap(), PaymentType::Card);
    assert_eq!(PaymentType::from_str("  Card ").unwrap(), PaymentType::Card);
}

#[test]
fn test_payment_type_rejects_empty_and_unknown() {
    assert!(matches!(
        PaymentType::from_str(""),
        Err(DomainError::InvalidPaymentType(_))
    ));
    assert!(matches!(
        PaymentType::from_str("   "),
        Err(DomainError::InvalidPaymentType(_))
    ));
    assert!(matches!(
        PaymentType::from_str("barter"),
        Err(DomainError::InvalidPaymentType(_))
    ));
}

#[test]
fn test_ticket_status_seat_occupancy() {
    assert!(TicketStatus::Sold.occupies_seat());
    assert!(TicketStatus::Returned.occupies_seat());
    assert!(!TicketStatus::Cancelled.occupies_seat());
}

#[test]
fn test_status_string_round_trip() {
    for status in [
        TicketStatus::Sold,
        TicketStatus::Returned,
        TicketStatus::Cancelled,
    ] {
        assert_eq!(TicketStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert_eq!(TripStatus::from_str("Planned").unwrap(), TripStatus::Planned);
    assert!(matches!(
        TripStatus::from_str("Boarding"),
        Err(DomainError::InvalidTripStatus(_))
    ));
    assert!(matches!(
        TicketStatus::from_str("sold"),
        Err(DomainError::InvalidTicketStatus(_))
    ));
}

#[test]
fn test_route_title() {
    let route: Route = Route {
        route_id: 7,
        destination_city_id: 3,
        distance_km: 120,
        duration_minutes: 150,
    };

    assert_eq!(route.title("Ivanovo", Some("Shuya")), "Ivanovo - Shuya");
    assert_eq!(route.title("Ivanovo", None), "Ivanovo - #7");
    assert_eq!(route.title("Ivanovo", Some("  ")), "Ivanovo - #7");
}

#[test]
fn test_bus_title_variants() {
    let mut bus: Bus = Bus {
        bus_id: 4,
        plate_number: String::from("A123BC"),
        model: String::from("PAZ"),
        seats_count: 30,
    };
    assert_eq!(bus.title(), "A123BC (PAZ)");

    bus.model = String::new();
    assert_eq!(bus.title(), "A123BC");

    bus.plate_number = String::new();
    bus.model = String::from("PAZ");
    assert_eq!(bus.title(), "PAZ");

    bus.model = String::new();
    assert_eq!(bus.title(), "Bus #4");
}

#[test]
fn test_driver_title() {
    let driver: Driver = Driver {
        driver_id: 2,
        full_name: String::from("Ivan Petrov"),
    };
    assert_eq!(driver.title(), "Ivan Petrov");

    let unnamed: Driver = Driver {
        driver_id: 9,
        full_name: String::from(" "),
    };
    assert_eq!(unnamed.title(), "Driver #9");
}
