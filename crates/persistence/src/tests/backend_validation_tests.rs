// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! These run only through `cargo xtask test-mariadb`, which provisions a
//! container and sets `DATABASE_URL` and `BUS_STATION_TEST_BACKEND=mariadb`.
//! Each test validates schema behavior or a transaction on the real
//! backend. Business rules are covered by the `SQLite` suite.
//!
//! The tests share one database, so each one uses names no other test uses.

use std::collections::BTreeSet;
use std::env;
use std::thread;

use bus_station::{CoreError, TicketSaleRequest};
use bus_station_domain::PaymentType;
use diesel::MysqlConnection;
use diesel::prelude::*;
use time::PrimitiveDateTime;
use time::macros::{date, time};

use crate::backend::mysql;
use crate::{Persistence, PersistenceError};

/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// # Panics
///
/// Panics if `BUS_STATION_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("BUS_STATION_TEST_BACKEND").expect(
        "BUS_STATION_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "BUS_STATION_TEST_BACKEND must be 'mariadb'");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");
    mysql::verify_foreign_key_enforcement(&mut conn).expect("Foreign keys must be enforced");

    let result = diesel::sql_query(
        "INSERT INTO routes (destination_city_id, distance_km, duration_minutes)
         VALUES (99999, 10, 10)",
    )
    .execute(&mut conn);
    assert!(
        result.is_err(),
        "Route with non-existent city should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_unique_login_name() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn: MysqlConnection =
        mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(
        "INSERT INTO users (login_name, full_name, password_hash, role, created_at)
         VALUES ('UNIQUE_CHECK', 'First', 'hash', 'Cashier', '2026-03-01T09:00:00Z')",
    )
    .execute(&mut conn)
    .expect("Failed to insert test user");

    let duplicate = diesel::sql_query(
        "INSERT INTO users (login_name, full_name, password_hash, role, created_at)
         VALUES ('UNIQUE_CHECK', 'Second', 'hash', 'Cashier', '2026-03-01T09:00:00Z')",
    )
    .execute(&mut conn);
    assert!(duplicate.is_err(), "Duplicate login_name should fail");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_seat_number_check_constraint() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let mut persistence = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB");

    let city_id = persistence.create_city("Check Constraint City", true).unwrap();
    let route_id = persistence.create_route(city_id, 10, 20).unwrap();
    let bus_id = persistence.create_bus("CHK001", "PAZ", 10).unwrap();
    let driver_id = persistence.create_driver("Check Driver").unwrap();
    let user_id = persistence
        .create_user("check_seller", "Seller", "Secret123", "Cashier", "2026-03-01T09:00:00Z")
        .unwrap();
    let trip_id = persistence
        .create_trip(
            route_id,
            PrimitiveDateTime::new(date!(2026 - 05 - 01), time!(08:00)),
            bus_id,
            driver_id,
            100,
        )
        .unwrap();

    let mut conn: MysqlConnection =
        mysql::initialize_database(&url).expect("Failed to reconnect to MariaDB");
    let result = diesel::sql_query(format!(
        "INSERT INTO tickets (trip_id, seat_number, purchased_at, price_cents, payment_type,
                              sold_by_user_id, destination_city_id, status)
         VALUES ({trip_id}, 0, '2026-03-01 10:00:00', 100, 'Cash', {user_id}, {city_id}, 'Sold')"
    ))
    .execute(&mut conn);
    assert!(result.is_err(), "Seat number 0 should violate the CHECK constraint");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_serializable_sale_rolls_back_on_rejection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let mut persistence = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB");

    let city_id = persistence.create_city("Rollback City", true).unwrap();
    let route_id = persistence.create_route(city_id, 10, 20).unwrap();
    let bus_id = persistence.create_bus("RLB001", "PAZ", 2).unwrap();
    let driver_id = persistence.create_driver("Rollback Driver").unwrap();
    let user_id = persistence
        .create_user("rollback_seller", "Seller", "Secret123", "Cashier", "2026-03-01T09:00:00Z")
        .unwrap();
    let trip_id = persistence
        .create_trip(
            route_id,
            PrimitiveDateTime::new(date!(2026 - 05 - 02), time!(08:00)),
            bus_id,
            driver_id,
            100,
        )
        .unwrap();
    let request = TicketSaleRequest {
        trip_id,
        quantity: 3,
        sold_by_user_id: user_id,
        payment_type: PaymentType::Card,
    };

    let result = persistence.sell_tickets(
        &request,
        PrimitiveDateTime::new(date!(2026 - 03 - 01), time!(10:00)),
    );

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::InsufficientCapacity {
            free: 2,
            requested: 3,
        }))
    );
    assert!(persistence.occupied_seats(trip_id).unwrap().is_empty());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_concurrent_sales_fill_trip_without_failures() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let mut setup = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB");

    let capacity: u32 = 3;
    let buyers: usize = 8;
    let city_id = setup.create_city("Concurrency City", true).unwrap();
    let route_id = setup.create_route(city_id, 10, 20).unwrap();
    let bus_id = setup.create_bus("CNC001", "PAZ", capacity).unwrap();
    let driver_id = setup.create_driver("Concurrency Driver").unwrap();
    let user_id = setup
        .create_user("concurrency_seller", "Seller", "Secret123", "Cashier", "2026-03-01T09:00:00Z")
        .unwrap();
    let trip_id = setup
        .create_trip(
            route_id,
            PrimitiveDateTime::new(date!(2026 - 05 - 03), time!(08:00)),
            bus_id,
            driver_id,
            100,
        )
        .unwrap();
    drop(setup);

    let connections: Vec<Persistence> = (0..buyers)
        .map(|_| Persistence::new_with_mysql(&url).expect("Failed to open MariaDB"))
        .collect();
    let sold_at = PrimitiveDateTime::new(date!(2026 - 03 - 01), time!(10:00));

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = connections
            .into_iter()
            .map(|mut persistence| {
                let request = TicketSaleRequest {
                    trip_id,
                    quantity: 1,
                    sold_by_user_id: user_id,
                    payment_type: PaymentType::Cash,
                };
                scope.spawn(move || persistence.sell_tickets(&request, sold_at))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let seats: Vec<u32> = results
        .iter()
        .filter_map(|result| result.as_ref().ok())
        .flat_map(|receipt| receipt.seats.iter().copied())
        .collect();
    let distinct: BTreeSet<u32> = seats.iter().copied().collect();
    assert_eq!(seats.len(), capacity as usize);
    assert_eq!(distinct, (1..=capacity).collect());

    for result in results.iter().filter(|result| result.is_err()) {
        assert_eq!(
            result.as_ref().err(),
            Some(&PersistenceError::Rejected(CoreError::InsufficientCapacity {
                free: 0,
                requested: 1,
            }))
        );
    }
}
