// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use bus_station_persistence::{Persistence, UserData};
use time::PrimitiveDateTime;
use time::macros::datetime;

use crate::{
    AuthenticatedActor, CreateBusRequest, CreateDriverRequest, CreateFirstAdminRequest,
    CreateRouteWithCityRequest, CreateUserRequest, GenerateScheduleRequest, StationConfig,
    create_bus, create_driver, create_first_admin, create_route_with_city, create_user,
    generate_schedule,
};

pub const ADMIN_PASSWORD: &str = "Admin#2026";
pub const CASHIER_PASSWORD: &str = "Kassa2026";

/// A store with one administrator and one cashier.
pub struct TestContext {
    pub persistence: Persistence,
    pub config: StationConfig,
    pub admin: AuthenticatedActor,
    pub cashier: AuthenticatedActor,
}

/// Ids of a small catalog built through the handlers.
pub struct Catalog {
    pub city_id: i64,
    pub route_id: i64,
    pub bus_id: i64,
    pub driver_id: i64,
}

/// Station "now" used by the ticket desk tests: Sunday 2026-03-01 10:15.
pub const fn station_now() -> PrimitiveDateTime {
    datetime!(2026-03-01 10:15)
}

pub fn actor_for(persistence: &mut Persistence, login_name: &str) -> AuthenticatedActor {
    let user: UserData = persistence
        .get_user_by_login(login_name)
        .unwrap()
        .expect("user exists");
    AuthenticatedActor::from_user(&user).unwrap()
}

pub fn setup() -> TestContext {
    let mut persistence = Persistence::new_in_memory().unwrap();

    create_first_admin(
        &mut persistence,
        CreateFirstAdminRequest {
            login_name: String::from("admin"),
            full_name: String::from("Olga Ivanova"),
            password: String::from(ADMIN_PASSWORD),
            password_confirmation: String::from(ADMIN_PASSWORD),
        },
    )
    .unwrap();
    let admin = actor_for(&mut persistence, "admin");

    create_user(&mut persistence, cashier_request("cashier"), &admin).unwrap();
    let cashier = actor_for(&mut persistence, "cashier");

    TestContext {
        persistence,
        config: StationConfig::default(),
        admin,
        cashier,
    }
}

pub fn cashier_request(login_name: &str) -> CreateUserRequest {
    CreateUserRequest {
        login_name: login_name.to_string(),
        full_name: String::from("Anna Smirnova"),
        password: String::from(CASHIER_PASSWORD),
        password_confirmation: String::from(CASHIER_PASSWORD),
        role: String::from("Cashier"),
    }
}

/// Creates Kostroma with a 120 minute route, a 30-seat bus, and a driver.
pub fn seed_catalog(ctx: &mut TestContext) -> Catalog {
    let route = create_route_with_city(
        &mut ctx.persistence,
        &ctx.config,
        &CreateRouteWithCityRequest {
            city_name: String::from("Kostroma"),
            distance_km: 105,
            duration_minutes: 120,
        },
        &ctx.admin,
    )
    .unwrap();
    let bus = create_bus(
        &mut ctx.persistence,
        &CreateBusRequest {
            plate_number: String::from("A123BC"),
            model: String::from("PAZ 3205"),
            seats_count: 30,
        },
        &ctx.admin,
    )
    .unwrap();
    let driver = create_driver(
        &mut ctx.persistence,
        &CreateDriverRequest {
            full_name: String::from("Ivan Petrov"),
        },
        &ctx.admin,
    )
    .unwrap();

    Catalog {
        city_id: route.destination_city_id,
        route_id: route.route_id,
        bus_id: bus.bus_id,
        driver_id: driver.driver_id,
    }
}

/// Mon/Wed at 09:30 between 2026-03-02 and 2026-03-04, price 450.00.
pub fn schedule_request(route_id: i64) -> GenerateScheduleRequest {
    GenerateScheduleRequest {
        route_id,
        start_date: String::from("2026-03-02"),
        end_date: String::from("2026-03-04"),
        days_of_week: vec![String::from("Monday"), String::from("wed")],
        departure_time: Some(String::from("09:30")),
        skip_existing: true,
        bus_id: None,
        driver_id: None,
        price_cents: Some(45_000),
    }
}

/// Seeds the catalog and generates the two Mon/Wed trips.
pub fn seed_trips(ctx: &mut TestContext) -> Catalog {
    let catalog = seed_catalog(ctx);
    let response =
        generate_schedule(&mut ctx.persistence, &schedule_request(catalog.route_id), &ctx.admin)
            .unwrap();
    assert_eq!(response.created, 2);
    catalog
}
