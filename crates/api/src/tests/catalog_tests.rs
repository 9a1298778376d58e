// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{seed_catalog, setup};
use crate::{
    ApiError, CreateBusRequest, CreateCityRequest, CreateDriverRequest, CreateRouteRequest,
    CreateRouteWithCityRequest, StationConfig, city_exists, create_bus, create_city,
    create_driver, create_route, create_route_with_city, list_buses, list_cities, list_drivers,
    list_routes,
};

fn city_request(name: &str) -> CreateCityRequest {
    CreateCityRequest {
        name: name.to_string(),
        is_region: false,
    }
}

#[test]
fn test_create_city_trims_name() {
    let mut ctx = setup();

    let response =
        create_city(&mut ctx.persistence, &city_request("  Yaroslavl "), &ctx.admin).unwrap();

    assert_eq!(response.name, "Yaroslavl");
    let cities = list_cities(&mut ctx.persistence).unwrap().cities;
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].city_id, response.city_id);
}

#[test]
fn test_create_city_rejects_duplicate_ignoring_case() {
    let mut ctx = setup();
    create_city(&mut ctx.persistence, &city_request("Yaroslavl"), &ctx.admin).unwrap();

    let result = create_city(&mut ctx.persistence, &city_request("YAROSLAVL"), &ctx.admin);

    match result.unwrap_err() {
        ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, "unique_city_name"),
        other => panic!("Expected DomainRuleViolation, got: {other:?}"),
    }
}

#[test]
fn test_create_city_rejects_blank_name() {
    let mut ctx = setup();

    let result = create_city(&mut ctx.persistence, &city_request("   "), &ctx.admin);

    match result.unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "city_name"),
        other => panic!("Expected InvalidInput, got: {other:?}"),
    }
}

#[test]
fn test_city_exists_ignores_case_and_padding() {
    let mut ctx = setup();
    create_city(&mut ctx.persistence, &city_request("Shuya"), &ctx.admin).unwrap();

    assert!(city_exists(&mut ctx.persistence, " shuya ").unwrap().exists);
    assert!(!city_exists(&mut ctx.persistence, "Vichuga").unwrap().exists);
}

#[test]
fn test_route_title_uses_origin_city() {
    let mut ctx = setup();
    seed_catalog(&mut ctx);

    let routes = list_routes(&mut ctx.persistence, &ctx.config).unwrap().routes;

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].title, "Ivanovo - Kostroma");
    assert_eq!(routes[0].destination_name.as_deref(), Some("Kostroma"));
    assert_eq!(routes[0].distance_km, 105);
    assert_eq!(routes[0].duration_minutes, 120);
}

#[test]
fn test_route_title_follows_configured_origin() {
    let mut ctx = setup();
    seed_catalog(&mut ctx);
    let config =
        StationConfig::new("Shuya", "Europe/Moscow", bus_station::ReportMode::ByStatus).unwrap();

    let routes = list_routes(&mut ctx.persistence, &config).unwrap().routes;

    assert_eq!(routes[0].title, "Shuya - Kostroma");
}

#[test]
fn test_create_route_to_existing_city() {
    let mut ctx = setup();
    let city = create_city(&mut ctx.persistence, &city_request("Vladimir"), &ctx.admin).unwrap();

    let response = create_route(
        &mut ctx.persistence,
        &ctx.config,
        &CreateRouteRequest {
            destination_city_id: city.city_id,
            distance_km: 110,
            duration_minutes: 150,
        },
        &ctx.admin,
    )
    .unwrap();

    assert_eq!(response.destination_city_id, city.city_id);
    assert_eq!(response.title, "Ivanovo - Vladimir");
}

#[test]
fn test_create_route_unknown_city_is_not_found() {
    let mut ctx = setup();

    let result = create_route(
        &mut ctx.persistence,
        &ctx.config,
        &CreateRouteRequest {
            destination_city_id: 404,
            distance_km: 110,
            duration_minutes: 150,
        },
        &ctx.admin,
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_create_route_rejects_bad_metrics() {
    let mut ctx = setup();

    let negative = create_route_with_city(
        &mut ctx.persistence,
        &ctx.config,
        &CreateRouteWithCityRequest {
            city_name: String::from("Kineshma"),
            distance_km: -5,
            duration_minutes: 90,
        },
        &ctx.admin,
    );
    let zero = create_route_with_city(
        &mut ctx.persistence,
        &ctx.config,
        &CreateRouteWithCityRequest {
            city_name: String::from("Kineshma"),
            distance_km: 100,
            duration_minutes: 0,
        },
        &ctx.admin,
    );

    assert!(matches!(negative, Err(ApiError::InvalidInput { .. })));
    assert!(matches!(zero, Err(ApiError::InvalidInput { .. })));
    // Nothing was written.
    assert!(!ctx.persistence.city_exists("Kineshma").unwrap());
}

#[test]
fn test_create_route_with_existing_city_is_refused() {
    let mut ctx = setup();
    seed_catalog(&mut ctx);

    let result = create_route_with_city(
        &mut ctx.persistence,
        &ctx.config,
        &CreateRouteWithCityRequest {
            city_name: String::from("kostroma"),
            distance_km: 105,
            duration_minutes: 120,
        },
        &ctx.admin,
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
    assert_eq!(list_routes(&mut ctx.persistence, &ctx.config).unwrap().routes.len(), 1);
}

#[test]
fn test_create_bus_and_list() {
    let mut ctx = setup();
    seed_catalog(&mut ctx);

    let buses = list_buses(&mut ctx.persistence).unwrap().buses;

    assert_eq!(buses.len(), 1);
    assert_eq!(buses[0].seats_count, 30);
    assert!(buses[0].title.contains("PAZ 3205"));
    assert!(buses[0].title.contains("A123BC"));
}

#[test]
fn test_create_bus_rejects_zero_or_negative_seats() {
    let mut ctx = setup();

    for seats_count in [0, -3] {
        let result = create_bus(
            &mut ctx.persistence,
            &CreateBusRequest {
                plate_number: String::from("B456CD"),
                model: String::from("LiAZ"),
                seats_count,
            },
            &ctx.admin,
        );
        match result.unwrap_err() {
            ApiError::InvalidInput { field, .. } => assert_eq!(field, "seats_count"),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }
}

#[test]
fn test_create_driver_and_list() {
    let mut ctx = setup();

    let response = create_driver(
        &mut ctx.persistence,
        &CreateDriverRequest {
            full_name: String::from(" Sergei Volkov "),
        },
        &ctx.admin,
    )
    .unwrap();

    assert_eq!(response.title, "Sergei Volkov");
    let drivers = list_drivers(&mut ctx.persistence).unwrap().drivers;
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].driver_id, response.driver_id);
}

#[test]
fn test_create_driver_rejects_blank_name() {
    let mut ctx = setup();

    let result = create_driver(
        &mut ctx.persistence,
        &CreateDriverRequest {
            full_name: String::new(),
        },
        &ctx.admin,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}
