// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog mutations: cities, routes, buses, and drivers.

use bus_station::CoreError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::to_db_count;
use crate::diesel_schema::{buses, cities, drivers, routes};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a city.
///
/// The name is trimmed. Names are unique ignoring case.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `city_name` - The city name, already validated
/// * `is_region` - Whether the city lies outside the station's municipality
///
/// # Errors
///
/// Returns `Rejected(RuleViolation)` if a city with the same name exists.
pub fn create_city(
    conn: &mut _,
    city_name: &str,
    is_region: bool,
) -> Result<i64, PersistenceError> {
    let name: &str = city_name.trim();
    let folded: String = name.to_lowercase();

    conn.serializable_transaction(|conn| {
        let names: Vec<String> = cities::table.select(cities::city_name).load(conn)?;
        if names.iter().any(|existing| existing.trim().to_lowercase() == folded) {
            return Err(CoreError::rule(
                "unique_city_name",
                format!("City '{name}' already exists"),
            )
            .into());
        }

        diesel::insert_into(cities::table)
            .values((
                cities::city_name.eq(name),
                cities::is_region.eq(i32::from(is_region)),
            ))
            .execute(conn)?;
        let city_id: i64 = conn.get_last_insert_rowid()?;

        info!(city_id, city_name = name, is_region, "City created");
        Ok(city_id)
    })
}
}

backend_fn! {
/// Creates a route to an existing city.
///
/// # Errors
///
/// Returns `Rejected(NotFound)` if the city does not exist.
pub fn create_route(
    conn: &mut _,
    destination_city_id: i64,
    distance_km: u32,
    duration_minutes: u32,
) -> Result<i64, PersistenceError> {
    let distance: i32 = to_db_count(distance_km, "routes.distance_km")?;
    let duration: i32 = to_db_count(duration_minutes, "routes.duration_minutes")?;

    conn.serializable_transaction(|conn| {
        let city: Option<i64> = cities::table
            .find(destination_city_id)
            .select(cities::city_id)
            .first(conn)
            .optional()?;
        if city.is_none() {
            return Err(CoreError::not_found("City", destination_city_id).into());
        }

        diesel::insert_into(routes::table)
            .values((
                routes::destination_city_id.eq(destination_city_id),
                routes::distance_km.eq(distance),
                routes::duration_minutes.eq(duration),
            ))
            .execute(conn)?;
        let route_id: i64 = conn.get_last_insert_rowid()?;

        info!(route_id, destination_city_id, distance_km, duration_minutes, "Route created");
        Ok(route_id)
    })
}
}

backend_fn! {
/// Creates a regional city and a route to it in one transaction.
///
/// # Returns
///
/// The new `(city_id, route_id)`.
///
/// # Errors
///
/// Returns `Rejected(RuleViolation)` if the city already exists. Nothing is
/// written in that case.
pub fn create_route_with_city(
    conn: &mut _,
    city_name: &str,
    distance_km: u32,
    duration_minutes: u32,
) -> Result<(i64, i64), PersistenceError> {
    let name: &str = city_name.trim();
    let folded: String = name.to_lowercase();
    let distance: i32 = to_db_count(distance_km, "routes.distance_km")?;
    let duration: i32 = to_db_count(duration_minutes, "routes.duration_minutes")?;

    conn.serializable_transaction(|conn| {
        let names: Vec<String> = cities::table.select(cities::city_name).load(conn)?;
        if names.iter().any(|existing| existing.trim().to_lowercase() == folded) {
            return Err(CoreError::rule(
                "unique_city_name",
                format!("City '{name}' already exists"),
            )
            .into());
        }

        diesel::insert_into(cities::table)
            .values((cities::city_name.eq(name), cities::is_region.eq(1)))
            .execute(conn)?;
        let city_id: i64 = conn.get_last_insert_rowid()?;

        diesel::insert_into(routes::table)
            .values((
                routes::destination_city_id.eq(city_id),
                routes::distance_km.eq(distance),
                routes::duration_minutes.eq(duration),
            ))
            .execute(conn)?;
        let route_id: i64 = conn.get_last_insert_rowid()?;

        info!(city_id, route_id, city_name = name, "City and route created");
        Ok((city_id, route_id))
    })
}
}

backend_fn! {
/// Creates a bus.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_bus(
    conn: &mut _,
    plate_number: &str,
    model: &str,
    seats_count: u32,
) -> Result<i64, PersistenceError> {
    let seats: i32 = to_db_count(seats_count, "buses.seats_count")?;

    diesel::insert_into(buses::table)
        .values((
            buses::plate_number.eq(plate_number.trim()),
            buses::model.eq(model.trim()),
            buses::seats_count.eq(seats),
        ))
        .execute(conn)?;
    let bus_id: i64 = conn.get_last_insert_rowid()?;

    info!(bus_id, seats_count, "Bus created");
    Ok(bus_id)
}
}

backend_fn! {
/// Creates a driver.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_driver(conn: &mut _, full_name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(drivers::table)
        .values(drivers::full_name.eq(full_name.trim()))
        .execute(conn)?;
    let driver_id: i64 = conn.get_last_insert_rowid()?;

    info!(driver_id, "Driver created");
    Ok(driver_id)
}
}
