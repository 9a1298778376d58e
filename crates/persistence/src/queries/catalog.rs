// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog queries: cities, routes, buses, and drivers.

use bus_station_domain::{Bus, City, Driver, Route};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{BusRow, CityRow, DriverRow, RouteData, RouteRow};
use crate::diesel_schema::{buses, cities, drivers, routes};
use crate::error::PersistenceError;

backend_fn! {
/// Lists all cities ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_cities(conn: &mut _) -> Result<Vec<City>, PersistenceError> {
    let rows: Vec<CityRow> = cities::table
        .order(cities::city_name.asc())
        .select(CityRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(City::from).collect())
}
}

backend_fn! {
/// Retrieves a city by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the city does not exist.
pub fn get_city(conn: &mut _, city_id: i64) -> Result<Option<City>, PersistenceError> {
    let row: Option<CityRow> = cities::table
        .find(city_id)
        .select(CityRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(City::from))
}
}

backend_fn! {
/// Finds a city by name, ignoring case and surrounding whitespace.
///
/// Case is folded in Rust, so non-ASCII names compare the same on both
/// backends.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_city_by_name(conn: &mut _, name: &str) -> Result<Option<City>, PersistenceError> {
    let wanted: String = name.trim().to_lowercase();
    debug!(name = %wanted, "Looking up city by name");

    let rows: Vec<CityRow> = cities::table.select(CityRow::as_select()).load(conn)?;

    Ok(rows
        .into_iter()
        .map(City::from)
        .find(|city| city.name.trim().to_lowercase() == wanted))
}
}

backend_fn! {
/// Lists all routes with their destination names, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_routes(conn: &mut _) -> Result<Vec<RouteData>, PersistenceError> {
    let rows: Vec<(RouteRow, Option<String>)> = routes::table
        .left_join(cities::table)
        .order(routes::route_id.asc())
        .select((RouteRow::as_select(), cities::city_name.nullable()))
        .load(conn)?;

    rows.into_iter()
        .map(|(row, destination_name)| {
            Ok(RouteData {
                route: row.into_domain()?,
                destination_name,
            })
        })
        .collect()
}
}

backend_fn! {
/// Retrieves a route by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the route does not exist.
pub fn get_route(conn: &mut _, route_id: i64) -> Result<Option<Route>, PersistenceError> {
    let row: Option<RouteRow> = routes::table
        .find(route_id)
        .select(RouteRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RouteRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists all buses ordered by display title.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_buses(conn: &mut _) -> Result<Vec<Bus>, PersistenceError> {
    let rows: Vec<BusRow> = buses::table.select(BusRow::as_select()).load(conn)?;

    let mut buses: Vec<Bus> = rows
        .into_iter()
        .map(BusRow::into_domain)
        .collect::<Result<Vec<Bus>, PersistenceError>>()?;
    buses.sort_by_cached_key(Bus::title);
    Ok(buses)
}
}

backend_fn! {
/// Retrieves a bus by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the bus does not exist.
pub fn get_bus(conn: &mut _, bus_id: i64) -> Result<Option<Bus>, PersistenceError> {
    let row: Option<BusRow> = buses::table
        .find(bus_id)
        .select(BusRow::as_select())
        .first(conn)
        .optional()?;

    row.map(BusRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists all drivers ordered by display title.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_drivers(conn: &mut _) -> Result<Vec<Driver>, PersistenceError> {
    let rows: Vec<DriverRow> = drivers::table.select(DriverRow::as_select()).load(conn)?;

    let mut drivers: Vec<Driver> = rows.into_iter().map(Driver::from).collect();
    drivers.sort_by_cached_key(Driver::title);
    Ok(drivers)
}
}

backend_fn! {
/// Retrieves a driver by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the driver does not exist.
pub fn get_driver(conn: &mut _, driver_id: i64) -> Result<Option<Driver>, PersistenceError> {
    let row: Option<DriverRow> = drivers::table
        .find(driver_id)
        .select(DriverRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Driver::from))
}
}
