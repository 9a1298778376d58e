// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip queries.
//!
//! Departures are stored as `YYYY-MM-DD HH:MM:SS` text, so range filters
//! compare strings and still order chronologically.

use bus_station_domain::Trip;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::PrimitiveDateTime;
use tracing::debug;

use crate::data_models::{TripRow, to_db_datetime};
use crate::diesel_schema::{routes, trips};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a trip by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the trip does not exist.
pub fn get_trip(conn: &mut _, trip_id: i64) -> Result<Option<Trip>, PersistenceError> {
    let row: Option<TripRow> = trips::table
        .find(trip_id)
        .select(TripRow::as_select())
        .first(conn)
        .optional()?;

    row.map(TripRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists trips departing within `[start, end)`, ordered by departure.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_trips_in_range(
    conn: &mut _,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<Trip>, PersistenceError> {
    let start_str: String = to_db_datetime(start)?;
    let end_str: String = to_db_datetime(end)?;

    let rows: Vec<TripRow> = trips::table
        .filter(trips::departure_at.ge(&start_str))
        .filter(trips::departure_at.lt(&end_str))
        .order((trips::departure_at.asc(), trips::trip_id.asc()))
        .select(TripRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TripRow::into_domain).collect()
}
}

backend_fn! {
/// Lists trips to a destination city departing within `[start, end)`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `city_id` - The destination city
/// * `start` - Earliest departure (inclusive)
/// * `end` - Latest departure (exclusive)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn trips_for_city_between(
    conn: &mut _,
    city_id: i64,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<Vec<Trip>, PersistenceError> {
    let start_str: String = to_db_datetime(start)?;
    let end_str: String = to_db_datetime(end)?;

    debug!(city_id, start = %start_str, end = %end_str, "Looking up trips for city");

    let rows: Vec<TripRow> = trips::table
        .inner_join(routes::table)
        .filter(routes::destination_city_id.eq(city_id))
        .filter(trips::departure_at.ge(&start_str))
        .filter(trips::departure_at.lt(&end_str))
        .order((trips::departure_at.asc(), trips::trip_id.asc()))
        .select(TripRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TripRow::into_domain).collect()
}
}
