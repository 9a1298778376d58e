// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip mutations.
//!
//! Schedule generation resolves its bus, driver, and route, loads the
//! departures the route already has, and inserts the remaining trips in one
//! serializable transaction. Either every planned trip is written or none is.

use std::collections::HashSet;

use bus_station::{CoreError, ScheduleRequest, arrival_for, departure_window, plan_trips};
use bus_station_domain::{Bus, NewTrip, Route, TripStatus, validate_price};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::PrimitiveDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{BusRow, NewTripRow, RouteRow, from_db_datetime, to_db_datetime};
use crate::diesel_schema::{buses, drivers, routes, tickets, trips};
use crate::error::PersistenceError;

backend_fn! {
/// Generates trips for a route over a date range.
///
/// Without an explicit bus or driver the lowest-id one is used. When
/// `skip_existing` is set, departures the route already has (exact
/// date-time match) are left alone.
///
/// # Returns
///
/// The number of trips inserted. Zero when every departure already exists.
///
/// # Errors
///
/// * `Rejected(Validation)` for an invalid range, weekday set, or price.
/// * `Rejected(NotFound)` if the route, or an explicitly named bus or
///   driver, does not exist.
/// * `Rejected(ResourceMissing)` if no bus or no driver exists at all.
pub fn create_trips_for_route(
    conn: &mut _,
    request: &ScheduleRequest,
) -> Result<usize, PersistenceError> {
    let departures: Vec<PrimitiveDateTime> = request.departures()?;

    conn.serializable_transaction(|conn| {
        let bus_row: Option<BusRow> = match request.bus_id {
            Some(bus_id) => buses::table
                .find(bus_id)
                .select(BusRow::as_select())
                .first(conn)
                .optional()?,
            None => buses::table
                .order(buses::bus_id.asc())
                .select(BusRow::as_select())
                .first(conn)
                .optional()?,
        };
        let bus: Bus = match (bus_row, request.bus_id) {
            (Some(row), _) => row.into_domain()?,
            (None, Some(bus_id)) => return Err(CoreError::not_found("Bus", bus_id).into()),
            (None, None) => {
                return Err(CoreError::ResourceMissing {
                    resource: String::from("buses"),
                }
                .into());
            }
        };

        let driver_id: Option<i64> = match request.driver_id {
            Some(driver_id) => drivers::table
                .find(driver_id)
                .select(drivers::driver_id)
                .first(conn)
                .optional()?,
            None => drivers::table
                .order(drivers::driver_id.asc())
                .select(drivers::driver_id)
                .first(conn)
                .optional()?,
        };
        let driver_id: i64 = match (driver_id, request.driver_id) {
            (Some(id), _) => id,
            (None, Some(wanted)) => return Err(CoreError::not_found("Driver", wanted).into()),
            (None, None) => {
                return Err(CoreError::ResourceMissing {
                    resource: String::from("drivers"),
                }
                .into());
            }
        };

        let route: Route = routes::table
            .find(request.route_id)
            .select(RouteRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CoreError::not_found("Route", request.route_id))?
            .into_domain()?;

        let mut existing: HashSet<PrimitiveDateTime> = HashSet::new();
        let window: Option<(PrimitiveDateTime, PrimitiveDateTime)> = if request.skip_existing {
            departure_window(&departures)
        } else {
            None
        };
        if let Some((first, last)) = window {
            let stored: Vec<String> = trips::table
                .filter(trips::route_id.eq(route.route_id))
                .filter(trips::departure_at.ge(to_db_datetime(first)?))
                .filter(trips::departure_at.le(to_db_datetime(last)?))
                .select(trips::departure_at)
                .load(conn)?;
            for value in &stored {
                existing.insert(from_db_datetime(value)?);
            }
            debug!(route_id = route.route_id, existing = existing.len(), "Existing departures loaded");
        }

        let planned: Vec<NewTrip> =
            plan_trips(&route, &bus, driver_id, request.price(), &departures, &existing)?;
        if planned.is_empty() {
            info!(route_id = route.route_id, "No new trips to create");
            return Ok(0);
        }

        let rows: Vec<NewTripRow> = planned
            .iter()
            .map(NewTripRow::from_domain)
            .collect::<Result<_, _>>()?;
        let inserted: usize = diesel::insert_into(trips::table)
            .values(&rows)
            .execute(conn)?;

        info!(
            route_id = route.route_id,
            bus_id = bus.bus_id,
            driver_id,
            inserted,
            "Trips created"
        );
        Ok(inserted)
    })
}
}

backend_fn! {
/// Creates one trip with explicit bus, driver, and price.
///
/// Arrival is departure plus the route's duration. Available seats start at
/// the bus's seat count.
///
/// # Errors
///
/// Returns `Rejected(NotFound)` if the route, bus, or driver does not exist,
/// or `Rejected(Validation)` for a negative price.
pub fn create_trip(
    conn: &mut _,
    route_id: i64,
    departure_at: PrimitiveDateTime,
    bus_id: i64,
    driver_id: i64,
    price_cents: i64,
) -> Result<i64, PersistenceError> {
    validate_price(price_cents)?;

    conn.serializable_transaction(|conn| {
        let route: Route = routes::table
            .find(route_id)
            .select(RouteRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CoreError::not_found("Route", route_id))?
            .into_domain()?;
        let bus: Bus = buses::table
            .find(bus_id)
            .select(BusRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CoreError::not_found("Bus", bus_id))?
            .into_domain()?;
        let driver: Option<i64> = drivers::table
            .find(driver_id)
            .select(drivers::driver_id)
            .first(conn)
            .optional()?;
        if driver.is_none() {
            return Err(CoreError::not_found("Driver", driver_id).into());
        }

        let trip = NewTrip {
            route_id: route.route_id,
            bus_id: bus.bus_id,
            driver_id,
            departure_at,
            arrival_at: arrival_for(&route, departure_at)?,
            price_cents,
            available_seats: bus.seats_count,
            status: TripStatus::Planned,
        };

        diesel::insert_into(trips::table)
            .values(&NewTripRow::from_domain(&trip)?)
            .execute(conn)?;
        let trip_id: i64 = conn.get_last_insert_rowid()?;

        info!(trip_id, route_id, bus_id, driver_id, "Trip created");
        Ok(trip_id)
    })
}
}

backend_fn! {
/// Deletes the trips departing in `[start, end)` that have no tickets.
///
/// Trips holding any ticket, whatever its status, are kept.
///
/// # Returns
///
/// The number of trips deleted.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn delete_trips_in_range(
    conn: &mut _,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> Result<usize, PersistenceError> {
    let start: String = to_db_datetime(start)?;
    let end: String = to_db_datetime(end)?;

    conn.serializable_transaction(|conn| {
        let in_range: Vec<i64> = trips::table
            .filter(trips::departure_at.ge(&start))
            .filter(trips::departure_at.lt(&end))
            .select(trips::trip_id)
            .load(conn)?;
        if in_range.is_empty() {
            return Ok(0);
        }

        let ticketed: HashSet<i64> = tickets::table
            .filter(tickets::trip_id.eq_any(&in_range))
            .select(tickets::trip_id)
            .distinct()
            .load::<i64>(conn)?
            .into_iter()
            .collect();
        let removable: Vec<i64> = in_range
            .into_iter()
            .filter(|trip_id| !ticketed.contains(trip_id))
            .collect();
        if removable.is_empty() {
            return Ok(0);
        }

        let deleted: usize = diesel::delete(trips::table.filter(trips::trip_id.eq_any(&removable)))
            .execute(conn)?;

        info!(deleted, kept = ticketed.len(), "Trips deleted");
        Ok(deleted)
    })
}
}
