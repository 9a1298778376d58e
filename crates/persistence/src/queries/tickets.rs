// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket queries.

use std::collections::HashMap;

use bus_station::{CoreError, available_seats, resolve_capacity};
use bus_station_domain::{Ticket, TicketStatus, Trip};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{TicketDetails, TicketRow, TripRow, from_db_count};
use crate::diesel_schema::{buses, cities, routes, tickets, trips, users};
use crate::error::PersistenceError;

backend_fn! {
/// Returns the seat numbers held by a trip's non-cancelled tickets, ascending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn occupied_seats(conn: &mut _, trip_id: i64) -> Result<Vec<u32>, PersistenceError> {
    let seats: Vec<i32> = tickets::table
        .filter(tickets::trip_id.eq(trip_id))
        .filter(tickets::status.ne(TicketStatus::Cancelled.as_str()))
        .order(tickets::seat_number.asc())
        .select(tickets::seat_number)
        .load(conn)?;

    seats
        .into_iter()
        .map(|seat| from_db_count(seat, "tickets.seat_number"))
        .collect()
}
}

backend_fn! {
/// Computes how many seats a trip still has for sale.
///
/// This is `capacity - non-cancelled tickets`, never negative. It reads the
/// tickets directly instead of trusting the stored counter.
///
/// # Errors
///
/// Returns `Rejected(NotFound)` if the trip does not exist, or an error if
/// the capacity cannot be determined.
pub fn available_seats_for_trip(conn: &mut _, trip_id: i64) -> Result<u32, PersistenceError> {
    let trip: Trip = trips::table
        .find(trip_id)
        .select(TripRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| CoreError::not_found("Trip", trip_id))?
        .into_domain()?;

    let bus_seats: Option<i32> = buses::table
        .find(trip.bus_id)
        .select(buses::seats_count)
        .first(conn)
        .optional()?;
    let bus_seats: Option<u32> = bus_seats
        .map(|seats| from_db_count(seats, "buses.seats_count"))
        .transpose()?;

    let occupied: i64 = tickets::table
        .filter(tickets::trip_id.eq(trip_id))
        .filter(tickets::status.ne(TicketStatus::Cancelled.as_str()))
        .count()
        .get_result(conn)?;
    let occupied: usize = usize::try_from(occupied)
        .map_err(|e| PersistenceError::corrupt("ticket count", e))?;

    let capacity: u32 = resolve_capacity(bus_seats, trip.available_seats, occupied)?;
    Ok(available_seats(capacity, occupied))
}
}

backend_fn! {
/// Retrieves a ticket by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the ticket does not exist.
pub fn get_ticket(conn: &mut _, ticket_id: i64) -> Result<Option<Ticket>, PersistenceError> {
    let row: Option<TicketRow> = tickets::table
        .find(ticket_id)
        .select(TicketRow::as_select())
        .first(conn)
        .optional()?;

    row.map(TicketRow::into_domain).transpose()
}
}

backend_fn! {
/// Loads tickets together with the records needed to print them.
///
/// Results follow the order of `ticket_ids`. Unknown IDs are skipped.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub fn get_ticket_details(
    conn: &mut _,
    ticket_ids: &[i64],
) -> Result<Vec<TicketDetails>, PersistenceError> {
    let ticket_rows: Vec<TicketRow> = tickets::table
        .filter(tickets::ticket_id.eq_any(ticket_ids))
        .select(TicketRow::as_select())
        .load(conn)?;
    let mut found: HashMap<i64, Ticket> = HashMap::new();
    for row in ticket_rows {
        let ticket: Ticket = row.into_domain()?;
        found.insert(ticket.ticket_id, ticket);
    }

    let trip_ids: Vec<i64> = found.values().map(|ticket| ticket.trip_id).collect();
    let trip_rows: Vec<TripRow> = trips::table
        .filter(trips::trip_id.eq_any(&trip_ids))
        .select(TripRow::as_select())
        .load(conn)?;
    let mut trips_by_id: HashMap<i64, Trip> = HashMap::new();
    for row in trip_rows {
        let trip: Trip = row.into_domain()?;
        trips_by_id.insert(trip.trip_id, trip);
    }

    let seller_ids: Vec<i64> = found.values().map(|t| t.sold_by_user_id).collect();
    let cashiers: HashMap<i64, String> = users::table
        .filter(users::user_id.eq_any(&seller_ids))
        .select((users::user_id, users::full_name))
        .load::<(i64, String)>(conn)?
        .into_iter()
        .collect();

    let route_ids: Vec<i64> = trips_by_id.values().map(|trip| trip.route_id).collect();
    let destinations: HashMap<i64, String> = routes::table
        .inner_join(cities::table)
        .filter(routes::route_id.eq_any(&route_ids))
        .select((routes::route_id, cities::city_name))
        .load::<(i64, String)>(conn)?
        .into_iter()
        .collect();

    let bus_ids: Vec<i64> = trips_by_id.values().map(|trip| trip.bus_id).collect();
    let bus_models: HashMap<i64, String> = buses::table
        .filter(buses::bus_id.eq_any(&bus_ids))
        .select((buses::bus_id, buses::model))
        .load::<(i64, String)>(conn)?
        .into_iter()
        .collect();

    let mut details: Vec<TicketDetails> = Vec::with_capacity(found.len());
    for ticket_id in ticket_ids {
        let Some(ticket) = found.remove(ticket_id) else {
            continue;
        };
        let Some(trip) = trips_by_id.get(&ticket.trip_id).cloned() else {
            continue;
        };
        details.push(TicketDetails {
            cashier_name: cashiers.get(&ticket.sold_by_user_id).cloned(),
            destination_name: destinations.get(&trip.route_id).cloned(),
            bus_model: bus_models.get(&trip.bus_id).cloned(),
            ticket,
            trip,
        });
    }

    Ok(details)
}
}
