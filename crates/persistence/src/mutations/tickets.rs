// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket sale and cancellation.
//!
//! The sale reads the trip's occupied seats, allocates the lowest free ones,
//! inserts the tickets, and refreshes the trip's available seat counter.
//! All of it runs in one serializable transaction, so two cashiers selling
//! on the same trip never receive the same seat and the trip is never
//! oversold. A rejected sale writes nothing.

use bus_station::{
    CoreError, SaleReceipt, SeatAllocation, TicketSaleRequest, allocate_seats, available_seats,
    resolve_capacity,
};
use bus_station_domain::{DomainError, TicketStatus, Trip};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::PrimitiveDateTime;
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{
    NewTicketRow, TicketCancellation, TicketRow, TripRow, from_db_count, to_db_count,
    to_db_datetime,
};
use crate::diesel_schema::{buses, routes, tickets, trips};
use crate::error::PersistenceError;

fn save_failed(err: diesel::result::Error) -> PersistenceError {
    match PersistenceError::from(err) {
        PersistenceError::DatabaseError(message) => {
            PersistenceError::DatabaseError(format!("Failed to save tickets: {message}"))
        }
        other => other,
    }
}

backend_fn! {
/// Sells `request.quantity` tickets on one trip.
///
/// Seats are the lowest-numbered free ones. Tickets are priced at the
/// trip's price and point at the route's destination city.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - Trip, quantity, cashier, and payment type
/// * `sold_at` - Station-local purchase time
///
/// # Errors
///
/// * `Rejected(Validation)` if the quantity is zero.
/// * `Rejected(NotFound)` if the trip does not exist.
/// * `Rejected(InsufficientCapacity)` if fewer seats are free than requested.
/// * `Rejected(DataIntegrity)` if the route or capacity cannot be resolved.
/// * `DatabaseError("Failed to save tickets: ...")` if a write fails.
pub fn sell_tickets(
    conn: &mut _,
    request: &TicketSaleRequest,
    sold_at: PrimitiveDateTime,
) -> Result<SaleReceipt, PersistenceError> {
    request.validate()?;
    let purchased_at: String = to_db_datetime(sold_at)?;

    conn.serializable_transaction(|conn| {
        conn.lock_trip_for_sale(request.trip_id)?;
        let trip: Trip = trips::table
            .find(request.trip_id)
            .select(TripRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CoreError::not_found("Trip", request.trip_id))?
            .into_domain()?;

        let destination_city_id: i64 = routes::table
            .find(trip.route_id)
            .select(routes::destination_city_id)
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                CoreError::DataIntegrity(format!(
                    "Route {} of trip {} could not be resolved",
                    trip.route_id, trip.trip_id
                ))
            })?;

        let occupied: Vec<u32> = tickets::table
            .filter(tickets::trip_id.eq(trip.trip_id))
            .filter(tickets::status.ne(TicketStatus::Cancelled.as_str()))
            .select(tickets::seat_number)
            .load::<i32>(conn)?
            .into_iter()
            .map(|seat| from_db_count(seat, "tickets.seat_number"))
            .collect::<Result<_, _>>()?;

        let bus_seats: Option<u32> = buses::table
            .find(trip.bus_id)
            .select(buses::seats_count)
            .first::<i32>(conn)
            .optional()?
            .map(|seats| from_db_count(seats, "buses.seats_count"))
            .transpose()?;

        let capacity: u32 = resolve_capacity(bus_seats, trip.available_seats, occupied.len())?;
        let allocation: SeatAllocation = match allocate_seats(capacity, &occupied, request.quantity) {
            Ok(allocation) => allocation,
            Err(err) => {
                warn!(
                    trip_id = trip.trip_id,
                    requested = request.quantity,
                    error = %err,
                    "Ticket sale rejected"
                );
                return Err(err.into());
            }
        };

        let mut ticket_ids: Vec<i64> = Vec::with_capacity(allocation.seats.len());
        for seat in &allocation.seats {
            let row = NewTicketRow {
                trip_id: trip.trip_id,
                seat_number: to_db_count(*seat, "tickets.seat_number")?,
                purchased_at: purchased_at.clone(),
                price_cents: trip.price_cents,
                payment_type: request.payment_type.as_str().to_string(),
                sold_by_user_id: request.sold_by_user_id,
                destination_city_id,
                status: TicketStatus::Sold.as_str().to_string(),
            };
            diesel::insert_into(tickets::table)
                .values(&row)
                .execute(conn)
                .map_err(save_failed)?;
            ticket_ids.push(conn.get_last_insert_rowid()?);
        }

        diesel::update(trips::table.find(trip.trip_id))
            .set(trips::available_seats.eq(to_db_count(
                allocation.available_after,
                "trips.available_seats",
            )?))
            .execute(conn)
            .map_err(save_failed)?;

        info!(
            trip_id = trip.trip_id,
            seats = ?allocation.seats,
            available = allocation.available_after,
            cashier = request.sold_by_user_id,
            "Tickets sold"
        );

        Ok(SaleReceipt {
            trip_id: trip.trip_id,
            ticket_ids,
            seats: allocation.seats,
            available_seats: allocation.available_after,
        })
    })
}
}

backend_fn! {
/// Cancels a sold ticket and frees its seat.
///
/// # Errors
///
/// * `Rejected(NotFound)` if the ticket does not exist.
/// * `Rejected(Validation)` if the ticket is not in the `Sold` state.
pub fn cancel_ticket(conn: &mut _, ticket_id: i64) -> Result<TicketCancellation, PersistenceError> {
    conn.serializable_transaction(|conn| {
        let ticket = tickets::table
            .find(ticket_id)
            .select(TicketRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CoreError::not_found("Ticket", ticket_id))?
            .into_domain()?;
        conn.lock_trip_for_sale(ticket.trip_id)?;
        if ticket.status != TicketStatus::Sold {
            return Err(DomainError::InvalidTicketStatus(format!(
                "ticket {ticket_id} is {} and cannot be cancelled",
                ticket.status.as_str()
            ))
            .into());
        }

        let trip: Trip = trips::table
            .find(ticket.trip_id)
            .select(TripRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CoreError::not_found("Trip", ticket.trip_id))?
            .into_domain()?;
        let bus_seats: Option<u32> = buses::table
            .find(trip.bus_id)
            .select(buses::seats_count)
            .first::<i32>(conn)
            .optional()?
            .map(|seats| from_db_count(seats, "buses.seats_count"))
            .transpose()?;
        let occupied_before: i64 = tickets::table
            .filter(tickets::trip_id.eq(trip.trip_id))
            .filter(tickets::status.ne(TicketStatus::Cancelled.as_str()))
            .count()
            .get_result(conn)?;
        let occupied_before: usize = usize::try_from(occupied_before)
            .map_err(|e| PersistenceError::corrupt("ticket count", e))?;
        let capacity: u32 = resolve_capacity(bus_seats, trip.available_seats, occupied_before)?;

        diesel::update(tickets::table.find(ticket_id))
            .set(tickets::status.eq(TicketStatus::Cancelled.as_str()))
            .execute(conn)?;

        let available: u32 = available_seats(capacity, occupied_before.saturating_sub(1));
        diesel::update(trips::table.find(trip.trip_id))
            .set(trips::available_seats.eq(to_db_count(available, "trips.available_seats")?))
            .execute(conn)?;

        info!(ticket_id, trip_id = trip.trip_id, available, "Ticket cancelled");
        Ok(TicketCancellation {
            ticket_id,
            trip_id: trip.trip_id,
            available_seats: available,
        })
    })
}
}
