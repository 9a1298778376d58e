// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their mapping to domain types.

use bus_station_domain::{
    Bus, City, Driver, NewTrip, PaymentType, Route, Ticket, TicketStatus, Trip, TripStatus,
    format_station_datetime, parse_station_datetime,
};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::diesel_schema::{buses, cities, drivers, routes, sessions, tickets, trips, users};
use crate::error::PersistenceError;

/// A stored operator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A route together with its destination city name, when it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteData {
    pub route: Route,
    pub destination_name: Option<String>,
}

/// A ticket with everything needed to print it.
///
/// Related records are optional; a missing one leaves its field empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub trip: Trip,
    pub cashier_name: Option<String>,
    pub destination_name: Option<String>,
    pub bus_model: Option<String>,
}

/// Converts a domain count into the store's integer column type.
pub(crate) fn to_db_count(value: u32, field: &str) -> Result<i32, PersistenceError> {
    value
        .to_i32()
        .ok_or_else(|| PersistenceError::corrupt(field, format!("{value} exceeds column range")))
}

/// Converts a stored integer column into a domain count.
pub(crate) fn from_db_count(value: i32, field: &str) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::corrupt(field, format!("negative value {value}")))
}

/// Formats a station-local date-time for storage.
pub(crate) fn to_db_datetime(value: PrimitiveDateTime) -> Result<String, PersistenceError> {
    format_station_datetime(value).map_err(|e| PersistenceError::corrupt("datetime", e))
}

/// Parses a stored station-local date-time.
pub(crate) fn from_db_datetime(value: &str) -> Result<PrimitiveDateTime, PersistenceError> {
    parse_station_datetime(value).map_err(|e| PersistenceError::corrupt("datetime", e))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = cities)]
pub(crate) struct CityRow {
    pub city_id: i64,
    pub city_name: String,
    pub is_region: i32,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            city_id: row.city_id,
            name: row.city_name,
            is_region: row.is_region != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = routes)]
pub(crate) struct RouteRow {
    pub route_id: i64,
    pub destination_city_id: i64,
    pub distance_km: i32,
    pub duration_minutes: i32,
}

impl RouteRow {
    pub(crate) fn into_domain(self) -> Result<Route, PersistenceError> {
        Ok(Route {
            route_id: self.route_id,
            destination_city_id: self.destination_city_id,
            distance_km: from_db_count(self.distance_km, "routes.distance_km")?,
            duration_minutes: from_db_count(self.duration_minutes, "routes.duration_minutes")?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = buses)]
pub(crate) struct BusRow {
    pub bus_id: i64,
    pub plate_number: String,
    pub model: String,
    pub seats_count: i32,
}

impl BusRow {
    pub(crate) fn into_domain(self) -> Result<Bus, PersistenceError> {
        Ok(Bus {
            bus_id: self.bus_id,
            plate_number: self.plate_number,
            model: self.model,
            seats_count: from_db_count(self.seats_count, "buses.seats_count")?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = drivers)]
pub(crate) struct DriverRow {
    pub driver_id: i64,
    pub full_name: String,
}

impl From<DriverRow> for Driver {
    fn from(row: DriverRow) -> Self {
        Self {
            driver_id: row.driver_id,
            full_name: row.full_name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = trips)]
pub(crate) struct TripRow {
    pub trip_id: i64,
    pub route_id: i64,
    pub bus_id: i64,
    pub driver_id: i64,
    pub departure_at: String,
    pub arrival_at: String,
    pub price_cents: i64,
    pub available_seats: i32,
    pub status: String,
}

impl TripRow {
    pub(crate) fn into_domain(self) -> Result<Trip, PersistenceError> {
        let status: TripStatus = self
            .status
            .parse()
            .map_err(|e| PersistenceError::corrupt("trips.status", e))?;
        Ok(Trip {
            trip_id: self.trip_id,
            route_id: self.route_id,
            bus_id: self.bus_id,
            driver_id: self.driver_id,
            departure_at: from_db_datetime(&self.departure_at)?,
            arrival_at: from_db_datetime(&self.arrival_at)?,
            price_cents: self.price_cents,
            available_seats: from_db_count(self.available_seats, "trips.available_seats")?,
            status,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow {
    pub route_id: i64,
    pub bus_id: i64,
    pub driver_id: i64,
    pub departure_at: String,
    pub arrival_at: String,
    pub price_cents: i64,
    pub available_seats: i32,
    pub status: String,
}

impl NewTripRow {
    pub(crate) fn from_domain(trip: &NewTrip) -> Result<Self, PersistenceError> {
        Ok(Self {
            route_id: trip.route_id,
            bus_id: trip.bus_id,
            driver_id: trip.driver_id,
            departure_at: to_db_datetime(trip.departure_at)?,
            arrival_at: to_db_datetime(trip.arrival_at)?,
            price_cents: trip.price_cents,
            available_seats: to_db_count(trip.available_seats, "trips.available_seats")?,
            status: trip.status.as_str().to_string(),
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub(crate) struct TicketRow {
    pub ticket_id: i64,
    pub trip_id: i64,
    pub seat_number: i32,
    pub purchased_at: String,
    pub price_cents: i64,
    pub payment_type: String,
    pub sold_by_user_id: i64,
    pub destination_city_id: i64,
    pub status: String,
}

impl TicketRow {
    pub(crate) fn into_domain(self) -> Result<Ticket, PersistenceError> {
        let payment_type: PaymentType = self
            .payment_type
            .parse()
            .map_err(|e| PersistenceError::corrupt("tickets.payment_type", e))?;
        let status: TicketStatus = self
            .status
            .parse()
            .map_err(|e| PersistenceError::corrupt("tickets.status", e))?;
        Ok(Ticket {
            ticket_id: self.ticket_id,
            trip_id: self.trip_id,
            seat_number: from_db_count(self.seat_number, "tickets.seat_number")?,
            purchased_at: from_db_datetime(&self.purchased_at)?,
            price_cents: self.price_cents,
            payment_type,
            sold_by_user_id: self.sold_by_user_id,
            destination_city_id: self.destination_city_id,
            status,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow {
    pub trip_id: i64,
    pub seat_number: i32,
    pub purchased_at: String,
    pub price_cents: i64,
    pub payment_type: String,
    pub sold_by_user_id: i64,
    pub destination_city_id: i64,
    pub status: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            login_name: row.login_name,
            full_name: row.full_name,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub(crate) struct SessionRow {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

/// The result of cancelling a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketCancellation {
    pub ticket_id: i64,
    pub trip_id: i64,
    /// The trip's available seats after the cancellation.
    pub available_seats: u32,
}
