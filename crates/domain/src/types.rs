// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::PrimitiveDateTime;

/// Lifecycle status of a scheduled trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TripStatus {
    /// Scheduled and open for sale.
    #[default]
    Planned,
    /// Withdrawn from the timetable.
    Cancelled,
}

impl TripStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for TripStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Planned" => Ok(Self::Planned),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidTripStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of an issued ticket.
///
/// A ticket holds its seat unless it is `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Paid and valid.
    Sold,
    /// Returned by the passenger after sale.
    Returned,
    /// Voided by a cashier; the seat is free again.
    Cancelled,
}

impl TicketStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sold => "Sold",
            Self::Returned => "Returned",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns whether a ticket in this status occupies its seat.
    #[must_use]
    pub const fn occupies_seat(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sold" => Ok(Self::Sold),
            "Returned" => Ok(Self::Returned),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidTicketStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a ticket was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// Paid in cash at the counter.
    Cash,
    /// Paid by bank card.
    Card,
}

impl PaymentType {
    /// Converts this payment type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
        }
    }
}

impl FromStr for PaymentType {
    type Err = DomainError;

    /// Parses a payment type, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPaymentType(String::from(
                "Payment type is required",
            )));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            _ => Err(DomainError::InvalidPaymentType(format!(
                "Unknown payment type '{trimmed}'. Must be 'Cash' or 'Card'"
            ))),
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A destination city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Store-assigned identifier.
    pub city_id: i64,
    /// Unique (case-insensitive) display name.
    pub name: String,
    /// Whether the city lies outside the station's own municipality.
    pub is_region: bool,
}

/// A route from the station's own city to a destination city.
///
/// The origin is implicit and comes from station configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Store-assigned identifier.
    pub route_id: i64,
    /// The destination city.
    pub destination_city_id: i64,
    /// Road distance in kilometres.
    pub distance_km: u32,
    /// Travel time in minutes; arrival is always departure plus this value.
    pub duration_minutes: u32,
}

impl Route {
    /// Builds the display title `"<origin> - <destination>"`.
    ///
    /// Falls back to `"<origin> - #<route_id>"` when the destination name is unknown.
    #[must_use]
    pub fn title(&self, origin: &str, destination_name: Option<&str>) -> String {
        route_title(origin, self.route_id, destination_name)
    }
}

/// Builds a route display title from its parts.
///
/// Used where only the route id and the joined destination name are at hand.
#[must_use]
pub fn route_title(origin: &str, route_id: i64, destination_name: Option<&str>) -> String {
    match destination_name.map(str::trim) {
        Some(name) if !name.is_empty() => format!("{origin} - {name}"),
        _ => format!("{origin} - #{route_id}"),
    }
}

/// A vehicle that can be assigned to trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    /// Store-assigned identifier.
    pub bus_id: i64,
    /// Registration plate, may be empty.
    pub plate_number: String,
    /// Manufacturer model, may be empty.
    pub model: String,
    /// Number of passenger seats.
    pub seats_count: u32,
}

impl Bus {
    /// Builds the display title from plate and model.
    #[must_use]
    pub fn title(&self) -> String {
        let plate: &str = self.plate_number.trim();
        let model: &str = self.model.trim();
        match (plate.is_empty(), model.is_empty()) {
            (false, false) => format!("{plate} ({model})"),
            (false, true) => plate.to_string(),
            (true, false) => model.to_string(),
            (true, true) => format!("Bus #{}", self.bus_id),
        }
    }
}

/// A driver that can be assigned to trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Store-assigned identifier.
    pub driver_id: i64,
    /// Full name, may be empty.
    pub full_name: String,
}

impl Driver {
    /// Returns the full name, or `"Driver #<id>"` when it is blank.
    #[must_use]
    pub fn title(&self) -> String {
        let name: &str = self.full_name.trim();
        if name.is_empty() {
            format!("Driver #{}", self.driver_id)
        } else {
            name.to_string()
        }
    }
}

/// A single scheduled departure of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Store-assigned identifier.
    pub trip_id: i64,
    /// The route this trip runs.
    pub route_id: i64,
    /// The assigned bus.
    pub bus_id: i64,
    /// The assigned driver.
    pub driver_id: i64,
    /// Station-local departure.
    pub departure_at: PrimitiveDateTime,
    /// Station-local arrival.
    pub arrival_at: PrimitiveDateTime,
    /// Ticket price in minor currency units.
    pub price_cents: i64,
    /// Denormalised count of seats still for sale.
    pub available_seats: u32,
    /// Trip lifecycle status.
    pub status: TripStatus,
}

/// A trip that has been planned but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    /// The route this trip runs.
    pub route_id: i64,
    /// The assigned bus.
    pub bus_id: i64,
    /// The assigned driver.
    pub driver_id: i64,
    /// Station-local departure.
    pub departure_at: PrimitiveDateTime,
    /// Station-local arrival.
    pub arrival_at: PrimitiveDateTime,
    /// Ticket price in minor currency units.
    pub price_cents: i64,
    /// Initial seats for sale, normally the bus capacity.
    pub available_seats: u32,
    /// Initial status.
    pub status: TripStatus,
}

/// An issued ticket for one seat on one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned identifier.
    pub ticket_id: i64,
    /// The trip this ticket is for.
    pub trip_id: i64,
    /// Seat number in `1..=capacity`.
    pub seat_number: u32,
    /// Station-local time of sale.
    pub purchased_at: PrimitiveDateTime,
    /// Price paid, copied from the trip at sale time.
    pub price_cents: i64,
    /// How the ticket was paid for.
    pub payment_type: PaymentType,
    /// The cashier who sold the ticket.
    pub sold_by_user_id: i64,
    /// The destination city, copied from the route at sale time.
    pub destination_city_id: i64,
    /// Current ticket status.
    pub status: TicketStatus,
}
