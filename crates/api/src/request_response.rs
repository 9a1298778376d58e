// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD` strings and date-times as
//! `YYYY-MM-DD HH:MM[:SS]` strings in station-local time. Money travels as
//! integer minor units, with a formatted copy where a person reads it.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

// ========================================================================
// Authentication & users
// ========================================================================

/// Request to create the first administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFirstAdminRequest {
    pub login_name: String,
    pub full_name: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Response after creating the first administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFirstAdminResponse {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub message: String,
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub role: String,
    /// ISO 8601 UTC expiry of the session.
    pub expires_at: String,
}

/// The caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub role: String,
    pub last_login_at: Option<String>,
}

/// A staff account, without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub role: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// All staff accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserInfo>,
}

/// Request to create a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub login_name: String,
    pub full_name: String,
    pub password: String,
    pub password_confirmation: String,
    /// Only `Cashier` is accepted.
    pub role: String,
}

/// Response after creating a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub role: String,
}

/// Request to edit a staff account.
///
/// The role must equal the stored one. The password changes only when
/// `new_password` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub login_name: String,
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub new_password_confirmation: Option<String>,
}

/// Response after editing a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    pub user_id: i64,
    pub login_name: String,
    pub full_name: String,
    pub password_changed: bool,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ========================================================================
// Catalog
// ========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityInfo {
    pub city_id: i64,
    pub name: String,
    pub is_region: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCitiesResponse {
    pub cities: Vec<CityInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCityRequest {
    pub name: String,
    #[serde(default)]
    pub is_region: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCityResponse {
    pub city_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityExistsResponse {
    pub name: String,
    pub exists: bool,
}

/// A route with its display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub route_id: i64,
    pub destination_city_id: i64,
    pub destination_name: Option<String>,
    /// `"<origin> - <destination>"`.
    pub title: String,
    pub distance_km: u32,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRoutesResponse {
    pub routes: Vec<RouteInfo>,
}

/// Request to add a route to an existing city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteRequest {
    pub destination_city_id: i64,
    pub distance_km: i64,
    pub duration_minutes: i64,
}

/// Request to add a new destination city and its route together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteWithCityRequest {
    pub city_name: String,
    pub distance_km: i64,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteResponse {
    pub route_id: i64,
    pub destination_city_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusInfo {
    pub bus_id: i64,
    pub plate_number: String,
    pub model: String,
    pub seats_count: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBusesResponse {
    pub buses: Vec<BusInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBusRequest {
    #[serde(default)]
    pub plate_number: String,
    #[serde(default)]
    pub model: String,
    pub seats_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBusResponse {
    pub bus_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub driver_id: i64,
    pub full_name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDriversResponse {
    pub drivers: Vec<DriverInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDriverRequest {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDriverResponse {
    pub driver_id: i64,
    pub title: String,
}

// ========================================================================
// Trips & schedule
// ========================================================================

/// Request to generate trips from a weekly recurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateScheduleRequest {
    pub route_id: i64,
    pub start_date: String,
    pub end_date: String,
    /// English weekday names, e.g. `["Monday", "Wed"]`.
    pub days_of_week: Vec<String>,
    /// `HH:MM`; defaults to 08:00.
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default = "default_true")]
    pub skip_existing: bool,
    #[serde(default)]
    pub bus_id: Option<i64>,
    #[serde(default)]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub price_cents: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateScheduleResponse {
    pub route_id: i64,
    pub created: usize,
    pub message: String,
}

/// Request to create one trip by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub route_id: i64,
    pub departure_at: String,
    pub bus_id: i64,
    pub driver_id: i64,
    #[serde(default)]
    pub price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTripResponse {
    pub trip_id: i64,
    pub departure_at: String,
    pub arrival_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripInfo {
    pub trip_id: i64,
    pub route_id: i64,
    pub bus_id: i64,
    pub driver_id: i64,
    pub departure_at: String,
    pub arrival_at: String,
    pub price_cents: i64,
    pub available_seats: u32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTripsResponse {
    pub trips: Vec<TripInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTripsResponse {
    pub deleted: usize,
}

// ========================================================================
// Tickets
// ========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSeatsResponse {
    pub trip_id: i64,
    pub available_seats: u32,
}

/// Request to sell tickets on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellTicketsRequest {
    pub trip_id: i64,
    pub quantity: u32,
    /// `Cash` or `Card`.
    pub payment_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellTicketsResponse {
    pub trip_id: i64,
    /// New ticket ids, in seat order.
    pub ticket_ids: Vec<i64>,
    pub seats: Vec<u32>,
    pub available_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTicketResponse {
    pub ticket_id: i64,
    pub trip_id: i64,
    pub available_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintTicketsRequest {
    pub ticket_ids: Vec<i64>,
}

/// Everything printed on one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPrint {
    pub ticket_id: i64,
    pub cashier_name: String,
    pub purchased_at: String,
    pub route_title: String,
    pub departure_at: String,
    pub arrival_at: String,
    pub bus_model: String,
    /// The trip's id, printed as the trip number.
    pub trip_number: i64,
    pub seat_number: u32,
    pub payment_type: String,
    pub price_cents: i64,
    /// `price_cents` with two decimal places.
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintTicketsResponse {
    pub tickets: Vec<TicketPrint>,
}

// ========================================================================
// Reports
// ========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReportLine {
    pub route_id: i64,
    pub route_title: String,
    pub sold_count: u64,
    pub returned_count: u64,
    pub earned_cents: i64,
    pub earned: String,
}

/// Ticket sales per route over an inclusive range of departure days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReportResponse {
    pub from: String,
    pub to: String,
    /// `by-status` or `all-as-sold`.
    pub mode: String,
    pub total_sold: u64,
    pub total_returned: u64,
    pub total_earned_cents: i64,
    pub total_earned: String,
    pub items: Vec<RouteReportLine>,
}
