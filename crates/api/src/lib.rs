// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the bus station ticketing system.
//!
//! Requests arrive as plain DTOs, are authorized against the caller's
//! role, validated, and handed to the persistence layer. Errors from every
//! layer below are translated into `ApiError`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod config;
mod error;
mod handlers;
mod input;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use config::{DEFAULT_ORIGIN_CITY, DEFAULT_TIMEZONE, StationClock, StationConfig};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    available_seats, cancel_ticket, city_exists, create_bus, create_city, create_driver,
    create_first_admin, create_route, create_route_with_city, create_trip, create_user,
    delete_trips, delete_user, generate_schedule, list_buses, list_cities, list_drivers,
    list_routes, list_trips, list_users, login, logout, print_tickets, search_trips,
    sell_tickets, ticket_report, ticket_report_csv, update_user, whoami,
};
pub use input::parse_id_list;
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AvailableSeatsResponse, BusInfo, CancelTicketResponse, CityExistsResponse, CityInfo,
    CreateBusRequest, CreateBusResponse, CreateCityRequest, CreateCityResponse,
    CreateDriverRequest, CreateDriverResponse, CreateFirstAdminRequest, CreateFirstAdminResponse,
    CreateRouteRequest, CreateRouteResponse, CreateRouteWithCityRequest, CreateTripRequest,
    CreateTripResponse, CreateUserRequest, CreateUserResponse, DeleteTripsResponse, DriverInfo,
    GenerateScheduleRequest, GenerateScheduleResponse, ListBusesResponse, ListCitiesResponse,
    ListDriversResponse, ListRoutesResponse, ListTripsResponse, ListUsersResponse, LoginRequest,
    LoginResponse, MessageResponse, PrintTicketsRequest, PrintTicketsResponse, RouteInfo,
    RouteReportLine, SellTicketsRequest, SellTicketsResponse, TicketPrint, TicketReportResponse,
    TripInfo, UpdateUserRequest, UpdateUserResponse, UserInfo, WhoAmIResponse,
};
