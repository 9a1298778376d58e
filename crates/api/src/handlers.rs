// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler receives the store handle and, where the operation is
//! gated, the caller's `AuthenticatedActor`. Authorization is checked before
//! anything is read or written.

use bus_station::{
    ReportMode, SaleReceipt, ScheduleRequest, TicketReport, TicketSale,
    TicketSaleRequest, aggregate_ticket_report, format_money, report_bounds,
};
use bus_station_domain::{
    Bus, City, DomainError, Driver, PaymentType, Trip, end_of_day_exclusive, format_station_datetime,
    route_title, start_of_day, validate_bus_fields, validate_city_name, validate_date_range,
    validate_full_name, validate_login_name, validate_price, validate_route_metrics,
};
use bus_station_persistence::{Persistence, RouteData, TicketCancellation, TicketDetails, UserData};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, Weekday};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::config::StationConfig;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::input::{
    parse_date, parse_datetime, parse_payment_type, parse_time, parse_weekdays, to_count,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
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

/// Printed when a ticket's cashier no longer exists.
const DEFAULT_CASHIER_NAME: &str = "Cashier";
/// Printed when a related name cannot be resolved.
const UNKNOWN: &str = "Unknown";

fn user_to_info(user: &UserData) -> UserInfo {
    UserInfo {
        user_id: user.user_id,
        login_name: user.login_name.clone(),
        full_name: user.full_name.clone(),
        role: user.role.clone(),
        created_at: user.created_at.clone(),
        last_login_at: user.last_login_at.clone(),
    }
}

fn trip_to_info(trip: &Trip) -> Result<TripInfo, ApiError> {
    Ok(TripInfo {
        trip_id: trip.trip_id,
        route_id: trip.route_id,
        bus_id: trip.bus_id,
        driver_id: trip.driver_id,
        departure_at: format_datetime(trip.departure_at)?,
        arrival_at: format_datetime(trip.arrival_at)?,
        price_cents: trip.price_cents,
        available_seats: trip.available_seats,
        status: trip.status.as_str().to_string(),
    })
}

fn bus_to_info(bus: &Bus) -> BusInfo {
    BusInfo {
        bus_id: bus.bus_id,
        plate_number: bus.plate_number.clone(),
        model: bus.model.clone(),
        seats_count: bus.seats_count,
        title: bus.title(),
    }
}

fn format_datetime(value: PrimitiveDateTime) -> Result<String, ApiError> {
    format_station_datetime(value).map_err(|e| ApiError::Internal {
        message: format!("Failed to format date-time: {e}"),
    })
}

fn utc_timestamp() -> Result<String, ApiError> {
    Ok(AuthenticationService::format_timestamp(
        OffsetDateTime::now_utc(),
    )?)
}

/// Turns an inclusive day range into a half-open departure window.
fn day_window(from: &str, to: &str) -> Result<(PrimitiveDateTime, PrimitiveDateTime), ApiError> {
    let from: Date = parse_date("from", from)?;
    let to: Date = parse_date("to", to)?;
    validate_date_range(from, to).map_err(translate_domain_error)?;
    let end: PrimitiveDateTime = end_of_day_exclusive(to).map_err(translate_domain_error)?;
    Ok((start_of_day(from), end))
}

// ========================================================================
// Authentication & bootstrap
// ========================================================================

/// Creates the first administrator.
///
/// Allowed only while no users exist.
///
/// # Errors
///
/// Returns an error if:
/// - Any user already exists
/// - The login or name is invalid
/// - The password violates the policy
/// - Database operations fail
pub fn create_first_admin(
    persistence: &mut Persistence,
    request: CreateFirstAdminRequest,
) -> Result<CreateFirstAdminResponse, ApiError> {
    let user_count: i64 = persistence
        .count_users()
        .map_err(|e| translate_persistence_error(e, "count users"))?;

    if user_count > 0 {
        return Err(ApiError::Unauthorized {
            action: String::from("create_first_admin"),
            required_role: String::from("Bootstrap mode (no users exist)"),
        });
    }

    validate_login_name(&request.login_name).map_err(translate_domain_error)?;
    validate_full_name(&request.full_name).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.full_name,
    )?;

    let user_id: i64 = persistence
        .create_user(
            &request.login_name,
            &request.full_name,
            &request.password,
            Role::Administrator.as_str(),
            &utc_timestamp()?,
        )
        .map_err(|e| translate_persistence_error(e, "create first administrator"))?;

    info!(user_id, "First administrator created");
    Ok(CreateFirstAdminResponse {
        user_id,
        login_name: request.login_name.trim().to_uppercase(),
        full_name: request.full_name.trim().to_string(),
        message: String::from("First administrator created successfully"),
    })
}

/// Logs in and returns a session token.
///
/// # Errors
///
/// Returns `InvalidInput` for empty credentials and
/// `AuthenticationFailed` for wrong ones.
pub fn login(persistence: &mut Persistence, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    if request.login_name.trim().is_empty() {
        return Err(ApiError::invalid("login_name", "Login name is required"));
    }
    if request.password.is_empty() {
        return Err(ApiError::invalid("password", "Password is required"));
    }

    let (session_token, actor, user): (String, AuthenticatedActor, UserData) =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    let expires_at: String = persistence
        .get_session_by_token(&session_token)
        .map_err(|e| translate_persistence_error(e, "retrieve session"))?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    Ok(LoginResponse {
        session_token,
        user_id: user.user_id,
        login_name: user.login_name,
        full_name: user.full_name,
        role: actor.role.as_str().to_string(),
        expires_at,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the caller's identity.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor, user: &UserData) -> WhoAmIResponse {
    WhoAmIResponse {
        user_id: actor.user_id,
        login_name: actor.login_name.clone(),
        full_name: user.full_name.clone(),
        role: actor.role.as_str().to_string(),
        last_login_at: user.last_login_at.clone(),
    }
}

// ========================================================================
// User management
// ========================================================================

/// Lists all staff accounts.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the query fails.
pub fn list_users(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "list_users")?;

    let users: Vec<UserData> = persistence
        .list_users()
        .map_err(|e| translate_persistence_error(e, "list users"))?;

    Ok(ListUsersResponse {
        users: users.iter().map(user_to_info).collect(),
    })
}

/// Creates a cashier account.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator
/// - The requested role is `Administrator` or unknown
/// - The login is taken
/// - The password violates the policy
/// - Database operations fail
pub fn create_user(
    persistence: &mut Persistence,
    request: CreateUserRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateUserResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_user")?;

    let role: Role = request
        .role
        .parse()
        .map_err(|message: String| ApiError::invalid("role", message))?;
    if role == Role::Administrator {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("no_additional_administrators"),
            message: String::from("Administrator accounts cannot be created"),
        });
    }

    validate_login_name(&request.login_name).map_err(translate_domain_error)?;
    validate_full_name(&request.full_name).map_err(translate_domain_error)?;

    let existing: Option<UserData> = persistence
        .get_user_by_login(&request.login_name)
        .map_err(|e| translate_persistence_error(e, "look up login"))?;
    if existing.is_some() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_login_name"),
            message: format!("Login '{}' is already taken", request.login_name.trim()),
        });
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.full_name,
    )?;

    let user_id: i64 = persistence
        .create_user(
            &request.login_name,
            &request.full_name,
            &request.password,
            role.as_str(),
            &utc_timestamp()?,
        )
        .map_err(|e| translate_persistence_error(e, "create user"))?;

    info!(user_id, created_by = authenticated_actor.user_id, "User created");
    Ok(CreateUserResponse {
        user_id,
        login_name: request.login_name.trim().to_uppercase(),
        full_name: request.full_name.trim().to_string(),
        role: role.as_str().to_string(),
    })
}

/// Edits a staff account.
///
/// The role cannot change. The login must stay unique. When a new password
/// is given it must pass the policy, and the user's sessions are ended.
///
/// # Errors
///
/// Returns an error if any of those rules fail, the user does not exist, or
/// the caller is not an administrator.
pub fn update_user(
    persistence: &mut Persistence,
    user_id: i64,
    request: &UpdateUserRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UpdateUserResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "update_user")?;

    let target: UserData = persistence
        .get_user_by_id(user_id)
        .map_err(|e| translate_persistence_error(e, "get user"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })?;

    let requested_role: Role = request
        .role
        .parse()
        .map_err(|message: String| ApiError::invalid("role", message))?;
    if requested_role.as_str() != target.role {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("role_immutable"),
            message: format!("The role of user {user_id} cannot be changed"),
        });
    }

    validate_login_name(&request.login_name).map_err(translate_domain_error)?;
    validate_full_name(&request.full_name).map_err(translate_domain_error)?;

    let holder: Option<UserData> = persistence
        .get_user_by_login(&request.login_name)
        .map_err(|e| translate_persistence_error(e, "look up login"))?;
    if let Some(holder) = holder {
        if holder.user_id != user_id {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("unique_login_name"),
                message: format!("Login '{}' is already taken", request.login_name.trim()),
            });
        }
    }

    // Check the password before writing anything.
    if let Some(new_password) = &request.new_password {
        let confirmation: &str = request.new_password_confirmation.as_deref().unwrap_or_default();
        PasswordPolicy::default().validate(
            new_password,
            confirmation,
            &request.login_name,
            &request.full_name,
        )?;
    }

    persistence
        .update_user(user_id, &request.login_name, &request.full_name)
        .map_err(|e| translate_persistence_error(e, "update user"))?;

    let password_changed: bool = match &request.new_password {
        Some(new_password) => {
            persistence
                .update_password(user_id, new_password)
                .map_err(|e| translate_persistence_error(e, "update password"))?;
            persistence
                .delete_sessions_for_user(user_id)
                .map_err(|e| translate_persistence_error(e, "end user sessions"))?;
            true
        }
        None => false,
    };

    info!(user_id, password_changed, updated_by = authenticated_actor.user_id, "User updated");
    Ok(UpdateUserResponse {
        user_id,
        login_name: request.login_name.trim().to_uppercase(),
        full_name: request.full_name.trim().to_string(),
        password_changed,
    })
}

/// Deletes a cashier account.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator, or targets themselves
/// - The target does not exist or is an administrator
/// - Tickets reference the target
pub fn delete_user(
    persistence: &mut Persistence,
    user_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "delete_user")?;

    if user_id == authenticated_actor.user_id {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("cannot_delete_self"),
            message: String::from("Users cannot delete their own account"),
        });
    }

    let target: UserData = persistence
        .get_user_by_id(user_id)
        .map_err(|e| translate_persistence_error(e, "get user"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })?;

    if target.role == Role::Administrator.as_str() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("cannot_delete_administrator"),
            message: format!("User {} is an administrator", target.login_name),
        });
    }

    persistence
        .delete_user(user_id)
        .map_err(|e| translate_persistence_error(e, "delete user"))?;

    info!(user_id, deleted_by = authenticated_actor.user_id, "User deleted");
    Ok(MessageResponse {
        message: format!("User {} has been deleted", target.login_name),
    })
}

// ========================================================================
// Catalog
// ========================================================================

/// Lists cities by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_cities(persistence: &mut Persistence) -> Result<ListCitiesResponse, ApiError> {
    let cities: Vec<City> = persistence
        .list_cities()
        .map_err(|e| translate_persistence_error(e, "list cities"))?;
    Ok(ListCitiesResponse {
        cities: cities
            .into_iter()
            .map(|city| CityInfo {
                city_id: city.city_id,
                name: city.name,
                is_region: city.is_region,
            })
            .collect(),
    })
}

/// Checks whether a city name is taken, ignoring case and padding.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn city_exists(persistence: &mut Persistence, name: &str) -> Result<CityExistsResponse, ApiError> {
    let exists: bool = persistence
        .city_exists(name)
        .map_err(|e| translate_persistence_error(e, "check city"))?;
    Ok(CityExistsResponse {
        name: name.trim().to_string(),
        exists,
    })
}

/// Creates a city.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the name is
/// empty, or the city exists.
pub fn create_city(
    persistence: &mut Persistence,
    request: &CreateCityRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateCityResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_city")?;
    let name: String = validate_city_name(&request.name).map_err(translate_domain_error)?;

    let city_id: i64 = persistence
        .create_city(&name, request.is_region)
        .map_err(|e| translate_persistence_error(e, "create city"))?;
    Ok(CreateCityResponse { city_id, name })
}

/// Lists routes with their display titles.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_routes(
    persistence: &mut Persistence,
    config: &StationConfig,
) -> Result<ListRoutesResponse, ApiError> {
    let routes: Vec<RouteData> = persistence
        .list_routes()
        .map_err(|e| translate_persistence_error(e, "list routes"))?;
    Ok(ListRoutesResponse {
        routes: routes
            .into_iter()
            .map(|data| RouteInfo {
                route_id: data.route.route_id,
                destination_city_id: data.route.destination_city_id,
                title: data
                    .route
                    .title(&config.origin_city_name, data.destination_name.as_deref()),
                destination_name: data.destination_name,
                distance_km: data.route.distance_km,
                duration_minutes: data.route.duration_minutes,
            })
            .collect(),
    })
}

fn route_metrics(distance_km: i64, duration_minutes: i64) -> Result<(u32, u32), ApiError> {
    let distance: u32 = to_count("distance_km", distance_km)?;
    let duration: u32 = to_count("duration_minutes", duration_minutes)?;
    validate_route_metrics(distance, duration).map_err(translate_domain_error)?;
    Ok((distance, duration))
}

/// Creates a route to an existing city.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the metrics are
/// not positive, or the city does not exist.
pub fn create_route(
    persistence: &mut Persistence,
    config: &StationConfig,
    request: &CreateRouteRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateRouteResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_route")?;
    let (distance, duration): (u32, u32) =
        route_metrics(request.distance_km, request.duration_minutes)?;

    let route_id: i64 = persistence
        .create_route(request.destination_city_id, distance, duration)
        .map_err(|e| translate_persistence_error(e, "create route"))?;
    let destination: Option<City> = persistence
        .get_city(request.destination_city_id)
        .map_err(|e| translate_persistence_error(e, "get city"))?;

    Ok(CreateRouteResponse {
        route_id,
        destination_city_id: request.destination_city_id,
        title: route_title(
            &config.origin_city_name,
            route_id,
            destination.as_ref().map(|city| city.name.as_str()),
        ),
    })
}

/// Creates a new destination city together with its route.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the input is
/// invalid, or the city exists. Nothing is written on error.
pub fn create_route_with_city(
    persistence: &mut Persistence,
    config: &StationConfig,
    request: &CreateRouteWithCityRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateRouteResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_route_with_city")?;
    let name: String = validate_city_name(&request.city_name).map_err(translate_domain_error)?;
    let (distance, duration): (u32, u32) =
        route_metrics(request.distance_km, request.duration_minutes)?;

    let (city_id, route_id): (i64, i64) = persistence
        .create_route_with_city(&name, distance, duration)
        .map_err(|e| translate_persistence_error(e, "create route"))?;

    Ok(CreateRouteResponse {
        route_id,
        destination_city_id: city_id,
        title: route_title(&config.origin_city_name, route_id, Some(&name)),
    })
}

/// Lists buses by display title.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_buses(persistence: &mut Persistence) -> Result<ListBusesResponse, ApiError> {
    let buses: Vec<Bus> = persistence
        .list_buses()
        .map_err(|e| translate_persistence_error(e, "list buses"))?;
    Ok(ListBusesResponse {
        buses: buses.iter().map(bus_to_info).collect(),
    })
}

/// Creates a bus.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the fields are
/// invalid.
pub fn create_bus(
    persistence: &mut Persistence,
    request: &CreateBusRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateBusResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_bus")?;
    let seats_count: u32 = u32::try_from(request.seats_count).map_err(|_| {
        translate_domain_error(DomainError::InvalidSeatsCount {
            seats_count: request.seats_count,
        })
    })?;
    validate_bus_fields(&request.plate_number, &request.model, seats_count)
        .map_err(translate_domain_error)?;

    let bus_id: i64 = persistence
        .create_bus(&request.plate_number, &request.model, seats_count)
        .map_err(|e| translate_persistence_error(e, "create bus"))?;
    let bus: Bus = Bus {
        bus_id,
        plate_number: request.plate_number.trim().to_string(),
        model: request.model.trim().to_string(),
        seats_count,
    };
    Ok(CreateBusResponse {
        bus_id,
        title: bus.title(),
    })
}

/// Lists drivers by display title.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_drivers(persistence: &mut Persistence) -> Result<ListDriversResponse, ApiError> {
    let drivers: Vec<Driver> = persistence
        .list_drivers()
        .map_err(|e| translate_persistence_error(e, "list drivers"))?;
    Ok(ListDriversResponse {
        drivers: drivers
            .into_iter()
            .map(|driver| DriverInfo {
                title: driver.title(),
                driver_id: driver.driver_id,
                full_name: driver.full_name,
            })
            .collect(),
    })
}

/// Creates a driver.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the name is
/// empty.
pub fn create_driver(
    persistence: &mut Persistence,
    request: &CreateDriverRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateDriverResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_driver")?;
    validate_full_name(&request.full_name).map_err(translate_domain_error)?;

    let driver_id: i64 = persistence
        .create_driver(&request.full_name)
        .map_err(|e| translate_persistence_error(e, "create driver"))?;
    Ok(CreateDriverResponse {
        driver_id,
        title: request.full_name.trim().to_string(),
    })
}

// ========================================================================
// Schedule & trips
// ========================================================================

/// Generates trips for a route from a weekly recurrence.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator
/// - The range is inverted or no weekday is given
/// - The route, bus, or driver does not exist, or no bus or driver exists
pub fn generate_schedule(
    persistence: &mut Persistence,
    request: &GenerateScheduleRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<GenerateScheduleResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "generate_schedule")?;

    let days_of_week: Vec<Weekday> = parse_weekdays(&request.days_of_week)?;
    let departure_time: Option<Time> = request
        .departure_time
        .as_deref()
        .map(|value| parse_time("departure_time", value))
        .transpose()?;

    let schedule: ScheduleRequest = ScheduleRequest {
        route_id: request.route_id,
        start_date: parse_date("start_date", &request.start_date)?,
        end_date: parse_date("end_date", &request.end_date)?,
        days_of_week,
        departure_time,
        skip_existing: request.skip_existing,
        bus_id: request.bus_id,
        driver_id: request.driver_id,
        price_cents: request.price_cents,
    };

    let created: usize = persistence
        .create_trips_for_route(&schedule)
        .map_err(|e| translate_persistence_error(e, "generate schedule"))?;

    Ok(GenerateScheduleResponse {
        route_id: request.route_id,
        created,
        message: format!("{created} trips created"),
    })
}

/// Creates one trip by hand.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the input is
/// invalid, or a referenced record does not exist.
pub fn create_trip(
    persistence: &mut Persistence,
    request: &CreateTripRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreateTripResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_trip")?;
    let departure_at: PrimitiveDateTime = parse_datetime("departure_at", &request.departure_at)?;
    validate_price(request.price_cents).map_err(translate_domain_error)?;

    let trip_id: i64 = persistence
        .create_trip(
            request.route_id,
            departure_at,
            request.bus_id,
            request.driver_id,
            request.price_cents,
        )
        .map_err(|e| translate_persistence_error(e, "create trip"))?;
    let trip: Trip = persistence
        .get_trip(trip_id)
        .map_err(|e| translate_persistence_error(e, "get trip"))?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Trip {trip_id} not found after creation"),
        })?;

    Ok(CreateTripResponse {
        trip_id,
        departure_at: format_datetime(trip.departure_at)?,
        arrival_at: format_datetime(trip.arrival_at)?,
    })
}

/// Lists trips departing on the given days, inclusive.
///
/// # Errors
///
/// Returns an error if the dates are invalid or the query fails.
pub fn list_trips(
    persistence: &mut Persistence,
    from: &str,
    to: &str,
) -> Result<ListTripsResponse, ApiError> {
    let (start, end): (PrimitiveDateTime, PrimitiveDateTime) = day_window(from, to)?;
    let trips: Vec<Trip> = persistence
        .list_trips_in_range(start, end)
        .map_err(|e| translate_persistence_error(e, "list trips"))?;
    Ok(ListTripsResponse {
        trips: trips.iter().map(trip_to_info).collect::<Result<_, _>>()?,
    })
}

/// Deletes the ticketless trips departing on the given days.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the dates are
/// invalid, or the delete fails.
pub fn delete_trips(
    persistence: &mut Persistence,
    from: &str,
    to: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<DeleteTripsResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "delete_trips")?;
    let (start, end): (PrimitiveDateTime, PrimitiveDateTime) = day_window(from, to)?;
    let deleted: usize = persistence
        .delete_trips_in_range(start, end)
        .map_err(|e| translate_persistence_error(e, "delete trips"))?;
    Ok(DeleteTripsResponse { deleted })
}

/// Finds the trips to a city on a date, for the ticket desk.
///
/// On the current day, trips that already left are left out.
///
/// # Errors
///
/// Returns an error if the date is invalid or the query fails.
pub fn search_trips(
    persistence: &mut Persistence,
    city_id: i64,
    date: &str,
    now: PrimitiveDateTime,
) -> Result<ListTripsResponse, ApiError> {
    let date: Date = parse_date("date", date)?;
    let trips: Vec<Trip> = persistence
        .trips_for_city_on_date(city_id, date, Some(now))
        .map_err(|e| translate_persistence_error(e, "search trips"))?;
    Ok(ListTripsResponse {
        trips: trips.iter().map(trip_to_info).collect::<Result<_, _>>()?,
    })
}

// ========================================================================
// Tickets
// ========================================================================

/// Returns how many seats a trip has free.
///
/// # Errors
///
/// Returns an error if the trip does not exist.
pub fn available_seats(
    persistence: &mut Persistence,
    trip_id: i64,
) -> Result<AvailableSeatsResponse, ApiError> {
    let available_seats: u32 = persistence
        .available_seats(trip_id)
        .map_err(|e| translate_persistence_error(e, "count available seats"))?;
    Ok(AvailableSeatsResponse {
        trip_id,
        available_seats,
    })
}

/// Sells tickets on a trip, assigning the lowest free seats.
///
/// The caller is recorded as the seller.
///
/// # Errors
///
/// Returns an error if:
/// - The quantity is zero or the payment type unknown
/// - The trip does not exist
/// - Fewer seats are free than requested
pub fn sell_tickets(
    persistence: &mut Persistence,
    request: &SellTicketsRequest,
    authenticated_actor: &AuthenticatedActor,
    now: PrimitiveDateTime,
) -> Result<SellTicketsResponse, ApiError> {
    AuthorizationService::authorize_ticket_desk(authenticated_actor, "sell_tickets")?;
    let payment_type: PaymentType = parse_payment_type(&request.payment_type)?;

    let sale: TicketSaleRequest = TicketSaleRequest {
        trip_id: request.trip_id,
        quantity: request.quantity,
        sold_by_user_id: authenticated_actor.user_id,
        payment_type,
    };

    let receipt: SaleReceipt = persistence.sell_tickets(&sale, now).map_err(|e| {
        warn!(trip_id = request.trip_id, quantity = request.quantity, error = %e, "Sale failed");
        translate_persistence_error(e, "sell tickets")
    })?;

    Ok(SellTicketsResponse {
        trip_id: receipt.trip_id,
        ticket_ids: receipt.ticket_ids,
        seats: receipt.seats,
        available_seats: receipt.available_seats,
    })
}

/// Cancels a sold ticket, freeing its seat.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or is not `Sold`.
pub fn cancel_ticket(
    persistence: &mut Persistence,
    ticket_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CancelTicketResponse, ApiError> {
    AuthorizationService::authorize_ticket_desk(authenticated_actor, "cancel_ticket")?;
    let cancellation: TicketCancellation = persistence
        .cancel_ticket(ticket_id)
        .map_err(|e| translate_persistence_error(e, "cancel ticket"))?;
    info!(ticket_id, cancelled_by = authenticated_actor.user_id, "Ticket cancelled");
    Ok(CancelTicketResponse {
        ticket_id: cancellation.ticket_id,
        trip_id: cancellation.trip_id,
        available_seats: cancellation.available_seats,
    })
}

fn ticket_to_print(config: &StationConfig, details: TicketDetails) -> Result<TicketPrint, ApiError> {
    let TicketDetails {
        ticket,
        trip,
        cashier_name,
        destination_name,
        bus_model,
    } = details;
    let destination: String = destination_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| String::from(UNKNOWN));
    Ok(TicketPrint {
        ticket_id: ticket.ticket_id,
        cashier_name: cashier_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_CASHIER_NAME)),
        purchased_at: format_datetime(ticket.purchased_at)?,
        route_title: format!("{} - {destination}", config.origin_city_name),
        departure_at: format_datetime(trip.departure_at)?,
        arrival_at: format_datetime(trip.arrival_at)?,
        bus_model: bus_model
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| String::from(UNKNOWN)),
        trip_number: trip.trip_id,
        seat_number: ticket.seat_number,
        payment_type: ticket.payment_type.as_str().to_string(),
        price_cents: ticket.price_cents,
        price: format_money(ticket.price_cents),
    })
}

/// Builds the print data for the given tickets, in request order.
///
/// Unknown ids are skipped.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn print_tickets(
    persistence: &mut Persistence,
    config: &StationConfig,
    request: &PrintTicketsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PrintTicketsResponse, ApiError> {
    AuthorizationService::authorize_ticket_desk(authenticated_actor, "print_tickets")?;
    let details: Vec<TicketDetails> = persistence
        .get_tickets(&request.ticket_ids)
        .map_err(|e| translate_persistence_error(e, "load tickets"))?;
    Ok(PrintTicketsResponse {
        tickets: details
            .into_iter()
            .map(|detail| ticket_to_print(config, detail))
            .collect::<Result<_, _>>()?,
    })
}

// ========================================================================
// Reports
// ========================================================================

fn build_report(
    persistence: &mut Persistence,
    config: &StationConfig,
    from: &str,
    to: &str,
    city_ids: &[i64],
) -> Result<TicketReport, ApiError> {
    let from: Date = parse_date("from", from)?;
    let to: Date = parse_date("to", to)?;
    let (start, end): (PrimitiveDateTime, PrimitiveDateTime) =
        report_bounds(from, to).map_err(translate_core_error)?;

    let sales: Vec<TicketSale> = persistence
        .load_ticket_sales(start, end, city_ids)
        .map_err(|e| translate_persistence_error(e, "load ticket sales"))?;

    aggregate_ticket_report(from, to, &config.origin_city_name, &sales, config.report_mode)
        .map_err(translate_core_error)
}

fn report_to_response(report: TicketReport, mode: ReportMode) -> TicketReportResponse {
    TicketReportResponse {
        from: report.from.to_string(),
        to: report.to.to_string(),
        mode: mode.as_str().to_string(),
        total_sold: report.total_sold,
        total_returned: report.total_returned,
        total_earned_cents: report.total_earned_cents,
        total_earned: format_money(report.total_earned_cents),
        items: report
            .items
            .into_iter()
            .map(|item| RouteReportLine {
                route_id: item.route_id,
                earned: format_money(item.earned_cents),
                route_title: item.route_title,
                sold_count: item.sold_count,
                returned_count: item.returned_count,
                earned_cents: item.earned_cents,
            })
            .collect(),
    }
}

/// Reports ticket sales per route for departures on the given days.
///
/// An empty `city_ids` covers every destination.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the dates are
/// invalid, or the query fails.
pub fn ticket_report(
    persistence: &mut Persistence,
    config: &StationConfig,
    from: &str,
    to: &str,
    city_ids: &[i64],
    authenticated_actor: &AuthenticatedActor,
) -> Result<TicketReportResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "ticket_report")?;
    let report: TicketReport = build_report(persistence, config, from, to, city_ids)?;
    Ok(report_to_response(report, config.report_mode))
}

/// Renders the ticket report as CSV with a trailing `TOTAL` row.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the report
/// fails, or the CSV cannot be written.
pub fn ticket_report_csv(
    persistence: &mut Persistence,
    config: &StationConfig,
    from: &str,
    to: &str,
    city_ids: &[i64],
    authenticated_actor: &AuthenticatedActor,
) -> Result<String, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "ticket_report")?;
    let report: TicketReport = build_report(persistence, config, from, to, city_ids)?;
    render_report_csv(&report)
}

fn csv_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write report CSV: {err}"),
    }
}

fn render_report_csv(report: &TicketReport) -> Result<String, ApiError> {
    let mut writer: csv::Writer<Vec<u8>> = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["route", "sold", "returned", "earned"])
        .map_err(csv_error)?;
    for item in &report.items {
        writer
            .write_record([
                item.route_title.clone(),
                item.sold_count.to_string(),
                item.returned_count.to_string(),
                format_money(item.earned_cents),
            ])
            .map_err(csv_error)?;
    }
    writer
        .write_record([
            String::from("TOTAL"),
            report.total_sold.to_string(),
            report.total_returned.to_string(),
            format_money(report.total_earned_cents),
        ])
        .map_err(csv_error)?;

    let bytes: Vec<u8> = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}
