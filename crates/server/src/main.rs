// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use bus_station::ReportMode;
use bus_station_api::{
    ApiError, AuthenticationService, AvailableSeatsResponse, CancelTicketResponse,
    CityExistsResponse, CreateBusRequest, CreateBusResponse, CreateCityRequest,
    CreateCityResponse, CreateDriverRequest, CreateDriverResponse, CreateFirstAdminRequest,
    CreateFirstAdminResponse, CreateRouteRequest, CreateRouteResponse, CreateRouteWithCityRequest,
    CreateTripRequest, CreateTripResponse, CreateUserRequest, CreateUserResponse,
    DeleteTripsResponse, GenerateScheduleRequest, GenerateScheduleResponse, ListBusesResponse,
    ListCitiesResponse, ListDriversResponse, ListRoutesResponse, ListTripsResponse,
    ListUsersResponse, LoginRequest, LoginResponse, MessageResponse, PrintTicketsRequest,
    PrintTicketsResponse, SellTicketsRequest, SellTicketsResponse, StationConfig,
    TicketReportResponse, UpdateUserRequest, UpdateUserResponse, WhoAmIResponse,
    available_seats, cancel_ticket, city_exists, create_bus, create_city, create_driver,
    create_first_admin, create_route, create_route_with_city, create_trip, create_user,
    delete_trips, delete_user, generate_schedule, list_buses, list_cities, list_drivers,
    list_routes, list_trips, list_users, login, logout, parse_id_list, print_tickets,
    search_trips, sell_tickets, ticket_report, ticket_report_csv, update_user, whoami,
};
use bus_station_persistence::Persistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use time::PrimitiveDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::session::{SessionUser, bearer_token};

/// How often expired sessions are purged.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Bus Station Server - HTTP server for the bus station ticketing system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// The city every route departs from
    #[arg(long, default_value = bus_station_api::DEFAULT_ORIGIN_CITY)]
    origin_city: String,

    /// IANA timezone of the station's wall clock
    #[arg(long, default_value = bus_station_api::DEFAULT_TIMEZONE)]
    timezone: String,

    /// How ticket statuses are counted in reports (`by-status` or `all-as-sold`)
    #[arg(long, default_value = "by-status")]
    report_mode: ReportMode,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The store, behind a mutex so one request touches it at a time.
    persistence: Arc<Mutex<Persistence>>,
    /// Fan-out for live events.
    broadcaster: Arc<LiveEventBroadcaster>,
    /// Station-wide settings.
    config: Arc<StationConfig>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

/// Query parameters for day ranges.
#[derive(Debug, Deserialize)]
struct DateRangeQuery {
    /// First day, `YYYY-MM-DD`.
    from: String,
    /// Last day, inclusive.
    to: String,
}

/// Query parameters for the city existence check.
#[derive(Debug, Deserialize)]
struct CityNameQuery {
    name: String,
}

/// Query parameters for the ticket desk trip lookup.
#[derive(Debug, Deserialize)]
struct TripSearchQuery {
    city_id: i64,
    date: String,
}

/// Query parameters for ticket reports.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    from: String,
    to: String,
    /// Comma-separated destination city ids. Empty means all.
    #[serde(default)]
    city_ids: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn station_now(app_state: &AppState) -> Result<PrimitiveDateTime, HttpError> {
    Ok(app_state.config.clock().now()?)
}

// ========================================================================
// Authentication
// ========================================================================

/// Handler for POST `/auth/bootstrap`.
///
/// Creates the first administrator while the store has no users.
async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateFirstAdminRequest>,
) -> Result<Json<CreateFirstAdminResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling bootstrap request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateFirstAdminResponse = create_first_admin(&mut persistence, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, HttpError> {
    let token: &str = bearer_token(&headers).map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })?;

    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, token)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/auth/me`.
async fn handle_whoami(SessionUser(actor, user): SessionUser) -> Json<WhoAmIResponse> {
    Json(whoami(&actor, &user))
}

// ========================================================================
// Users
// ========================================================================

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListUsersResponse = list_users(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, HttpError> {
    info!(actor = %actor.login_name, login_name = %req.login_name, "Handling create_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateUserResponse = create_user(&mut persistence, req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PUT `/users/{user_id}`.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, HttpError> {
    info!(actor = %actor.login_name, user_id, "Handling update_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: UpdateUserResponse = update_user(&mut persistence, user_id, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/users/{user_id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(actor = %actor.login_name, user_id, "Handling delete_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_user(&mut persistence, user_id, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

// ========================================================================
// Catalog
// ========================================================================

/// Handler for GET `/cities`.
async fn handle_list_cities(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
) -> Result<Json<ListCitiesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListCitiesResponse = list_cities(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/cities/exists`.
async fn handle_city_exists(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
    Query(query): Query<CityNameQuery>,
) -> Result<Json<CityExistsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CityExistsResponse = city_exists(&mut persistence, &query.name)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/cities`.
async fn handle_create_city(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateCityRequest>,
) -> Result<Json<CreateCityResponse>, HttpError> {
    info!(actor = %actor.login_name, name = %req.name, "Handling create_city request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateCityResponse = create_city(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/routes`.
async fn handle_list_routes(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
) -> Result<Json<ListRoutesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRoutesResponse = list_routes(&mut persistence, &app_state.config)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/routes`.
async fn handle_create_route(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateRouteRequest>,
) -> Result<Json<CreateRouteResponse>, HttpError> {
    info!(
        actor = %actor.login_name,
        destination_city_id = req.destination_city_id,
        "Handling create_route request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateRouteResponse =
        create_route(&mut persistence, &app_state.config, &req, &actor)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::RouteCreated {
        route_id: response.route_id,
    });
    Ok(Json(response))
}

/// Handler for POST `/routes/with_city`.
async fn handle_create_route_with_city(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateRouteWithCityRequest>,
) -> Result<Json<CreateRouteResponse>, HttpError> {
    info!(
        actor = %actor.login_name,
        city_name = %req.city_name,
        "Handling create_route_with_city request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateRouteResponse =
        create_route_with_city(&mut persistence, &app_state.config, &req, &actor)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::RouteCreated {
        route_id: response.route_id,
    });
    Ok(Json(response))
}

/// Handler for GET `/buses`.
async fn handle_list_buses(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
) -> Result<Json<ListBusesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBusesResponse = list_buses(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/buses`.
async fn handle_create_bus(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateBusRequest>,
) -> Result<Json<CreateBusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateBusResponse = create_bus(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/drivers`.
async fn handle_list_drivers(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
) -> Result<Json<ListDriversResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListDriversResponse = list_drivers(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/drivers`.
async fn handle_create_driver(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateDriverRequest>,
) -> Result<Json<CreateDriverResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateDriverResponse = create_driver(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

// ========================================================================
// Schedule & trips
// ========================================================================

/// Handler for POST `/schedule/generate`.
async fn handle_generate_schedule(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<GenerateScheduleRequest>,
) -> Result<Json<GenerateScheduleResponse>, HttpError> {
    info!(
        actor = %actor.login_name,
        route_id = req.route_id,
        start_date = %req.start_date,
        end_date = %req.end_date,
        "Handling generate_schedule request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateScheduleResponse = generate_schedule(&mut persistence, &req, &actor)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::ScheduleGenerated {
            route_id: response.route_id,
            created: response.created,
        });
    Ok(Json(response))
}

/// Handler for GET `/trips`.
async fn handle_list_trips(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ListTripsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListTripsResponse = list_trips(&mut persistence, &query.from, &query.to)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/trips`.
async fn handle_create_trip(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<CreateTripRequest>,
) -> Result<Json<CreateTripResponse>, HttpError> {
    info!(actor = %actor.login_name, route_id = req.route_id, "Handling create_trip request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateTripResponse = create_trip(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/trips`.
async fn handle_delete_trips(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DeleteTripsResponse>, HttpError> {
    info!(
        actor = %actor.login_name,
        from = %query.from,
        to = %query.to,
        "Handling delete_trips request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteTripsResponse =
        delete_trips(&mut persistence, &query.from, &query.to, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/trips/search`.
async fn handle_search_trips(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
    Query(query): Query<TripSearchQuery>,
) -> Result<Json<ListTripsResponse>, HttpError> {
    let now: PrimitiveDateTime = station_now(&app_state)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ListTripsResponse =
        search_trips(&mut persistence, query.city_id, &query.date, now)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/trips/{trip_id}/seats`.
async fn handle_available_seats(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(..): SessionUser,
    Path(trip_id): Path<i64>,
) -> Result<Json<AvailableSeatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AvailableSeatsResponse = available_seats(&mut persistence, trip_id)?;
    drop(persistence);
    Ok(Json(response))
}

// ========================================================================
// Tickets
// ========================================================================

/// Handler for POST `/tickets/sell`.
async fn handle_sell_tickets(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<SellTicketsRequest>,
) -> Result<Json<SellTicketsResponse>, HttpError> {
    info!(
        actor = %actor.login_name,
        trip_id = req.trip_id,
        quantity = req.quantity,
        "Handling sell_tickets request"
    );
    let now: PrimitiveDateTime = station_now(&app_state)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: SellTicketsResponse = sell_tickets(&mut persistence, &req, &actor, now)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::SeatsChanged {
        trip_id: response.trip_id,
        available_seats: response.available_seats,
    });
    Ok(Json(response))
}

/// Handler for POST `/tickets/{ticket_id}/cancel`.
async fn handle_cancel_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Path(ticket_id): Path<i64>,
) -> Result<Json<CancelTicketResponse>, HttpError> {
    info!(actor = %actor.login_name, ticket_id, "Handling cancel_ticket request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CancelTicketResponse = cancel_ticket(&mut persistence, ticket_id, &actor)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::SeatsChanged {
        trip_id: response.trip_id,
        available_seats: response.available_seats,
    });
    Ok(Json(response))
}

/// Handler for POST `/tickets/print`.
async fn handle_print_tickets(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Json(req): Json<PrintTicketsRequest>,
) -> Result<Json<PrintTicketsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PrintTicketsResponse =
        print_tickets(&mut persistence, &app_state.config, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

// ========================================================================
// Reports
// ========================================================================

/// Handler for GET `/reports/tickets`.
async fn handle_ticket_report(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<TicketReportResponse>, HttpError> {
    let city_ids: Vec<i64> =
        parse_id_list("city_ids", query.city_ids.as_deref().unwrap_or_default())?;

    let mut persistence = app_state.persistence.lock().await;
    let response: TicketReportResponse = ticket_report(
        &mut persistence,
        &app_state.config,
        &query.from,
        &query.to,
        &city_ids,
        &actor,
    )?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/reports/tickets.csv`.
async fn handle_ticket_report_csv(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _): SessionUser,
    Query(query): Query<ReportQuery>,
) -> Result<Response, HttpError> {
    let city_ids: Vec<i64> =
        parse_id_list("city_ids", query.city_ids.as_deref().unwrap_or_default())?;

    let mut persistence = app_state.persistence.lock().await;
    let body: String = ticket_report_csv(
        &mut persistence,
        &app_state.config,
        &query.from,
        &query.to,
        &city_ids,
        &actor,
    )?;
    drop(persistence);

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/users", get(handle_list_users).post(handle_create_user))
        .route(
            "/users/{user_id}",
            put(handle_update_user).delete(handle_delete_user),
        )
        .route("/cities", get(handle_list_cities).post(handle_create_city))
        .route("/cities/exists", get(handle_city_exists))
        .route("/routes", get(handle_list_routes).post(handle_create_route))
        .route("/routes/with_city", post(handle_create_route_with_city))
        .route("/buses", get(handle_list_buses).post(handle_create_bus))
        .route("/drivers", get(handle_list_drivers).post(handle_create_driver))
        .route("/schedule/generate", post(handle_generate_schedule))
        .route(
            "/trips",
            get(handle_list_trips)
                .post(handle_create_trip)
                .delete(handle_delete_trips),
        )
        .route("/trips/search", get(handle_search_trips))
        .route("/trips/{trip_id}/seats", get(handle_available_seats))
        .route("/tickets/sell", post(handle_sell_tickets))
        .route("/tickets/{ticket_id}/cancel", post(handle_cancel_ticket))
        .route("/tickets/print", post(handle_print_tickets))
        .route("/reports/tickets", get(handle_ticket_report))
        .route("/reports/tickets.csv", get(handle_ticket_report_csv))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Drops expired sessions on a fixed interval.
async fn purge_sessions_periodically(persistence: Arc<Mutex<Persistence>>) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        let mut guard = persistence.lock().await;
        match AuthenticationService::purge_expired_sessions(&mut guard) {
            Ok(0) => {}
            Ok(purged) => info!(purged, "Purged expired sessions"),
            Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Bus Station Server");

    let config: StationConfig =
        StationConfig::new(&args.origin_city, &args.timezone, args.report_mode)?;
    info!(
        origin_city = %config.origin_city_name,
        timezone = %config.timezone,
        report_mode = config.report_mode.as_str(),
        "Station configured"
    );

    let persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
        config: Arc::new(config),
    };

    tokio::spawn(purge_sessions_periodically(Arc::clone(
        &app_state.persistence,
    )));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
