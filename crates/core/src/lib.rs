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

mod error;
mod report;
mod schedule;
mod seating;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::CoreError;
pub use report::{
    ReportMode, RouteReportItem, TicketReport, TicketSale, aggregate_ticket_report, format_money,
    report_bounds,
};
pub use schedule::{
    DEFAULT_DEPARTURE_TIME, ScheduleRequest, arrival_for, departure_window, expand_departures,
    plan_trips,
};
pub use seating::{
    SaleReceipt, SeatAllocation, TicketSaleRequest, allocate_seats, available_seats,
    resolve_capacity,
};
