// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket sales reporting.

use std::collections::HashMap;
use std::str::FromStr;

use bus_station_domain::{
    TicketStatus, end_of_day_exclusive, route_title, start_of_day,
    validate_date_range,
};
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::error::CoreError;

/// How ticket statuses are counted in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportMode {
    /// `Sold` counts as sold and earns; any other status counts as returned.
    #[default]
    ByStatus,
    /// Every ticket counts as sold and earns, whatever its status.
    AllAsSold,
}

impl ReportMode {
    /// The command-line spelling of this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ByStatus => "by-status",
            Self::AllAsSold => "all-as-sold",
        }
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "by-status" => Ok(Self::ByStatus),
            "all-as-sold" => Ok(Self::AllAsSold),
            other => Err(format!(
                "Unknown report mode '{other}'. Must be 'by-status' or 'all-as-sold'"
            )),
        }
    }
}

/// One ticket row selected for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSale {
    /// The trip's route.
    pub route_id: i64,
    /// Destination city name of the route, if it still resolves.
    pub destination_name: Option<String>,
    /// Ticket status.
    pub status: TicketStatus,
    /// Price paid.
    pub price_cents: i64,
}

/// Per-route line of a ticket report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReportItem {
    /// The route.
    pub route_id: i64,
    /// Display title, `"<origin> - <destination>"`.
    pub route_title: String,
    /// Tickets counted as sold.
    pub sold_count: u64,
    /// Tickets counted as returned.
    pub returned_count: u64,
    /// Sum of prices of tickets counted as sold.
    pub earned_cents: i64,
}

/// A ticket sales report for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReport {
    /// First day covered.
    pub from: Date,
    /// Last day covered.
    pub to: Date,
    /// Total tickets counted as sold.
    pub total_sold: u64,
    /// Total tickets counted as returned.
    pub total_returned: u64,
    /// Total earnings.
    pub total_earned_cents: i64,
    /// Per-route lines, most sold first.
    pub items: Vec<RouteReportItem>,
}

/// Returns the half-open departure window `[from 00:00, to+1 00:00)`.
///
/// # Errors
///
/// Returns a validation error if `from > to` or the end overflows.
pub fn report_bounds(
    from: Date,
    to: Date,
) -> Result<(PrimitiveDateTime, PrimitiveDateTime), CoreError> {
    validate_date_range(from, to)?;
    let end: PrimitiveDateTime = end_of_day_exclusive(to)?;
    Ok((start_of_day(from), end))
}

/// Aggregates ticket sales by route.
///
/// Routes are ordered by sold count descending, then by title ascending.
///
/// # Arguments
///
/// * `from` - First day covered
/// * `to` - Last day covered
/// * `origin` - The station's own city name, used in route titles
/// * `sales` - Tickets on trips departing within the window
/// * `mode` - How statuses are counted
///
/// # Errors
///
/// Returns a validation error if `from > to`.
pub fn aggregate_ticket_report(
    from: Date,
    to: Date,
    origin: &str,
    sales: &[TicketSale],
    mode: ReportMode,
) -> Result<TicketReport, CoreError> {
    validate_date_range(from, to)?;

    let mut by_route: HashMap<i64, RouteReportItem> = HashMap::new();

    for sale in sales {
        let sold: bool = match mode {
            ReportMode::ByStatus => sale.status == TicketStatus::Sold,
            ReportMode::AllAsSold => true,
        };

        let item: &mut RouteReportItem =
            by_route
                .entry(sale.route_id)
                .or_insert_with(|| RouteReportItem {
                    route_id: sale.route_id,
                    route_title: route_title(
                        origin,
                        sale.route_id,
                        sale.destination_name.as_deref(),
                    ),
                    sold_count: 0,
                    returned_count: 0,
                    earned_cents: 0,
                });

        if sold {
            item.sold_count += 1;
            item.earned_cents = item
                .earned_cents
                .checked_add(sale.price_cents)
                .ok_or_else(|| CoreError::DataIntegrity(String::from("Route earnings overflow")))?;
        } else {
            item.returned_count += 1;
        }
    }

    let mut items: Vec<RouteReportItem> = by_route.into_values().collect();
    items.sort_by(|a, b| {
        b.sold_count
            .cmp(&a.sold_count)
            .then_with(|| a.route_title.cmp(&b.route_title))
    });

    let total_sold: u64 = items.iter().map(|item| item.sold_count).sum();
    let total_returned: u64 = items.iter().map(|item| item.returned_count).sum();
    let total_earned_cents: i64 = items
        .iter()
        .try_fold(0_i64, |total, item| total.checked_add(item.earned_cents))
        .ok_or_else(|| CoreError::DataIntegrity(String::from("Report earnings overflow")))?;

    Ok(TicketReport {
        from,
        to,
        total_sold,
        total_returned,
        total_earned_cents,
        items,
    })
}

/// Formats minor currency units with two decimals, e.g. `12345` as `"123.45"`.
#[must_use]
pub fn format_money(cents: i64) -> String {
    let sign: &str = if cents < 0 { "-" } else { "" };
    let abs: u64 = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
