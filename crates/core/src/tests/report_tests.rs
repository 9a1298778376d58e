// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bus_station_domain::TicketStatus;
use time::macros::{date, datetime};

use super::helpers::sale;
use crate::{
    CoreError, ReportMode, TicketReport, TicketSale, aggregate_ticket_report, format_money,
    report_bounds,
};

fn create_sales() -> Vec<TicketSale> {
    vec![
        sale(1, Some("Moscow"), TicketStatus::Sold, 100_000),
        sale(1, Some("Moscow"), TicketStatus::Sold, 100_000),
        sale(1, Some("Moscow"), TicketStatus::Returned, 100_000),
        sale(2, Some("Kostroma"), TicketStatus::Sold, 50_050),
        sale(2, Some("Kostroma"), TicketStatus::Cancelled, 50_050),
        sale(3, None, TicketStatus::Sold, 30_000),
    ]
}

#[test]
fn test_report_counts_by_status() {
    let report: TicketReport = aggregate_ticket_report(
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        "Ivanovo",
        &create_sales(),
        ReportMode::ByStatus,
    )
    .unwrap();

    assert_eq!(report.items.len(), 3);
    assert_eq!(report.items[0].route_title, "Ivanovo - Moscow");
    assert_eq!(report.items[0].sold_count, 2);
    assert_eq!(report.items[0].returned_count, 1);
    assert_eq!(report.items[0].earned_cents, 200_000);
    assert_eq!(report.items[2].sold_count, 1);
    assert_eq!(report.items[2].returned_count, 1);
    assert_eq!(report.total_sold, 4);
    assert_eq!(report.total_returned, 2);
    assert_eq!(report.total_earned_cents, 280_050);
}

#[test]
fn test_report_ties_ordered_by_title() {
    let report: TicketReport = aggregate_ticket_report(
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        "Ivanovo",
        &create_sales(),
        ReportMode::ByStatus,
    )
    .unwrap();

    let titles: Vec<&str> = report
        .items
        .iter()
        .map(|item| item.route_title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Ivanovo - Moscow", "Ivanovo - #3", "Ivanovo - Kostroma"]
    );
}

#[test]
fn test_report_all_as_sold_ignores_status() {
    let report: TicketReport = aggregate_ticket_report(
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        "Ivanovo",
        &create_sales(),
        ReportMode::AllAsSold,
    )
    .unwrap();

    assert_eq!(report.items[0].sold_count, 3);
    assert_eq!(report.items[0].returned_count, 0);
    assert_eq!(report.items[1].route_title, "Ivanovo - Kostroma");
    assert_eq!(report.items[1].sold_count, 2);
    assert_eq!(report.total_sold, 6);
    assert_eq!(report.total_returned, 0);
    assert_eq!(report.total_earned_cents, 430_100);
}

#[test]
fn test_report_empty_sales() {
    let report: TicketReport = aggregate_ticket_report(
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 01),
        "Ivanovo",
        &[],
        ReportMode::ByStatus,
    )
    .unwrap();

    assert!(report.items.is_empty());
    assert_eq!(report.total_earned_cents, 0);
}

#[test]
fn test_report_total_overflow_is_an_integrity_error() {
    let sales: Vec<TicketSale> = vec![
        sale(1, Some("Moscow"), TicketStatus::Sold, i64::MAX),
        sale(2, Some("Kostroma"), TicketStatus::Sold, 1),
    ];

    let result: Result<TicketReport, CoreError> = aggregate_ticket_report(
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        "Ivanovo",
        &sales,
        ReportMode::ByStatus,
    );

    assert!(matches!(result.unwrap_err(), CoreError::DataIntegrity(_)));
}

#[test]
fn test_report_rejects_inverted_range() {
    let result: Result<TicketReport, CoreError> = aggregate_ticket_report(
        date!(2026 - 03 - 02),
        date!(2026 - 03 - 01),
        "Ivanovo",
        &[],
        ReportMode::ByStatus,
    );

    assert!(matches!(result.unwrap_err(), CoreError::Validation(_)));
}

#[test]
fn test_report_bounds_are_half_open_days() {
    let (start, end) = report_bounds(date!(2026 - 03 - 01), date!(2026 - 03 - 31)).unwrap();

    assert_eq!(start, datetime!(2026 - 03 - 01 00:00));
    assert_eq!(end, datetime!(2026 - 04 - 01 00:00));
}

#[test]
fn test_report_mode_parsing() {
    assert_eq!("by-status".parse::<ReportMode>().unwrap(), ReportMode::ByStatus);
    assert_eq!(
        "all-as-sold".parse::<ReportMode>().unwrap(),
        ReportMode::AllAsSold
    );
    assert!("everything".parse::<ReportMode>().is_err());
    assert_eq!(ReportMode::default(), ReportMode::ByStatus);
}

#[test]
fn test_format_money() {
    assert_eq!(format_money(280_050), "2800.50");
    assert_eq!(format_money(5), "0.05");
    assert_eq!(format_money(0), "0.00");
    assert_eq!(format_money(-150), "-1.50");
}
