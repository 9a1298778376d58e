// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the ticket desk: sales, cancellations, and printing.

use super::helpers::{Catalog, TestContext, seed_trips, setup, station_now};
use crate::{
    ApiError, PrintTicketsRequest, SellTicketsRequest, available_seats, cancel_ticket,
    print_tickets, search_trips, sell_tickets,
};

/// Returns the id of the Monday 2026-03-02 09:30 trip.
fn monday_trip(ctx: &mut TestContext, catalog: &Catalog) -> i64 {
    search_trips(&mut ctx.persistence, catalog.city_id, "2026-03-02", station_now())
        .unwrap()
        .trips[0]
        .trip_id
}

fn sale(trip_id: i64, quantity: u32, payment_type: &str) -> SellTicketsRequest {
    SellTicketsRequest {
        trip_id,
        quantity,
        payment_type: payment_type.to_string(),
    }
}

#[test]
fn test_sell_assigns_lowest_seats() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);

    let response = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 2, "cash"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();

    assert_eq!(response.seats, vec![1, 2]);
    assert_eq!(response.ticket_ids.len(), 2);
    assert_eq!(response.available_seats, 28);
    assert_eq!(
        available_seats(&mut ctx.persistence, trip_id)
            .unwrap()
            .available_seats,
        28
    );
}

#[test]
fn test_sell_records_seller() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);

    let response = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 1, "Card"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();

    let ticket = ctx
        .persistence
        .get_ticket(response.ticket_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(ticket.sold_by_user_id, ctx.cashier.user_id);
    assert_eq!(ticket.price_cents, 45_000);
}

#[test]
fn test_sell_more_than_available_is_refused() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);

    let result = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 31, "Cash"),
        &ctx.cashier,
        station_now(),
    );

    match result.unwrap_err() {
        ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, "insufficient_capacity"),
        other => panic!("Expected DomainRuleViolation, got: {other:?}"),
    }
    assert_eq!(
        available_seats(&mut ctx.persistence, trip_id)
            .unwrap()
            .available_seats,
        30
    );
}

#[test]
fn test_sell_zero_tickets_is_invalid() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);

    let result = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 0, "Cash"),
        &ctx.cashier,
        station_now(),
    );

    match result.unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "quantity"),
        other => panic!("Expected InvalidInput, got: {other:?}"),
    }
}

#[test]
fn test_sell_unknown_payment_type_is_invalid() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);

    let result = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 1, "Barter"),
        &ctx.cashier,
        station_now(),
    );

    match result.unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "payment_type"),
        other => panic!("Expected InvalidInput, got: {other:?}"),
    }
}

#[test]
fn test_sell_unknown_trip_is_not_found() {
    let mut ctx = setup();

    let result = sell_tickets(
        &mut ctx.persistence,
        &sale(404, 1, "Cash"),
        &ctx.cashier,
        station_now(),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_available_seats_unknown_trip_is_not_found() {
    let mut ctx = setup();

    let result = available_seats(&mut ctx.persistence, 404);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_cancel_frees_seat_for_resale() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);
    let first = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 3, "Cash"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();

    let cancelled = cancel_ticket(&mut ctx.persistence, first.ticket_ids[1], &ctx.cashier).unwrap();
    assert_eq!(cancelled.trip_id, trip_id);
    assert_eq!(cancelled.available_seats, 28);

    let second = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 1, "Cash"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();
    assert_eq!(second.seats, vec![2]);
    assert_eq!(second.available_seats, 27);
}

#[test]
fn test_cancel_twice_is_invalid() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);
    let sold = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 1, "Cash"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();
    cancel_ticket(&mut ctx.persistence, sold.ticket_ids[0], &ctx.cashier).unwrap();

    let result = cancel_ticket(&mut ctx.persistence, sold.ticket_ids[0], &ctx.cashier);

    match result.unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "ticket_status"),
        other => panic!("Expected InvalidInput, got: {other:?}"),
    }
}

#[test]
fn test_cancel_unknown_ticket_is_not_found() {
    let mut ctx = setup();

    let result = cancel_ticket(&mut ctx.persistence, 404, &ctx.cashier);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_print_tickets_fills_every_field() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);
    let sold = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 2, "Card"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();

    let printed = print_tickets(
        &mut ctx.persistence,
        &ctx.config,
        &PrintTicketsRequest {
            ticket_ids: vec![sold.ticket_ids[1], sold.ticket_ids[0]],
        },
        &ctx.cashier,
    )
    .unwrap()
    .tickets;

    assert_eq!(printed.len(), 2);
    let ticket = &printed[0];
    assert_eq!(ticket.ticket_id, sold.ticket_ids[1]);
    assert_eq!(ticket.seat_number, 2);
    assert_eq!(ticket.cashier_name, "Anna Smirnova");
    assert_eq!(ticket.route_title, "Ivanovo - Kostroma");
    assert_eq!(ticket.bus_model, "PAZ 3205");
    assert_eq!(ticket.trip_number, trip_id);
    assert_eq!(ticket.departure_at, "2026-03-02 09:30:00");
    assert_eq!(ticket.arrival_at, "2026-03-02 11:30:00");
    assert_eq!(ticket.purchased_at, "2026-03-01 10:15:00");
    assert_eq!(ticket.payment_type, "Card");
    assert_eq!(ticket.price_cents, 45_000);
    assert_eq!(ticket.price, "450.00");
    assert_eq!(printed[1].seat_number, 1);
}

#[test]
fn test_print_tickets_skips_unknown_ids() {
    let mut ctx = setup();
    let catalog = seed_trips(&mut ctx);
    let trip_id = monday_trip(&mut ctx, &catalog);
    let sold = sell_tickets(
        &mut ctx.persistence,
        &sale(trip_id, 1, "Cash"),
        &ctx.cashier,
        station_now(),
    )
    .unwrap();

    let printed = print_tickets(
        &mut ctx.persistence,
        &ctx.config,
        &PrintTicketsRequest {
            ticket_ids: vec![9_999, sold.ticket_ids[0]],
        },
        &ctx.admin,
    )
    .unwrap()
    .tickets;

    assert_eq!(printed.len(), 1);
    assert_eq!(printed[0].ticket_id, sold.ticket_ids[0]);
}
