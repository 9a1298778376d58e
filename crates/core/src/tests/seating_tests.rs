// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bus_station_domain::{DomainError, PaymentType};

use crate::{
    CoreError, SeatAllocation, TicketSaleRequest, allocate_seats, available_seats,
    resolve_capacity,
};

#[test]
fn test_allocate_lowest_free_seats() {
    let allocation: SeatAllocation = allocate_seats(10, &[1, 2, 4], 3).unwrap();

    assert_eq!(allocation.seats, vec![3, 5, 6]);
    assert_eq!(allocation.capacity, 10);
    assert_eq!(allocation.available_after, 4);
}

#[test]
fn test_allocate_fills_last_seats() {
    let allocation: SeatAllocation = allocate_seats(30, &(1..=28).collect::<Vec<u32>>(), 2).unwrap();

    assert_eq!(allocation.seats, vec![29, 30]);
    assert_eq!(allocation.available_after, 0);
}

#[test]
fn test_allocate_reports_insufficient_capacity() {
    let occupied: Vec<u32> = (1..=28).collect();

    let result: Result<SeatAllocation, CoreError> = allocate_seats(30, &occupied, 3);

    assert_eq!(
        result.unwrap_err(),
        CoreError::InsufficientCapacity {
            free: 2,
            requested: 3
        }
    );
}

#[test]
fn test_insufficient_capacity_message() {
    let err: CoreError = CoreError::InsufficientCapacity {
        free: 2,
        requested: 3,
    };

    assert_eq!(err.to_string(), "Not enough free seats. Free: 2, requested: 3");
}

#[test]
fn test_allocate_counts_out_of_range_occupied_seats() {
    let mut occupied: Vec<u32> = (1..=28).collect();
    occupied.push(35);

    let result: Result<SeatAllocation, CoreError> = allocate_seats(30, &occupied, 2);

    assert_eq!(
        result.unwrap_err(),
        CoreError::InsufficientCapacity {
            free: 1,
            requested: 2
        }
    );
}

#[test]
fn test_allocate_counts_duplicate_occupied_seats() {
    let result: Result<SeatAllocation, CoreError> = allocate_seats(3, &[1, 1], 2);

    assert_eq!(
        result.unwrap_err(),
        CoreError::InsufficientCapacity {
            free: 1,
            requested: 2
        }
    );
}

#[test]
fn test_allocate_skips_stray_seat_numbers_when_space_remains() {
    let allocation: SeatAllocation = allocate_seats(4, &[2, 40], 2).unwrap();

    assert_eq!(allocation.seats, vec![1, 3]);
    assert_eq!(allocation.available_after, 0);
}

#[test]
fn test_resolve_capacity_prefers_bus() {
    assert_eq!(resolve_capacity(Some(40), 3, 10).unwrap(), 40);
}

#[test]
fn test_resolve_capacity_infers_without_bus() {
    assert_eq!(resolve_capacity(None, 12, 8).unwrap(), 20);
    assert_eq!(resolve_capacity(Some(0), 12, 8).unwrap(), 20);
}

#[test]
fn test_resolve_capacity_fails_when_nothing_known() {
    assert!(matches!(
        resolve_capacity(None, 0, 0).unwrap_err(),
        CoreError::DataIntegrity(_)
    ));
}

#[test]
fn test_available_seats_never_negative() {
    assert_eq!(available_seats(30, 28), 2);
    assert_eq!(available_seats(30, 35), 0);
}

#[test]
fn test_sale_request_rejects_zero_quantity() {
    let request: TicketSaleRequest = TicketSaleRequest {
        trip_id: 1,
        quantity: 0,
        sold_by_user_id: 2,
        payment_type: PaymentType::Cash,
    };

    assert_eq!(
        request.validate().unwrap_err(),
        CoreError::Validation(DomainError::InvalidQuantity { quantity: 0 })
    );
}
