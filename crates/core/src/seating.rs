// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat allocation for ticket sales.
//!
//! These functions operate on a snapshot of a trip's occupied seats. They
//! are only correct when the snapshot and the resulting insert happen inside
//! one serializable transaction.

use std::collections::BTreeSet;

use bus_station_domain::{PaymentType, validate_ticket_quantity};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A request to sell `quantity` tickets on one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSaleRequest {
    /// The trip to sell on.
    pub trip_id: i64,
    /// Number of seats wanted.
    pub quantity: u32,
    /// The cashier making the sale.
    pub sold_by_user_id: i64,
    /// How the passenger pays.
    pub payment_type: PaymentType,
}

impl TicketSaleRequest {
    /// Checks the request's own fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `quantity` is zero.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_ticket_quantity(self.quantity)?;
        Ok(())
    }
}

/// The stored result of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    /// The trip sold on.
    pub trip_id: i64,
    /// New ticket ids, in seat order.
    pub ticket_ids: Vec<i64>,
    /// Allocated seat numbers, ascending.
    pub seats: Vec<u32>,
    /// The trip's available seats after the sale.
    pub available_seats: u32,
}

/// The outcome of a successful seat allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAllocation {
    /// Allocated seat numbers, ascending.
    pub seats: Vec<u32>,
    /// The trip's capacity used for the allocation.
    pub capacity: u32,
    /// Seats still free once the allocation is stored.
    pub available_after: u32,
}

/// Determines a trip's seat capacity.
///
/// The assigned bus's seat count wins. Without a bus, capacity is inferred
/// from the stored available count plus the seats already occupied.
///
/// # Arguments
///
/// * `bus_seats` - Seat count of the assigned bus, if the bus exists
/// * `stored_available` - The trip's denormalised available seat count
/// * `occupied` - Number of seats held by non-cancelled tickets
///
/// # Errors
///
/// Returns `DataIntegrity` if no positive capacity can be derived.
pub fn resolve_capacity(
    bus_seats: Option<u32>,
    stored_available: u32,
    occupied: usize,
) -> Result<u32, CoreError> {
    if let Some(seats) = bus_seats.filter(|seats| *seats > 0) {
        return Ok(seats);
    }

    let occupied: u32 = u32::try_from(occupied)
        .map_err(|_| CoreError::DataIntegrity(String::from("Occupied seat count overflow")))?;
    let inferred: u32 = stored_available.saturating_add(occupied);
    if inferred == 0 {
        return Err(CoreError::DataIntegrity(String::from(
            "Could not determine trip capacity",
        )));
    }
    Ok(inferred)
}

/// Seats still free given a capacity and the number occupied. Never negative.
#[must_use]
pub fn available_seats(capacity: u32, occupied_count: usize) -> u32 {
    let occupied: u32 = u32::try_from(occupied_count).unwrap_or(u32::MAX);
    capacity.saturating_sub(occupied)
}

/// Picks `quantity` free seats, lowest numbers first.
///
/// Every entry of `occupied` is one non-cancelled ticket and counts against
/// capacity, even a seat number outside `1..=capacity` or a repeated one.
///
/// # Errors
///
/// * `InsufficientCapacity` if fewer than `quantity` seats are free.
/// * `AllocationFailed` if the walk over `1..=capacity` finds fewer seats
///   than the free count promised.
pub fn allocate_seats(
    capacity: u32,
    occupied: &[u32],
    quantity: u32,
) -> Result<SeatAllocation, CoreError> {
    let free: u32 = available_seats(capacity, occupied.len());

    if free < quantity {
        return Err(CoreError::InsufficientCapacity {
            free,
            requested: quantity,
        });
    }

    let taken: BTreeSet<u32> = occupied.iter().copied().collect();
    let seats: Vec<u32> = (1..=capacity)
        .filter(|seat| !taken.contains(seat))
        .take(quantity as usize)
        .collect();

    let found: u32 = u32::try_from(seats.len()).unwrap_or(u32::MAX);
    if found != quantity {
        return Err(CoreError::AllocationFailed {
            found,
            requested: quantity,
        });
    }

    Ok(SeatAllocation {
        seats,
        capacity,
        available_after: free - quantity,
    })
}
