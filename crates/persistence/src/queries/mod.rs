// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `catalog`: Cities, routes, buses, and drivers
//! - `trips`: Trip lookups by id, range, and destination
//! - `tickets`: Occupied seats, availability, and print details
//! - `reports`: Ticket rows feeding the sales report
//! - `users`: Operator accounts and sessions
//!
//! ## Backend-Specific Functions
//!
//! Every query is generated twice by `backend_fn!`, suffixed `_sqlite` and
//! `_mysql`. The `Persistence` adapter in `lib.rs` picks one per call.

pub mod catalog;
pub mod reports;
pub mod tickets;
pub mod trips;
pub mod users;

// Not backend-specific.
pub use users::verify_password;
