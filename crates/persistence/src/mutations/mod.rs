// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! ## Module Organization
//!
//! - `catalog`: Cities, routes, buses, and drivers
//! - `trips`: Schedule generation, ad-hoc trips, and range cleanup
//! - `tickets`: The sale and cancellation transactions
//! - `users`: Operator accounts and sessions
//!
//! Multi-step writes run through `PersistenceBackend::serializable_transaction`
//! and return engine rejections as `PersistenceError::Rejected` after the
//! rollback.

pub mod catalog;
pub mod tickets;
pub mod trips;
pub mod users;
