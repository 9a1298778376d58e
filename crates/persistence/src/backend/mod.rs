// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Connection setup, migrations, pragmas, and the isolation primitives used
//! by the sale and schedule transactions live here. Everything else is
//! written once in Diesel DSL under `queries/` and `mutations/`.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};
use tracing::warn;

use crate::error::PersistenceError;

/// Backend operations that Diesel DSL cannot express uniformly.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so that the
/// bodies generated by `backend_fn!` can call them without knowing which
/// backend they run on.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Runs `f` inside a transaction at the strictest isolation the backend
    /// offers.
    ///
    /// On `SQLite` the write lock is taken before the first read
    /// (`BEGIN IMMEDIATE`). On `MySQL` the transaction runs at
    /// `SERIALIZABLE` and is run again, up to
    /// [`mysql::MAX_CONFLICT_ATTEMPTS`] times, when the server aborts it as a
    /// deadlock victim. Any error returned by `f` rolls the transaction back.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a database error if the transaction
    /// cannot be started or committed.
    fn serializable_transaction<T, F>(&mut self, f: F) -> Result<T, PersistenceError>
    where
        F: FnMut(&mut Self) -> Result<T, PersistenceError>;

    /// Makes concurrent sales and cancellations on one trip wait for each
    /// other. Must be called inside `serializable_transaction` before the
    /// trip's seats are read.
    ///
    /// A missing trip is not an error here; the caller reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be taken.
    fn lock_trip_for_sale(&mut self, trip_id: i64) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn serializable_transaction<T, F>(&mut self, f: F) -> Result<T, PersistenceError>
    where
        F: FnMut(&mut Self) -> Result<T, PersistenceError>,
    {
        self.immediate_transaction(f)
    }

    fn lock_trip_for_sale(&mut self, _trip_id: i64) -> Result<(), PersistenceError> {
        // BEGIN IMMEDIATE already holds the database write lock.
        Ok(())
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn serializable_transaction<T, F>(&mut self, mut f: F) -> Result<T, PersistenceError>
    where
        F: FnMut(&mut Self) -> Result<T, PersistenceError>,
    {
        let mut attempt: u32 = 1;
        loop {
            mysql::set_serializable_isolation(self)?;
            match self.transaction(&mut f) {
                Err(err)
                    if err.is_serialization_conflict()
                        && attempt < mysql::MAX_CONFLICT_ATTEMPTS =>
                {
                    warn!(attempt, error = %err, "Serializable transaction aborted, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn lock_trip_for_sale(&mut self, trip_id: i64) -> Result<(), PersistenceError> {
        mysql::lock_trip_row(self, trip_id)
    }
}
