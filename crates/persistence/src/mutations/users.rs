// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator account and session mutations.
//!
//! Passwords are hashed with bcrypt before storage. Login names are stored
//! uppercase.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{sessions, tickets, users};
use crate::error::PersistenceError;

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

backend_fn! {
/// Creates a new user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `login_name` - Unique login, stored uppercase
/// * `full_name` - Display name
/// * `password` - Plain-text password, hashed before storage
/// * `role` - `Administrator` or `Cashier`
/// * `created_at` - ISO 8601 creation timestamp
///
/// # Errors
///
/// Returns an error if hashing fails or the login is already taken.
pub fn create_user(
    conn: &mut _,
    login_name: &str,
    full_name: &str,
    password: &str,
    role: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = login_name.trim().to_uppercase();
    let password_hash: String = hash_password(password)?;

    diesel::insert_into(users::table)
        .values((
            users::login_name.eq(&normalized_login),
            users::full_name.eq(full_name.trim()),
            users::password_hash.eq(&password_hash),
            users::role.eq(role),
            users::created_at.eq(created_at),
        ))
        .execute(conn)?;
    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, login_name = %normalized_login, role, "User created");
    Ok(user_id)
}
}

backend_fn! {
/// Updates a user's login and display name.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist.
pub fn update_user(
    conn: &mut _,
    user_id: i64,
    login_name: &str,
    full_name: &str,
) -> Result<(), PersistenceError> {
    let normalized_login: String = login_name.trim().to_uppercase();

    let updated: usize = diesel::update(users::table.find(user_id))
        .set((
            users::login_name.eq(&normalized_login),
            users::full_name.eq(full_name.trim()),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("User {user_id} not found")));
    }

    info!(user_id, login_name = %normalized_login, "User updated");
    Ok(())
}
}

backend_fn! {
/// Replaces a user's password.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist.
pub fn update_password(
    conn: &mut _,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    let password_hash: String = hash_password(new_password)?;

    let updated: usize = diesel::update(users::table.find(user_id))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("User {user_id} not found")));
    }

    info!(user_id, "Password updated");
    Ok(())
}
}

backend_fn! {
/// Deletes a user and their sessions.
///
/// # Errors
///
/// * `UserReferenced` if any ticket was sold by the user.
/// * `NotFound` if the user does not exist.
pub fn delete_user(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    conn.serializable_transaction(|conn| {
        let sold: i64 = tickets::table
            .filter(tickets::sold_by_user_id.eq(user_id))
            .count()
            .get_result(conn)?;
        if sold > 0 {
            return Err(PersistenceError::UserReferenced { user_id });
        }

        diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)?;
        let deleted: usize = diesel::delete(users::table.find(user_id)).execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!("User {user_id} not found")));
        }

        info!(user_id, "User deleted");
        Ok(())
    })
}
}

backend_fn! {
/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(conn: &mut _, user_id: i64, at: &str) -> Result<(), PersistenceError> {
    diesel::update(users::table.find(user_id))
        .set(users::last_login_at.eq(Some(at)))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Creates a session for a user.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    user_id: i64,
    created_at: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(created_at),
            sessions::last_activity_at.eq(created_at),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;
    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Touches a session's last activity timestamp.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut _,
    session_id: i64,
    at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.find(session_id))
        .set(sessions::last_activity_at.eq(at))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// # Errors
///
/// Returns `SessionNotFound` if no session has this token.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::SessionNotFound(String::from(
            "No session with this token",
        )));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes every session that expired before `now`.
///
/// # Returns
///
/// The number of sessions removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table.filter(sessions::expires_at.lt(now)))
        .execute(conn)?;
    if deleted > 0 {
        info!(deleted, "Expired sessions removed");
    }
    Ok(deleted)
}
}

backend_fn! {
/// Deletes all sessions belonging to a user.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_sessions_for_user(conn: &mut _, user_id: i64) -> Result<usize, PersistenceError> {
    Ok(diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)?)
}
}
