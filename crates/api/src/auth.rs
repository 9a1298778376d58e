// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use std::fmt;
use std::str::FromStr;

use bus_station_persistence::{Persistence, PersistenceError, SessionData, UserData, verify_password};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Operator roles.
///
/// Roles apply to station staff accounts. Passengers never log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Manages the catalog, schedules, staff accounts, and reports.
    Administrator,
    /// Sells, cancels, and prints tickets.
    Cashier,
}

impl Role {
    /// Returns the stored spelling of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Cashier => "Cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "cashier" => Ok(Self::Cashier),
            _ => Err(format!(
                "Invalid role: '{s}'. Must be 'Administrator' or 'Cashier'"
            )),
        }
    }
}

/// The identity of the caller, built from a validated session.
///
/// Every operation receives this explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's user id.
    pub user_id: i64,
    /// The caller's login name, upper case.
    pub login_name: String,
    /// The caller's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, login_name: String, role: Role) -> Self {
        Self {
            user_id,
            login_name,
            role,
        }
    }

    /// Builds an actor from a stored user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored role is not recognised.
    pub fn from_user(user: &UserData) -> Result<Self, AuthError> {
        let role: Role = user
            .role
            .parse()
            .map_err(|reason| AuthError::AuthenticationFailed { reason })?;
        Ok(Self::new(user.user_id, user.login_name.clone(), role))
    }
}

/// Role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Allows only administrators.
    ///
    /// Catalog writes, schedule generation, trip deletion, user management,
    /// and reports go through this check.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrator => Ok(()),
            Role::Cashier => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Administrator"),
            }),
        }
    }

    /// Allows cashiers and administrators.
    ///
    /// # Errors
    ///
    /// Never fails with the current set of roles.
    pub const fn authorize_ticket_desk(
        actor: &AuthenticatedActor,
        _action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrator | Role::Cashier => Ok(()),
        }
    }
}

/// Session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// How long a session stays valid after login.
    pub const SESSION_LIFETIME: Duration = Duration::hours(8);

    /// Checks credentials and opens a session.
    ///
    /// The login name is case-insensitive.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for unknown users or a wrong password.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, UserData), AuthError> {
        let user: UserData = persistence
            .get_user_by_login(login_name)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(login_name, "Login attempt for unknown user");
                AuthError::AuthenticationFailed {
                    reason: String::from("Invalid login or password"),
                }
            })?;

        let password_ok: bool =
            verify_password(password, &user.password_hash).map_err(Self::map_persistence_error)?;
        if !password_ok {
            warn!(login_name = %user.login_name, "Login attempt with wrong password");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid login or password"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let created_at: String = Self::format_timestamp(now)?;
        let expires_at: String = Self::format_timestamp(now + Self::SESSION_LIFETIME)?;
        let session_token: String = Self::generate_session_token(now);

        persistence
            .create_session(&session_token, user.user_id, &created_at, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;
        persistence
            .update_last_login(user.user_id, &created_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(user_id = user.user_id, role = %actor.role, "User logged in");
        Ok((session_token, actor, user))
    }

    /// Resolves a session token to the caller's identity.
    ///
    /// A successful check refreshes the session's last activity time.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the session is unknown or expired,
    /// or if its user no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        if now > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;
        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

        persistence
            .update_session_activity(session.session_id, &Self::format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        debug!(user_id = user.user_id, "Session validated");
        Ok((actor, user))
    }

    /// Ends a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;
        info!("User logged out");
        Ok(())
    }

    /// Removes every session whose expiry has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn purge_expired_sessions(persistence: &mut Persistence) -> Result<usize, AuthError> {
        let now: String = Self::format_timestamp(OffsetDateTime::now_utc())?;
        let removed: usize = persistence
            .delete_expired_sessions(&now)
            .map_err(Self::map_persistence_error)?;
        if removed > 0 {
            info!(removed, "Expired sessions removed");
        }
        Ok(removed)
    }

    /// Formats an instant the way session and user timestamps are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be formatted.
    pub fn format_timestamp(at: OffsetDateTime) -> Result<String, AuthError> {
        at.format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format timestamp: {e}"),
            })
    }

    fn generate_session_token(now: OffsetDateTime) -> String {
        format!(
            "session_{}_{:016x}{:016x}",
            now.unix_timestamp_nanos(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionNotFound(msg) => AuthError::AuthenticationFailed { reason: msg },
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
