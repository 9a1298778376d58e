// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use bus_station::CoreError;
use bus_station_domain::DomainError;
use bus_station_persistence::PersistenceError;
use tracing::error;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A business rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// Builds an `InvalidInput` error.
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error is a validation failure; the variant picks the field.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidDateRange { .. } => "date_range",
        DomainError::NoWeekdaysSelected => "days_of_week",
        DomainError::InvalidQuantity { .. } => "quantity",
        DomainError::InvalidPaymentType(_) => "payment_type",
        DomainError::InvalidTicketStatus(_) => "ticket_status",
        DomainError::InvalidTripStatus(_) => "trip_status",
        DomainError::InvalidCityName(_) => "city_name",
        DomainError::InvalidRouteMetrics(_) => "route",
        DomainError::InvalidSeatsCount { .. } => "seats_count",
        DomainError::InvalidPrice { .. } => "price_cents",
        DomainError::InvalidLoginName(_) => "login_name",
        DomainError::InvalidName(_) => "name",
        DomainError::InvalidTimezone(_) => "timezone",
        DomainError::DateTimeParseError { .. } | DomainError::DateArithmeticOverflow { .. } => {
            "date"
        }
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Validation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound { resource, id } => ApiError::ResourceNotFound {
            message: format!("{resource} {id} does not exist"),
            resource_type: resource,
        },
        CoreError::ResourceMissing { resource } => ApiError::ResourceNotFound {
            message: format!("No {resource} exist"),
            resource_type: resource,
        },
        CoreError::InsufficientCapacity { .. } => ApiError::DomainRuleViolation {
            rule: String::from("insufficient_capacity"),
            message: err.to_string(),
        },
        CoreError::AllocationFailed { .. } => ApiError::DomainRuleViolation {
            rule: String::from("seat_allocation"),
            message: err.to_string(),
        },
        CoreError::RuleViolation { rule, message } => ApiError::DomainRuleViolation { rule, message },
        CoreError::DataIntegrity(msg) => {
            error!(message = %msg, "Data integrity error");
            ApiError::Internal {
                message: format!("Data integrity error: {msg}"),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Engine rejections carried out of a transaction keep their meaning; store
/// failures become `Internal`, prefixed with what was being attempted.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, attempted: &str) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::UserReferenced { .. } => ApiError::DomainRuleViolation {
            rule: String::from("user_referenced"),
            message: err.to_string(),
        },
        PersistenceError::SessionNotFound(reason) => ApiError::AuthenticationFailed { reason },
        other => {
            error!(error = %other, attempted, "Persistence failure");
            ApiError::Internal {
                message: format!("Failed to {attempted}: {other}"),
            }
        }
    }
}
