// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bus_station_domain::DomainError;

/// Errors raised by the scheduling, seating, and reporting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Input failed a domain validation rule.
    Validation(DomainError),
    /// A referenced entity does not exist.
    NotFound {
        /// The kind of entity (e.g. "Route").
        resource: String,
        /// The identifier that was looked up.
        id: i64,
    },
    /// A required resource has no candidates at all (e.g. no buses exist).
    ResourceMissing {
        /// The kind of resource.
        resource: String,
    },
    /// The trip does not have enough free seats for the request.
    InsufficientCapacity {
        /// Seats currently free.
        free: u32,
        /// Seats requested.
        requested: u32,
    },
    /// The seat walk found fewer free seats than the capacity check promised.
    AllocationFailed {
        /// Seats found.
        found: u32,
        /// Seats requested.
        requested: u32,
    },
    /// Stored data is inconsistent with the model.
    DataIntegrity(String),
    /// A business rule forbids the operation.
    RuleViolation {
        /// Short rule identifier.
        rule: String,
        /// Human-readable description.
        message: String,
    },
}

impl CoreError {
    /// Builds a `NotFound` error.
    #[must_use]
    pub fn not_found(resource: &str, id: i64) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id,
        }
    }

    /// Builds a `RuleViolation` error.
    #[must_use]
    pub fn rule(rule: &str, message: impl Into<String>) -> Self {
        Self::RuleViolation {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Validation failed: {err}"),
            Self::NotFound { resource, id } => write!(f, "{resource} {id} not found"),
            Self::ResourceMissing { resource } => {
                write!(f, "No {resource} available")
            }
            Self::InsufficientCapacity { free, requested } => {
                write!(f, "Not enough free seats. Free: {free}, requested: {requested}")
            }
            Self::AllocationFailed { found, requested } => {
                write!(
                    f,
                    "Failed to allocate seats. Found: {found}, requested: {requested}"
                )
            }
            Self::DataIntegrity(msg) => write!(f, "Data integrity error: {msg}"),
            Self::RuleViolation { rule, message } => write!(f, "Rule violation ({rule}): {message}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}
