use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other crates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepairsError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Internal error")]
    Internal,
}

impl RepairsError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for RepairsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found("user", id),
            CustomerNotFound { id } => Self::not_found("customer", id),
            RepairNotFound { id } => Self::not_found("repair", id),
            e @ NoCustomerForEmail { .. } => Self::validation(e.to_string()),
            EmailAlreadyExists { email } => {
                Self::conflict(format!("email '{email}' is already registered"))
            }
            InvalidTransition(e) => Self::conflict(e.to_string()),
            e @ ConcurrentUpdate { .. } => Self::conflict(e.to_string()),
            InvalidCredentials | InvalidToken => Self::Unauthorized,
            e @ InactiveUser => Self::validation(e.to_string()),
            e @ Forbidden { .. } => Self::forbidden(e.to_string()),
            e @ (InvalidEmail { .. } | NotATechnician { .. } | Validation { .. }) => {
                Self::validation(e.to_string())
            }
            Upload(v) => Self::validation(v.to_string()),
            Database { .. } | Storage { .. } | Internal { .. } => Self::internal(),
        }
    }
}
