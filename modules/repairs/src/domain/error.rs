use repairdesk_contract::{TransitionError, UploadViolation};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: Uuid },

    #[error("Repair not found: {id}")]
    RepairNotFound { id: Uuid },

    #[error("No customer record matches '{email}'")]
    NoCustomerForEmail { email: String },

    #[error("Email already registered: '{email}'")]
    EmailAlreadyExists { email: String },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Not enough permissions to {action}")]
    Forbidden { action: &'static str },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("Repair {id} was changed by another request; reload and try again")]
    ConcurrentUpdate { id: Uuid },

    #[error("User {id} is not a technician")]
    NotATechnician { id: Uuid },

    #[error(transparent)]
    Upload(#[from] UploadViolation),

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn customer_not_found(id: Uuid) -> Self {
        Self::CustomerNotFound { id }
    }

    pub fn repair_not_found(id: Uuid) -> Self {
        Self::RepairNotFound { id }
    }

    pub fn email_already_exists(email: String) -> Self {
        Self::EmailAlreadyExists { email }
    }

    pub fn invalid_email(email: String) -> Self {
        Self::InvalidEmail { email }
    }

    pub fn forbidden(action: &'static str) -> Self {
        Self::Forbidden { action }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
