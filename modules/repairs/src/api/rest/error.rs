use api_ingress::problem::{Problem, ProblemResponse};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.repairdesk.local/{}", code))
        .with_code(code)
        .with_instance(instance);

    // Correlate with the current tracing span when there is one
    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC 9457 ProblemResponse. `detail` carries the
/// message clients show to the user.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "User not found",
            "User not found",
            instance,
        ),
        DomainError::CustomerNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "CUSTOMER_NOT_FOUND",
            "Customer not found",
            "Customer not found",
            instance,
        ),
        DomainError::RepairNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "REPAIR_NOT_FOUND",
            "Repair not found",
            "Repair request not found",
            instance,
        ),
        DomainError::NoCustomerForEmail { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "CUSTOMER_REQUIRED",
            "Customer required",
            format!("{e}"),
            instance,
        ),
        DomainError::EmailAlreadyExists { .. } => from_parts(
            StatusCode::CONFLICT,
            "EMAIL_CONFLICT",
            "Email already registered",
            "Email already registered",
            instance,
        ),
        DomainError::InvalidEmail { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "INVALID_EMAIL",
            "Invalid email",
            format!("{e}"),
            instance,
        ),
        DomainError::InvalidCredentials => from_parts(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Unauthorized",
            "Incorrect email or password",
            instance,
        ),
        DomainError::InvalidToken => from_parts(
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "Unauthorized",
            "Could not validate credentials",
            instance,
        ),
        DomainError::InactiveUser => from_parts(
            StatusCode::BAD_REQUEST,
            "INACTIVE_USER",
            "Inactive user",
            "Inactive user",
            instance,
        ),
        DomainError::Forbidden { .. } => from_parts(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Insufficient permissions",
            format!("{e}"),
            instance,
        ),
        DomainError::InvalidTransition(_) => from_parts(
            StatusCode::CONFLICT,
            "INVALID_TRANSITION",
            "Invalid status transition",
            format!("{e}"),
            instance,
        ),
        DomainError::ConcurrentUpdate { .. } => from_parts(
            StatusCode::CONFLICT,
            "CONCURRENT_UPDATE",
            "Concurrent update",
            format!("{e}"),
            instance,
        ),
        DomainError::NotATechnician { .. }
        | DomainError::Upload(_)
        | DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "VALIDATION",
            "Validation error",
            format!("{e}"),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
        DomainError::Internal { .. } => {
            tracing::error!(error = ?e, "Internal error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
        DomainError::Storage { .. } => {
            tracing::error!(error = ?e, "File storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "The file could not be stored",
                instance,
            )
        }
    }
}
