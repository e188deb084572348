use std::sync::Arc;

use api_ingress::problem::ProblemResponse;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, StatusCode};

use crate::api::rest::error::{from_parts, map_domain_error};
use crate::contract::model::User;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Authenticated caller, resolved from `Authorization: Bearer <token>`.
/// Needs the `Arc<Service>` extension on the router.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path().to_string();
        let svc = parts
            .extensions
            .get::<Arc<Service>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("repairs service extension missing from router");
                from_parts(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal error",
                    "Service unavailable",
                    &instance,
                )
            })?;

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| map_domain_error(&DomainError::InvalidToken, &instance))?;

        svc.authenticate(token)
            .await
            .map(CurrentUser)
            .map_err(|e| map_domain_error(&e, &instance))
    }
}
