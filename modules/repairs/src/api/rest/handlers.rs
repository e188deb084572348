use std::sync::Arc;

use api_ingress::problem::{Problem, ProblemResponse};
use axum::{
    extract::{Multipart, Path},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::auth::CurrentUser;
use crate::api::rest::dto::{
    CreateCustomerReq, CreateRepairReq, CustomerDto, LoginReq, RegisterReq, RepairDto, StatsDto,
    TokenDto, UpdateRepairReq, UploadDto, UserDto,
};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Access token issued", body = TokenDto),
        (status = 400, description = "Inactive user", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Incorrect email or password", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn login(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<LoginReq>,
) -> Result<Json<TokenDto>, ProblemResponse> {
    info!("Login attempt for {}", req.email);

    match svc.login(&req.email, &req.password).await {
        Ok(token) => Ok(Json(TokenDto::from(token))),
        Err(e) => {
            info!("Login rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create an account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid input", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Email already registered", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn register(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    info!("Registering {} as {}", req.email, req.role);

    match svc.register(req.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to register: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Current account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated account", body = UserDto),
        (status = 401, description = "Missing or invalid token", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(UserDto::from(user))
}

/// Role-scoped counters
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "repairs",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Counters for the caller's role", body = StatsDto),
        (status = 401, description = "Missing or invalid token", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn stats(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<StatsDto>, ProblemResponse> {
    match svc.stats(&actor).await {
        Ok(stats) => Ok(Json(StatsDto::from(stats))),
        Err(e) => {
            error!("Failed to compute stats: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List repair tickets visible to the caller
#[utoipa::path(
    get,
    path = "/api/repairs",
    tag = "repairs",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Tickets, newest first", body = [RepairDto]),
        (status = 401, description = "Missing or invalid token", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_repairs(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<RepairDto>>, ProblemResponse> {
    info!("Listing repairs for {} ({})", actor.id, actor.role);

    match svc.list_repairs(&actor).await {
        Ok(list) => Ok(Json(list.into_iter().map(RepairDto::from).collect())),
        Err(e) => {
            error!("Failed to list repairs: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Open a repair ticket
#[utoipa::path(
    post,
    path = "/api/repairs",
    tag = "repairs",
    security(("bearer" = [])),
    request_body = CreateRepairReq,
    responses(
        (status = 201, description = "Ticket created in 'beklemede'", body = RepairDto),
        (status = 400, description = "Invalid input", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Customer not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_repair(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateRepairReq>,
) -> Result<(StatusCode, Json<RepairDto>), ProblemResponse> {
    info!("Creating repair: {:?}", req);

    match svc.create_repair(&actor, req.into()).await {
        Ok(ticket) => Ok((StatusCode::CREATED, Json(RepairDto::from(ticket)))),
        Err(e) => {
            error!("Failed to create repair: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one repair ticket
#[utoipa::path(
    get,
    path = "/api/repairs/{id}",
    tag = "repairs",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket", body = RepairDto),
        (status = 403, description = "Not visible to the caller", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_repair(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RepairDto>, ProblemResponse> {
    match svc.get_repair(&actor, id).await {
        Ok(ticket) => Ok(Json(RepairDto::from(ticket))),
        Err(e) => {
            error!("Failed to get repair {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update status, assignment, costs or payment of a ticket
#[utoipa::path(
    put,
    path = "/api/repairs/{id}",
    tag = "repairs",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Ticket id")),
    request_body = UpdateRepairReq,
    responses(
        (status = 200, description = "Updated ticket", body = RepairDto),
        (status = 400, description = "Invalid input", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Role may not update tickets", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Status transition not allowed", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_repair(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRepairReq>,
) -> Result<Json<RepairDto>, ProblemResponse> {
    info!("Updating repair {} with: {:?}", id, req);

    match svc.update_repair(&actor, id, req.into()).await {
        Ok(ticket) => Ok(Json(RepairDto::from(ticket))),
        Err(e) => {
            error!("Failed to update repair {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List customers (admin: all, technician: own)
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "customers",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Customers", body = [CustomerDto]),
        (status = 403, description = "Role may not list customers", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_customers(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<CustomerDto>>, ProblemResponse> {
    match svc.list_customers(&actor).await {
        Ok(list) => Ok(Json(list.into_iter().map(CustomerDto::from).collect())),
        Err(e) => {
            error!("Failed to list customers: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a customer record
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "customers",
    security(("bearer" = [])),
    request_body = CreateCustomerReq,
    responses(
        (status = 201, description = "Customer created", body = CustomerDto),
        (status = 400, description = "Invalid input", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Role may not create customers", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_customer(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateCustomerReq>,
) -> Result<(StatusCode, Json<CustomerDto>), ProblemResponse> {
    info!("Creating customer: {:?}", req);

    match svc.create_customer(&actor, req.into()).await {
        Ok(c) => Ok((StatusCode::CREATED, Json(CustomerDto::from(c)))),
        Err(e) => {
            error!("Failed to create customer: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List accounts (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Accounts", body = [UserDto]),
        (status = 403, description = "Admin only", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_users(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    match svc.list_users(&actor).await {
        Ok(list) => Ok(Json(list.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Store one attachment sent as multipart field `file`
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "uploads",
    security(("bearer" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "Single part named `file`"),
    responses(
        (status = 200, description = "Stored file", body = UploadDto),
        (status = 400, description = "Missing file, disallowed type or too large", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn upload_file(
    uri: Uri,
    Extension(svc): Svc,
    CurrentUser(actor): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadDto>, ProblemResponse> {
    let bad_multipart = |e: axum::extract::multipart::MultipartError| {
        error!("Malformed upload: {}", e);
        from_parts(
            e.status(),
            "UPLOAD_MALFORMED",
            "Malformed upload",
            e.body_text(),
            uri.path(),
        )
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(bad_multipart)?;

        info!("Upload of {} ({}, {} bytes)", filename, content_type, bytes.len());
        return match svc
            .store_upload(&actor, &filename, &content_type, &bytes)
            .await
        {
            Ok(stored) => Ok(Json(UploadDto::from(stored))),
            Err(e) => {
                error!("Failed to store upload: {}", e);
                Err(map_domain_error(&e, uri.path()))
            }
        };
    }

    Err(from_parts(
        StatusCode::BAD_REQUEST,
        "VALIDATION",
        "Validation error",
        "multipart field 'file' is required",
        uri.path(),
    ))
}
