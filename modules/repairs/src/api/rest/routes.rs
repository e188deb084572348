use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::services::ServeDir;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Mount the REST API under `/api` and the stored uploads under `/uploads`.
pub fn register_routes(router: Router, service: Arc<Service>, uploads_dir: &Path) -> Router {
    let upload_limit = service.upload_policy().max_file_bytes as usize + MULTIPART_OVERHEAD;

    let api = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/register", post(handlers::register))
        .route("/auth/me", get(handlers::me))
        .route("/stats", get(handlers::stats))
        .route(
            "/repairs",
            get(handlers::list_repairs).post(handlers::create_repair),
        )
        .route(
            "/repairs/{id}",
            get(handlers::get_repair).put(handlers::update_repair),
        )
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/users", get(handlers::list_users))
        .route(
            "/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(Extension(service));

    tracing::debug!(uploads = %uploads_dir.display(), "Repairs REST routes registered");

    router
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
}
