//! HTTP host for the REST modules.
//!
//! Wraps the module routers with the shared middleware stack, adds `/health`,
//! the OpenAPI document and the docs page, and serves until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{http::header, middleware::from_fn, response::IntoResponse, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

pub mod config;
pub mod problem;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiIngress {
    config: ApiIngressConfig,
    timeout: Duration,
    openapi: Option<Arc<serde_json::Value>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_TIMEOUT,
            openapi: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Serialized once; `/openapi.json` serves the cached value.
    pub fn with_openapi(mut self, doc: &utoipa::openapi::OpenApi) -> Result<Self> {
        let value = serde_json::to_value(doc).context("failed to serialize OpenAPI document")?;
        self.openapi = Some(Arc::new(value));
        Ok(self)
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// `bind_addr` from the module config, else `host:port` from the server section.
    pub fn bind_addr(&self, host: &str, port: u16) -> Result<SocketAddr> {
        let raw = match &self.config.bind_addr {
            Some(addr) => addr.clone(),
            None => format!("{host}:{port}"),
        };
        raw.parse()
            .with_context(|| format!("invalid bind address '{raw}'"))
    }

    /// Middleware order, outermost first:
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
    /// -> Timeout -> BodyLimit -> CORS -> routes.
    pub fn build_router(&self, modules: Router) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(modules);

        if let Some(doc) = &self.openapi {
            let doc = doc.clone();
            router = router.route(
                "/openapi.json",
                get(move || {
                    let doc = doc.clone();
                    async move {
                        (
                            [(header::CACHE_CONTROL, "no-store")],
                            axum::Json((*doc).clone()),
                        )
                            .into_response()
                    }
                }),
            );
            if self.config.enable_docs {
                router = router.route("/docs", get(web::serve_docs));
            }
        }

        router = router.fallback(web::not_found);

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        // Each `layer` call wraps everything added before it, so the stack
        // is listed innermost first. Outermost to innermost:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id -> Timeout -> BodyLimit
        router = router.layer(RequestBodyLimitLayer::new(
            self.config.body_limit_mb * 1024 * 1024,
        ));
        router = router.layer(TimeoutLayer::new(self.timeout));
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(request_id::create_trace_layer());

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Serves `router` on `listener` until `shutdown` resolves, then drains
    /// in-flight requests.
    pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
