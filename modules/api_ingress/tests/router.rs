use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tower::util::ServiceExt;
use utoipa::OpenApi;

use api_ingress::{ApiIngress, ApiIngressConfig};

#[derive(OpenApi)]
#[openapi(info(title = "Ingress test", version = "0.0.1"))]
struct TestDoc;

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = ApiIngress::new(ApiIngressConfig::default()).build_router(Router::new());

    let resp = app.oneshot(get_req("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn module_routes_are_merged() {
    let modules = Router::new().route("/api/ping", get(|| async { "pong" }));
    let app = ApiIngress::new(ApiIngressConfig::default()).build_router(modules);

    let resp = app.oneshot(get_req("/api/ping")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let ingress = ApiIngress::new(ApiIngressConfig::default())
        .with_openapi(&TestDoc::openapi())
        .unwrap();
    let app = ingress.build_router(Router::new());

    let resp = app.clone().oneshot(get_req("/openapi.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
    let json = body_json(resp).await;
    assert_eq!(json["info"]["title"], "Ingress test");

    let resp = app.oneshot(get_req("/docs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn docs_page_can_be_disabled() {
    let cfg = ApiIngressConfig {
        enable_docs: false,
        ..Default::default()
    };
    let app = ApiIngress::new(cfg)
        .with_openapi(&TestDoc::openapi())
        .unwrap()
        .build_router(Router::new());

    let resp = app.oneshot(get_req("/docs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_a_problem() {
    let app = ApiIngress::new(ApiIngressConfig::default()).build_router(Router::new());

    let resp = app.oneshot(get_req("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let json = body_json(resp).await;
    assert_eq!(json["instance"], "/nope");
    assert_eq!(json["code"], "ROUTE_NOT_FOUND");
}

#[test]
fn bind_addr_prefers_module_override() {
    let ingress = ApiIngress::new(ApiIngressConfig::default());
    assert_eq!(
        ingress.bind_addr("127.0.0.1", 8001).unwrap().to_string(),
        "127.0.0.1:8001"
    );

    let ingress = ApiIngress::new(ApiIngressConfig {
        bind_addr: Some("0.0.0.0:9000".into()),
        ..Default::default()
    });
    assert_eq!(ingress.bind_addr("127.0.0.1", 8001).unwrap().port(), 9000);

    let ingress = ApiIngress::new(ApiIngressConfig {
        bind_addr: Some("not an addr".into()),
        ..Default::default()
    });
    assert!(ingress.bind_addr("127.0.0.1", 8001).is_err());
}

#[tokio::test]
async fn slow_handler_times_out_with_request_id() {
    let modules = Router::new().route(
        "/api/slow",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            "late"
        }),
    );
    let app = ApiIngress::new(ApiIngressConfig::default())
        .with_timeout(std::time::Duration::from_millis(50))
        .build_router(modules);

    let resp = app.oneshot(get_req("/api/slow")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let modules = Router::new().route(
        "/api/echo",
        axum::routing::post(|body: axum::body::Bytes| async move { body.len().to_string() }),
    );
    let config = ApiIngressConfig {
        body_limit_mb: 1,
        ..ApiIngressConfig::default()
    };
    let app = ApiIngress::new(config).build_router(modules);

    let small = Request::builder()
        .method("POST")
        .uri("/api/echo")
        .body(Body::from(vec![b'a'; 1024]))
        .unwrap();
    let resp = app.clone().oneshot(small).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let big = Request::builder()
        .method("POST")
        .uri("/api/echo")
        .body(Body::from(vec![b'a'; 2 * 1024 * 1024]))
        .unwrap();
    let resp = app.oneshot(big).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
