use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::problem::{internal_error, ProblemResponse};
use api_ingress::request_id::XRequestId;
use api_ingress::{ApiIngress, ApiIngressConfig};

fn test_app() -> Router {
    let routes = Router::new()
        .route("/test", get(success_handler))
        .route("/error", get(error_handler));

    ApiIngress::new(ApiIngressConfig::default()).build_router(routes)
}

async fn success_handler(
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "request_id": request_id}))
}

async fn error_handler(Extension(XRequestId(request_id)): Extension<XRequestId>) -> ProblemResponse {
    let mut resp = internal_error("Test error");
    resp.0 = resp.0.with_code("TEST").with_request_id(request_id);
    resp
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = test_app()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header_id.is_empty());

    // Handlers see the same id that goes back to the client
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["request_id"], header_id);
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/test")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok());
    assert_eq!(request_id, Some("abc-123"));
}

#[tokio::test]
async fn includes_request_id_in_problem() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/error")
                .header("x-request-id", "error-test-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("error-test-123")
    );
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["detail"], "Test error");
    assert_eq!(json["status"], 500);
    assert_eq!(json["request_id"], "error-test-123");
}
