#![allow(dead_code)]

use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use repairs::{config::RepairsConfig, RepairsModule};
use sea_orm::Database;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub module: RepairsModule,
    pub router: Router,
    // Keeps the uploads directory alive for the test's duration
    pub home: TempDir,
}

/// Module over a fresh in-memory database, mounted behind the ingress stack.
pub async fn test_app() -> TestApp {
    let home = tempfile::tempdir().expect("tempdir");
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    let cfg = RepairsConfig {
        jwt_secret: "test-secret".to_string(),
        ..RepairsConfig::default()
    };
    let module = RepairsModule::init(db, cfg, home.path())
        .await
        .expect("Failed to init repairs module");

    let router = ApiIngress::new(ApiIngressConfig::default())
        .with_openapi(&RepairsModule::openapi())
        .expect("openapi")
        .build_router(module.register_rest(Router::new()));

    module
        .service()
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin")
        .await
        .expect("seed admin");

    TestApp {
        module,
        router,
        home,
    }
}

impl TestApp {
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers an account and returns `(id, token)`.
    pub async fn register(&self, email: &str, full_name: &str, role: &str) -> (String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": "secret123",
                    "full_name": full_name,
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let id = body["id"].as_str().unwrap().to_string();
        (id, self.login(email, "secret123").await)
    }

    pub async fn create_customer(&self, token: &str, full_name: &str, email: Option<&str>) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/customers",
                Some(token),
                Some(serde_json::json!({
                    "full_name": full_name,
                    "phone": "05551234567",
                    "email": email,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create customer failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_repair(&self, token: &str, customer_id: Option<&str>) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/repairs",
                Some(token),
                Some(serde_json::json!({
                    "customer_id": customer_id,
                    "device_type": "Laptop",
                    "brand": "Dell",
                    "model": "XPS 13",
                    "description": "Screen flickers",
                    "priority": "acil",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create repair failed: {body}");
        body
    }
}
