//! Thin typed wrapper over the REST API. Every request made while a token is
//! set carries `Authorization: Bearer <token>`.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{field::Empty, Instrument};
use url::Url;
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::{
    Customer, Identity, NewAccount, NewCustomer, NewRepairTicket, RepairTicket, RepairUpdate,
    StatsView, TokenResponse, UploadedFile,
};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// `server_url` is the backend origin, e.g. `http://localhost:8001`.
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    pub fn with_client(http: reqwest::Client, server_url: &str) -> Result<Self, ClientError> {
        let raw = format!("{}/api/", server_url.trim_end_matches('/'));
        let base = Url::parse(&raw)
            .map_err(|e| ClientError::Validation(format!("invalid server URL '{server_url}': {e}")))?;
        Ok(Self {
            http,
            base,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ClientError::Validation(format!("invalid path '{path}': {e}")))?;
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let req = req.build().map_err(ClientError::Transport)?;
        let span = tracing::info_span!(
            "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url().path(),
            http.status_code = Empty,
        );

        async move {
            let resp = self.http.execute(req).await?;
            let status = resp.status();
            tracing::Span::current().record("http.status_code", status.as_u16());

            let body = resp.bytes().await?;
            if !status.is_success() {
                let err = ClientError::from_response(status.as_u16(), &body);
                tracing::debug!(error = %err, "request failed");
                return Err(err);
            }
            serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
        }
        .instrument(span)
        .await
    }

    // --- auth ---

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, "auth/login")?.json(&body))
            .await
    }

    pub async fn register(&self, account: &NewAccount) -> Result<Identity, ClientError> {
        self.send(self.request(Method::POST, "auth/register")?.json(account))
            .await
    }

    pub async fn me(&self) -> Result<Identity, ClientError> {
        self.send(self.request(Method::GET, "auth/me")?).await
    }

    // --- tickets ---

    pub async fn stats(&self) -> Result<StatsView, ClientError> {
        self.send(self.request(Method::GET, "stats")?).await
    }

    pub async fn list_repairs(&self) -> Result<Vec<RepairTicket>, ClientError> {
        self.send(self.request(Method::GET, "repairs")?).await
    }

    pub async fn get_repair(&self, id: Uuid) -> Result<RepairTicket, ClientError> {
        self.send(self.request(Method::GET, &format!("repairs/{id}"))?)
            .await
    }

    pub async fn create_repair(&self, ticket: &NewRepairTicket) -> Result<RepairTicket, ClientError> {
        self.send(self.request(Method::POST, "repairs")?.json(ticket))
            .await
    }

    pub async fn update_repair(
        &self,
        id: Uuid,
        update: &RepairUpdate,
    ) -> Result<RepairTicket, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("repairs/{id}"))?
                .json(update),
        )
        .await
    }

    // --- customers and users ---

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.send(self.request(Method::GET, "customers")?).await
    }

    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, ClientError> {
        self.send(self.request(Method::POST, "customers")?.json(customer))
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<Identity>, ClientError> {
        self.send(self.request(Method::GET, "users")?).await
    }

    // --- uploads ---

    /// Posts one file as multipart field `file`.
    pub async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|_| ClientError::Validation(format!("invalid content type '{content_type}'")))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send(self.request(Method::POST, "upload")?.multipart(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let a = ApiClient::new("http://localhost:8001").unwrap();
        let b = ApiClient::new("http://localhost:8001/").unwrap();
        assert_eq!(a.base, b.base);
        assert_eq!(
            a.base.join("auth/me").unwrap().as_str(),
            "http://localhost:8001/api/auth/me"
        );
        assert!(ApiClient::new("not a url").is_err());
    }
}
