//! Owns who is signed in. The caller holds one `SessionManager` per user
//! session and passes it by reference.

use repairdesk_contract::Capabilities;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::model::{Identity, NewAccount};
use crate::store::TokenStore;

pub const LOGIN_ROUTE: &str = "/login";

pub struct SessionManager<S: TokenStore> {
    api: ApiClient,
    store: S,
    identity: Option<Identity>,
    loading: bool,
}

impl<S: TokenStore> SessionManager<S> {
    /// Starts in the loading state until [`restore`](Self::restore) runs.
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            identity: None,
            loading: true,
        }
    }

    /// Resolves a previously stored token into an identity. Any failure
    /// discards the token and leaves the session signed out.
    pub async fn restore(&mut self) {
        self.loading = true;
        let stored = match self.store.load() {
            Ok(t) => t,
            Err(e) => {
                warn!("cannot read stored token: {e}");
                None
            }
        };

        if let Some(token) = stored {
            self.api.set_token(Some(token));
            match self.api.me().await {
                Ok(identity) => {
                    info!(user_id = %identity.id, "session restored");
                    self.identity = Some(identity);
                }
                Err(e) => {
                    debug!("stored token rejected: {e}");
                    self.discard();
                }
            }
        }
        self.loading = false;
    }

    /// On failure the current session, if any, is left as it was.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let resp = self.api.login(email.trim(), password).await?;
        self.store.save(&resp.access_token)?;
        self.api.set_token(Some(resp.access_token));
        self.identity = Some(resp.user.clone());
        info!(user_id = %resp.user.id, role = %resp.user.role, "signed in");
        Ok(resp.user)
    }

    /// Creates an account. The session is not changed.
    pub async fn register(&self, account: &NewAccount) -> Result<Identity, ClientError> {
        for (field, value) in [
            ("email", &account.email),
            ("password", &account.password),
            ("full_name", &account.full_name),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Validation(format!("{field} is required")));
            }
        }
        self.api.register(account).await
    }

    pub fn logout(&mut self) {
        if self.identity.is_some() {
            info!("signed out");
        }
        self.discard();
    }

    fn discard(&mut self) {
        self.identity = None;
        self.api.set_token(None);
        if let Err(e) = self.store.clear() {
            warn!("cannot remove stored token: {e}");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.identity.as_ref().map(|i| i.role.capabilities())
    }

    pub fn landing_route(&self) -> &'static str {
        match &self.identity {
            Some(i) => i.role.landing_route(),
            None => LOGIN_ROUTE,
        }
    }

    /// Client carrying the session token, if any.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
