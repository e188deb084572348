use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::RepairsApi,
    error::RepairsError,
    model::{RepairTicket, Stats, User},
};
use crate::domain::service::Service;

/// Local implementation of the RepairsApi trait that delegates to the domain service
pub struct RepairsLocalClient {
    service: Arc<Service>,
}

impl RepairsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    async fn actor(&self, id: Uuid) -> Result<User, RepairsError> {
        self.service.get_user(id).await.map_err(Into::into)
    }
}

#[async_trait]
impl RepairsApi for RepairsLocalClient {
    async fn get_user(&self, id: Uuid) -> Result<User, RepairsError> {
        self.actor(id).await
    }

    async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(User, bool), RepairsError> {
        self.service
            .ensure_admin(email, password, full_name)
            .await
            .map_err(Into::into)
    }

    async fn list_repairs(&self, actor_id: Uuid) -> Result<Vec<RepairTicket>, RepairsError> {
        let actor = self.actor(actor_id).await?;
        self.service
            .list_repairs(&actor)
            .await
            .map_err(Into::into)
    }

    async fn stats(&self, actor_id: Uuid) -> Result<Stats, RepairsError> {
        let actor = self.actor(actor_id).await?;
        self.service.stats(&actor).await.map_err(Into::into)
    }
}
