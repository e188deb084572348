use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::RepairsError,
    model::{RepairTicket, Stats, User},
};

/// In-process API of the repairs module, used by the server binary's
/// maintenance commands.
#[async_trait]
pub trait RepairsApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<User, RepairsError>;

    /// Create an admin account unless one with that email already exists.
    /// Returns the account and whether it was created.
    async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(User, bool), RepairsError>;

    /// Tickets visible to `actor_id`
    async fn list_repairs(&self, actor_id: Uuid) -> Result<Vec<RepairTicket>, RepairsError>;

    /// Role-shaped counters for `actor_id`
    async fn stats(&self, actor_id: Uuid) -> Result<Stats, RepairsError>;
}
