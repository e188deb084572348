use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repairdesk_contract::{PaymentStatus, Role, TicketStatus};
use uuid::Uuid;

use crate::contract::model::{Customer, RepairTicket, User};

/// Which tickets a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairScope {
    All,
    AssignedTo(Uuid),
    CreatedBy(Uuid),
}

/// Persistence port for accounts. Service computes ids, timestamps and
/// validation; the repository stores.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Account plus its stored password hash, for login.
    async fn find_with_hash(&self, email: &str) -> anyhow::Result<Option<(User, String)>>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    async fn insert(&self, u: User, password_hash: String) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    async fn count_by_role(&self, role: Role) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait CustomersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Customer>>;
    async fn insert(&self, c: Customer) -> anyhow::Result<()>;
    /// All customers, or only those created by `technician` when given.
    async fn list(&self, technician: Option<Uuid>) -> anyhow::Result<Vec<Customer>>;
    async fn count(&self) -> anyhow::Result<u64>;
}

/// Column-level changes to one ticket. `None` leaves the stored column as is.
#[derive(Debug, Clone)]
pub struct RepairChanges {
    pub status: Option<TicketStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Technician id and display name, written together.
    pub assigned_technician: Option<(Uuid, String)>,
    pub cost_estimate: Option<f64>,
    pub final_cost: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub updated_at: DateTime<Utc>,
}

impl RepairChanges {
    pub fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            status: None,
            completed_at: None,
            assigned_technician: None,
            cost_estimate: None,
            final_cost: None,
            payment_status: None,
            updated_at,
        }
    }
}

#[async_trait]
pub trait RepairsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<RepairTicket>>;
    async fn insert(&self, r: RepairTicket) -> anyhow::Result<()>;
    /// Writes only the columns present in `changes`. With `expected_status`
    /// the write applies only while the stored status still equals it.
    /// Returns whether a row was written.
    async fn update_fields(
        &self,
        id: Uuid,
        expected_status: Option<TicketStatus>,
        changes: RepairChanges,
    ) -> anyhow::Result<bool>;
    /// Newest first.
    async fn list(&self, scope: RepairScope) -> anyhow::Result<Vec<RepairTicket>>;
    async fn count(&self, scope: RepairScope, status: Option<TicketStatus>) -> anyhow::Result<u64>;
}
