//! One view model for all three dashboards. What a user can see and do is
//! read from the role's [`Capabilities`]; collections are only replaced
//! after the server confirms a change and a full refetch succeeds. A failed
//! refetch after a confirmed change keeps the old collections and marks
//! them stale; the change itself is still reported as done.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use repairdesk_contract::{Capabilities, Role, VisibleScope};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::model::{
    Customer, Identity, NewCustomer, NewRepairTicket, RepairTicket, RepairUpdate, StatsView,
};

#[derive(Debug, Default, Clone)]
struct Snapshot {
    repairs: Vec<RepairTicket>,
    customers: Vec<Customer>,
    users: Vec<Identity>,
    stats: Option<StatsView>,
    stale: bool,
}

/// Clears the busy flag when the action finishes, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Dashboard {
    api: ApiClient,
    role: Role,
    caps: Capabilities,
    busy: AtomicBool,
    state: Mutex<Snapshot>,
}

impl Dashboard {
    /// `api` must carry the token of a user with `role`.
    pub fn new(api: ApiClient, role: Role) -> Self {
        Self {
            api,
            role,
            caps: role.capabilities(),
            busy: AtomicBool::new(false),
            state: Mutex::new(Snapshot::default()),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn visible_scope(&self) -> VisibleScope {
        self.caps.visible_scope
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<BusyGuard<'_>, ClientError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    fn snapshot(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn repairs(&self) -> Vec<RepairTicket> {
        self.snapshot().repairs.clone()
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.snapshot().customers.clone()
    }

    pub fn users(&self) -> Vec<Identity> {
        self.snapshot().users.clone()
    }

    /// Candidates for assignment.
    pub fn technicians(&self) -> Vec<Identity> {
        self.snapshot()
            .users
            .iter()
            .filter(|u| u.role == Role::Technician)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> Option<StatsView> {
        self.snapshot().stats.clone()
    }

    /// True when the last refetch after a change failed; `refresh` clears it.
    pub fn is_stale(&self) -> bool {
        self.snapshot().stale
    }

    pub async fn refresh(&self) -> Result<(), ClientError> {
        let _busy = self.begin()?;
        self.reload().await
    }

    async fn reload(&self) -> Result<(), ClientError> {
        let repairs = self.api.list_repairs().await?;
        let stats = self.api.stats().await?;
        let customers = if self.caps.can_list_customers {
            self.api.list_customers().await?
        } else {
            Vec::new()
        };
        let users = if self.caps.can_list_users {
            self.api.list_users().await?
        } else {
            Vec::new()
        };

        debug!(
            repairs = repairs.len(),
            customers = customers.len(),
            "dashboard reloaded"
        );
        *self.snapshot() = Snapshot {
            repairs,
            customers,
            users,
            stats: Some(stats),
            stale: false,
        };
        Ok(())
    }

    /// Refetch following a confirmed write. On failure the previous snapshot
    /// stays, flagged stale, and the write still counts as done.
    async fn reload_after_write(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = %e, "refetch after a confirmed change failed");
            self.snapshot().stale = true;
        }
    }

    pub async fn create_ticket(&self, ticket: NewRepairTicket) -> Result<RepairTicket, ClientError> {
        if !self.caps.can_create_ticket {
            return Err(denied("create repair tickets"));
        }
        for (field, value) in [
            ("device_type", &ticket.device_type),
            ("brand", &ticket.brand),
            ("model", &ticket.model),
            ("description", &ticket.description),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Validation(format!("{field} is required")));
            }
        }
        if self.role != Role::Customer && ticket.customer_id.is_none() {
            return Err(ClientError::Validation("select a customer".to_string()));
        }

        let _busy = self.begin()?;
        let created = self.api.create_repair(&ticket).await?;
        info!(repair_id = %created.id, "ticket created");
        self.reload_after_write().await;
        Ok(created)
    }

    pub async fn update_ticket(
        &self,
        id: Uuid,
        update: RepairUpdate,
    ) -> Result<RepairTicket, ClientError> {
        if !self.caps.can_update_ticket() {
            return Err(denied("update repair tickets"));
        }
        if update.is_empty() {
            return Err(ClientError::Validation("nothing to update".to_string()));
        }
        if update.assigned_technician_id.is_some() && !self.caps.can_assign {
            return Err(denied("assign technicians"));
        }
        let touches_cost = update.cost_estimate.is_some()
            || update.final_cost.is_some()
            || update.payment_status.is_some();
        if touches_cost && !self.caps.can_set_cost {
            return Err(denied("change costs or payment"));
        }
        if let Some(next) = update.status {
            if !self.caps.can_update_status {
                return Err(denied("change ticket status"));
            }
            let current = self
                .snapshot()
                .repairs
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.status);
            if let Some(current) = current {
                current
                    .transition(next)
                    .map_err(|e| ClientError::Validation(e.to_string()))?;
            }
        }

        let _busy = self.begin()?;
        let updated = self.api.update_repair(id, &update).await?;
        info!(repair_id = %updated.id, status = %updated.status, "ticket updated");
        self.reload_after_write().await;
        Ok(updated)
    }

    pub async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, ClientError> {
        if !self.caps.can_create_customer {
            return Err(denied("create customers"));
        }
        if customer.full_name.trim().is_empty() || customer.phone.trim().is_empty() {
            return Err(ClientError::Validation(
                "full name and phone are required".to_string(),
            ));
        }

        let _busy = self.begin()?;
        let created = self.api.create_customer(&customer).await?;
        info!(customer_id = %created.id, "customer created");
        self.reload_after_write().await;
        Ok(created)
    }
}

fn denied(action: &str) -> ClientError {
    ClientError::Validation(format!("your role cannot {action}"))
}
