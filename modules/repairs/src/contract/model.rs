use chrono::{DateTime, Utc};
use repairdesk_contract::{PaymentStatus, Priority, Role, TicketStatus};
use uuid::Uuid;

/// Account as seen by the domain. The password hash never leaves storage.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
}

/// Issued on successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Set when a technician created the record.
    pub created_by_technician: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepairTicket {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub assigned_technician_id: Option<Uuid>,
    pub assigned_technician_name: Option<String>,
    pub images: Vec<String>,
    pub cost_estimate: Option<f64>,
    pub final_cost: Option<f64>,
    pub payment_status: PaymentStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Ticket creation input. `customer_id` may be omitted by customer-role
/// callers; the record matching their email is used instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewRepairTicket {
    pub customer_id: Option<Uuid>,
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    pub priority: Priority,
    pub cost_estimate: Option<f64>,
    pub images: Vec<String>,
}

/// Partial ticket update; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RepairPatch {
    pub status: Option<TicketStatus>,
    pub assigned_technician_id: Option<Uuid>,
    pub cost_estimate: Option<f64>,
    pub final_cost: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
}

impl RepairPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Dashboard counters, shaped by the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stats {
    Global {
        total_repairs: u64,
        pending_repairs: u64,
        completed_repairs: u64,
        total_customers: u64,
        total_technicians: u64,
    },
    Personal {
        my_repairs: u64,
        my_pending: u64,
        my_completed: u64,
    },
}

/// Result of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_url: String,
    pub filename: String,
}
