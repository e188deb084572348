//! Wire shapes of the REST API as the client sees them.

use chrono::{DateTime, Utc};
use repairdesk_contract::{PaymentStatus, Priority, Role, TicketStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default = "active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: Identity,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_by_technician: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NewCustomer {
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
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
    #[serde(default)]
    pub assigned_technician_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_technician_name: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub final_cost: Option<f64>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NewRepairTicket {
    /// Customers leave this empty; the server resolves it from their email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Partial ticket update; unset fields are left alone by the server.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct RepairUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_technician_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl RepairUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `GET /stats`; admins get global counters, everyone else their own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatsView {
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

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedFile {
    pub file_url: String,
    pub filename: String,
}
