use chrono::{DateTime, Utc};
use repairdesk_contract::{PaymentStatus, Priority, Role, TicketStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    AccessToken, Customer, NewCustomer, NewRepairTicket, NewUser, RepairPatch, RepairTicket,
    Stats, StoredFile, User,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenDto {
    pub access_token: String,
    pub token_type: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_by_technician: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerReq {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepairDto {
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

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRepairReq {
    /// Optional for customer accounts: defaults to the customer record
    /// sharing the caller's email.
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateRepairReq {
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub assigned_technician_id: Option<Uuid>,
    #[serde(default)]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub final_cost: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

/// Counters for `GET /stats`; the shape depends on the caller's role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StatsDto {
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

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadDto {
    pub file_url: String,
    pub filename: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            phone: u.phone,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

impl From<AccessToken> for TokenDto {
    fn from(t: AccessToken) -> Self {
        Self {
            access_token: t.access_token,
            token_type: t.token_type,
            user: t.user.into(),
        }
    }
}

impl From<RegisterReq> for NewUser {
    fn from(req: RegisterReq) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            role: req.role,
            phone: req.phone,
        }
    }
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            created_by_technician: c.created_by_technician,
            created_at: c.created_at,
        }
    }
}

impl From<CreateCustomerReq> for NewCustomer {
    fn from(req: CreateCustomerReq) -> Self {
        Self {
            full_name: req.full_name,
            phone: req.phone,
            email: req.email,
            address: req.address,
        }
    }
}

impl From<RepairTicket> for RepairDto {
    fn from(r: RepairTicket) -> Self {
        Self {
            id: r.id,
            customer_id: r.customer_id,
            customer_name: r.customer_name,
            device_type: r.device_type,
            brand: r.brand,
            model: r.model,
            description: r.description,
            priority: r.priority,
            status: r.status,
            assigned_technician_id: r.assigned_technician_id,
            assigned_technician_name: r.assigned_technician_name,
            images: r.images,
            cost_estimate: r.cost_estimate,
            final_cost: r.final_cost,
            payment_status: r.payment_status,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
            completed_at: r.completed_at,
        }
    }
}

impl From<CreateRepairReq> for NewRepairTicket {
    fn from(req: CreateRepairReq) -> Self {
        Self {
            customer_id: req.customer_id,
            device_type: req.device_type,
            brand: req.brand,
            model: req.model,
            description: req.description,
            priority: req.priority,
            cost_estimate: req.cost_estimate,
            images: req.images,
        }
    }
}

impl From<UpdateRepairReq> for RepairPatch {
    fn from(req: UpdateRepairReq) -> Self {
        Self {
            status: req.status,
            assigned_technician_id: req.assigned_technician_id,
            cost_estimate: req.cost_estimate,
            final_cost: req.final_cost,
            payment_status: req.payment_status,
        }
    }
}

impl From<Stats> for StatsDto {
    fn from(s: Stats) -> Self {
        match s {
            Stats::Global {
                total_repairs,
                pending_repairs,
                completed_repairs,
                total_customers,
                total_technicians,
            } => Self::Global {
                total_repairs,
                pending_repairs,
                completed_repairs,
                total_customers,
                total_technicians,
            },
            Stats::Personal {
                my_repairs,
                my_pending,
                my_completed,
            } => Self::Personal {
                my_repairs,
                my_pending,
                my_completed,
            },
        }
    }
}

impl From<StoredFile> for UploadDto {
    fn from(f: StoredFile) -> Self {
        Self {
            file_url: f.file_url,
            filename: f.filename,
        }
    }
}
