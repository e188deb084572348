use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "repairs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub device_type: String,
    pub brand: String,
    #[sea_orm(column_name = "model")]
    pub device_model: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub assigned_technician_id: Option<Uuid>,
    pub assigned_technician_name: Option<String>,
    /// JSON array of file URLs.
    pub images: String,
    pub cost_estimate: Option<f64>,
    pub final_cost: Option<f64>,
    pub payment_status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
