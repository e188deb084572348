//! Conversions between storage rows and contract models.
//!
//! Enum columns hold wire strings; a row with an unknown value is reported
//! as a storage error instead of being silently coerced.

use anyhow::Context;

use crate::contract::model::{Customer, RepairTicket, User};
use crate::infra::storage::entity::{customer, repair, user};

impl TryFrom<user::Model> for User {
    type Error = anyhow::Error;

    fn try_from(m: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            role: m.role.parse().context("users.role")?,
            email: m.email,
            full_name: m.full_name,
            phone: m.phone,
            is_active: m.is_active,
            created_at: m.created_at,
        })
    }
}

impl From<customer::Model> for Customer {
    fn from(m: customer::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            phone: m.phone,
            email: m.email,
            address: m.address,
            created_by_technician: m.created_by_technician,
            created_at: m.created_at,
        }
    }
}

impl TryFrom<repair::Model> for RepairTicket {
    type Error = anyhow::Error;

    fn try_from(m: repair::Model) -> Result<Self, Self::Error> {
        let images: Vec<String> = if m.images.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&m.images).context("repairs.images")?
        };
        Ok(Self {
            id: m.id,
            customer_id: m.customer_id,
            customer_name: m.customer_name,
            device_type: m.device_type,
            brand: m.brand,
            model: m.device_model,
            description: m.description,
            priority: m.priority.parse().context("repairs.priority")?,
            status: m.status.parse().context("repairs.status")?,
            assigned_technician_id: m.assigned_technician_id,
            assigned_technician_name: m.assigned_technician_name,
            images,
            cost_estimate: m.cost_estimate,
            final_cost: m.final_cost,
            payment_status: m.payment_status.parse().context("repairs.payment_status")?,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
            completed_at: m.completed_at,
        })
    }
}

pub fn images_to_column(images: &[String]) -> anyhow::Result<String> {
    serde_json::to_string(images).context("serialize repairs.images")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use repairdesk_contract::{PaymentStatus, Priority, Role, TicketStatus};
    use uuid::Uuid;

    fn repair_row() -> repair::Model {
        let now = Utc::now();
        repair::Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            customer_name: "Ali Veli".into(),
            device_type: "Telefon".into(),
            brand: "Samsung".into(),
            device_model: "S21".into(),
            description: "Ekran kirik".into(),
            priority: "acil".into(),
            status: "isleniyor".into(),
            assigned_technician_id: None,
            assigned_technician_name: None,
            images: r#"["/uploads/a.png"]"#.into(),
            cost_estimate: Some(1200.0),
            final_cost: None,
            payment_status: "kismi".into(),
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    #[test]
    fn repair_row_maps_wire_strings() {
        let t = RepairTicket::try_from(repair_row()).unwrap();
        assert_eq!(t.priority, Priority::Urgent);
        assert_eq!(t.status, TicketStatus::InProgress);
        assert_eq!(t.payment_status, PaymentStatus::Partial);
        assert_eq!(t.images, vec!["/uploads/a.png".to_string()]);
        assert_eq!(t.model, "S21");
    }

    #[test]
    fn unknown_enum_value_is_an_error() {
        let mut row = repair_row();
        row.status = "done".into();
        let err = RepairTicket::try_from(row).unwrap_err();
        assert!(format!("{err:#}").contains("repairs.status"));
    }

    #[test]
    fn user_row_maps_role() {
        let row = user::Model {
            id: Uuid::new_v4(),
            email: "t@demo.com".into(),
            password_hash: "x".into(),
            full_name: "Tekin".into(),
            phone: None,
            role: "teknisyen".into(),
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(User::try_from(row).unwrap().role, Role::Technician);
    }
}
