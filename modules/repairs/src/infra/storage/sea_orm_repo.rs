//! SeaORM-backed implementations of the domain repository ports.
//!
//! Each repository is generic over `C: ConnectionTrait`, so it can be built
//! from a `DatabaseConnection` or from a transaction.

use anyhow::Context;
use repairdesk_contract::{Role, TicketStatus};
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::contract::model::{Customer, RepairTicket, User};
use crate::domain::repo::{
    CustomersRepository, RepairChanges, RepairScope, RepairsRepository, UsersRepository,
};
use crate::infra::storage::entity::{customer, repair, user};
use crate::infra::storage::mapper::images_to_column;

pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("users.find_by_id failed")?;
        found.map(User::try_from).transpose()
    }

    async fn find_with_hash(&self, email: &str) -> anyhow::Result<Option<(User, String)>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("users.find_with_hash failed")?;
        match found {
            Some(m) => {
                let hash = m.password_hash.clone();
                Ok(Some((User::try_from(m)?, hash)))
            }
            None => Ok(None),
        }
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("users.email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, u: User, password_hash: String) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id),
            email: Set(u.email),
            password_hash: Set(password_hash),
            full_name: Set(u.full_name),
            phone: Set(u.phone),
            role: Set(u.role.as_str().to_string()),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
        };
        let _ = m.insert(&self.conn).await.context("users.insert failed")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("users.list failed")?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn count_by_role(&self, role: Role) -> anyhow::Result<u64> {
        user::Entity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(&self.conn)
            .await
            .context("users.count_by_role failed")
    }
}

pub struct SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> CustomersRepository for SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>> {
        let found = customer::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("customers.find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Customer>> {
        let found = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .order_by_asc(customer::Column::CreatedAt)
            .one(&self.conn)
            .await
            .context("customers.find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, c: Customer) -> anyhow::Result<()> {
        let m = customer::ActiveModel {
            id: Set(c.id),
            full_name: Set(c.full_name),
            phone: Set(c.phone),
            email: Set(c.email),
            address: Set(c.address),
            created_by_technician: Set(c.created_by_technician),
            created_at: Set(c.created_at),
        };
        let _ = m
            .insert(&self.conn)
            .await
            .context("customers.insert failed")?;
        Ok(())
    }

    async fn list(&self, technician: Option<Uuid>) -> anyhow::Result<Vec<Customer>> {
        let mut query = customer::Entity::find();
        if let Some(tech) = technician {
            query = query.filter(customer::Column::CreatedByTechnician.eq(tech));
        }
        let rows = query
            .order_by_desc(customer::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("customers.list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        customer::Entity::find()
            .count(&self.conn)
            .await
            .context("customers.count failed")
    }
}

pub struct SeaOrmRepairsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRepairsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn scope_condition(scope: RepairScope) -> Condition {
    match scope {
        RepairScope::All => Condition::all(),
        RepairScope::AssignedTo(id) => {
            Condition::all().add(repair::Column::AssignedTechnicianId.eq(id))
        }
        RepairScope::CreatedBy(id) => Condition::all().add(repair::Column::CreatedBy.eq(id)),
    }
}

fn to_active(r: RepairTicket) -> anyhow::Result<repair::ActiveModel> {
    Ok(repair::ActiveModel {
        id: Set(r.id),
        customer_id: Set(r.customer_id),
        customer_name: Set(r.customer_name),
        device_type: Set(r.device_type),
        brand: Set(r.brand),
        device_model: Set(r.model),
        description: Set(r.description),
        priority: Set(r.priority.as_str().to_string()),
        status: Set(r.status.as_str().to_string()),
        assigned_technician_id: Set(r.assigned_technician_id),
        assigned_technician_name: Set(r.assigned_technician_name),
        images: Set(images_to_column(&r.images)?),
        cost_estimate: Set(r.cost_estimate),
        final_cost: Set(r.final_cost),
        payment_status: Set(r.payment_status.as_str().to_string()),
        created_by: Set(r.created_by),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
        completed_at: Set(r.completed_at),
    })
}

#[async_trait::async_trait]
impl<C> RepairsRepository for SeaOrmRepairsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<RepairTicket>> {
        let found = repair::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("repairs.find_by_id failed")?;
        found.map(RepairTicket::try_from).transpose()
    }

    async fn insert(&self, r: RepairTicket) -> anyhow::Result<()> {
        let _ = to_active(r)?
            .insert(&self.conn)
            .await
            .context("repairs.insert failed")?;
        Ok(())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        expected_status: Option<TicketStatus>,
        changes: RepairChanges,
    ) -> anyhow::Result<bool> {
        let mut m = repair::ActiveModel {
            updated_at: Set(changes.updated_at),
            ..Default::default()
        };
        if let Some(s) = changes.status {
            m.status = Set(s.as_str().to_string());
        }
        if let Some(at) = changes.completed_at {
            m.completed_at = Set(Some(at));
        }
        if let Some((tech_id, tech_name)) = changes.assigned_technician {
            m.assigned_technician_id = Set(Some(tech_id));
            m.assigned_technician_name = Set(Some(tech_name));
        }
        if let Some(v) = changes.cost_estimate {
            m.cost_estimate = Set(Some(v));
        }
        if let Some(v) = changes.final_cost {
            m.final_cost = Set(Some(v));
        }
        if let Some(p) = changes.payment_status {
            m.payment_status = Set(p.as_str().to_string());
        }

        let mut cond = Condition::all().add(repair::Column::Id.eq(id));
        if let Some(s) = expected_status {
            cond = cond.add(repair::Column::Status.eq(s.as_str()));
        }
        let res = repair::Entity::update_many()
            .set(m)
            .filter(cond)
            .exec(&self.conn)
            .await
            .context("repairs.update_fields failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self, scope: RepairScope) -> anyhow::Result<Vec<RepairTicket>> {
        let rows = repair::Entity::find()
            .filter(scope_condition(scope))
            .order_by_desc(repair::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("repairs.list failed")?;
        rows.into_iter().map(RepairTicket::try_from).collect()
    }

    async fn count(&self, scope: RepairScope, status: Option<TicketStatus>) -> anyhow::Result<u64> {
        let mut cond = scope_condition(scope);
        if let Some(s) = status {
            cond = cond.add(repair::Column::Status.eq(s.as_str()));
        }
        repair::Entity::find()
            .filter(cond)
            .count(&self.conn)
            .await
            .context("repairs.count failed")
    }
}
