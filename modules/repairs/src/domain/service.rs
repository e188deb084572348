use std::sync::Arc;

use chrono::Utc;
use repairdesk_contract::{PaymentStatus, Role, TicketStatus, UploadPolicy, VisibleScope};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    AccessToken, Customer, NewCustomer, NewRepairTicket, NewUser, RepairPatch, RepairTicket,
    Stats, StoredFile, User,
};
use crate::domain::auth::{hash_password, verify_password, TokenIssuer};
use crate::domain::error::DomainError;
use crate::domain::ports::FileStore;
use crate::domain::repo::{
    CustomersRepository, RepairChanges, RepairScope, RepairsRepository, UsersRepository,
};

/// Domain service: role gates, the ticket workflow and account rules.
/// Depends only on the ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    customers: Arc<dyn CustomersRepository>,
    repairs: Arc<dyn RepairsRepository>,
    files: Arc<dyn FileStore>,
    tokens: TokenIssuer,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub max_name_length: usize,
    pub upload_policy: UploadPolicy,
    /// URL prefix under which stored uploads are served.
    pub upload_url_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: crate::config::INSECURE_DEFAULT_SECRET.to_string(),
            token_ttl_minutes: 30,
            max_name_length: 200,
            upload_policy: UploadPolicy::default(),
            upload_url_prefix: "/uploads".to_string(),
        }
    }
}

/// Bundle of ports the service is wired with.
pub struct Ports {
    pub users: Arc<dyn UsersRepository>,
    pub customers: Arc<dyn CustomersRepository>,
    pub repairs: Arc<dyn RepairsRepository>,
    pub files: Arc<dyn FileStore>,
}

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

impl Service {
    pub fn new(ports: Ports, config: ServiceConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_minutes);
        Self {
            users: ports.users,
            customers: ports.customers,
            repairs: ports.repairs,
            files: ports.files,
            tokens,
            config,
        }
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.config.upload_policy
    }

    // --- accounts ---

    #[instrument(
        name = "repairs.service.register",
        skip(self, new_user),
        fields(email = %new_user.email, role = %new_user.role)
    )]
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Registering account");

        let email = normalize_email(&new_user.email);
        self.validate_email(&email)?;
        self.validate_name("full_name", &new_user.full_name)?;
        if new_user.password.is_empty() {
            return Err(DomainError::validation("password", "cannot be empty"));
        }

        if self.users.email_exists(&email).await.map_err(db_err)? {
            return Err(DomainError::email_already_exists(email));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            full_name: new_user.full_name.trim().to_string(),
            phone: non_blank(new_user.phone),
            role: new_user.role,
            is_active: true,
            created_at: Utc::now(),
        };
        let hash = hash_password(&new_user.password).await?;
        self.users
            .insert(user.clone(), hash)
            .await
            .map_err(db_err)?;

        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    #[instrument(name = "repairs.service.login", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, DomainError> {
        let email = normalize_email(email);
        let (user, hash) = self
            .users
            .find_with_hash(&email)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::InvalidCredentials)?;

        if !verify_password(password, &hash).await? {
            debug!("Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(DomainError::InactiveUser);
        }

        let access_token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "Login succeeded");
        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
            user,
        })
    }

    /// Resolve a bearer token to its account.
    #[instrument(name = "repairs.service.authenticate", skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let id = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::InvalidToken)?;
        if !user.is_active {
            return Err(DomainError::InactiveUser);
        }
        Ok(user)
    }

    #[instrument(name = "repairs.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(name = "repairs.service.list_users", skip(self, actor), fields(actor = %actor.id))]
    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>, DomainError> {
        if !actor.role.capabilities().can_list_users {
            return Err(DomainError::forbidden("list users"));
        }
        self.users.list().await.map_err(db_err)
    }

    /// Create the admin account unless the email is already taken.
    #[instrument(name = "repairs.service.ensure_admin", skip(self, password))]
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(User, bool), DomainError> {
        let email = normalize_email(email);
        if let Some((user, _)) = self.users.find_with_hash(&email).await.map_err(db_err)? {
            if user.role != Role::Admin {
                warn!(role = %user.role, "Seed email belongs to a non-admin account");
            }
            return Ok((user, false));
        }
        let user = self
            .register(NewUser {
                email,
                password: password.to_string(),
                full_name: full_name.to_string(),
                role: Role::Admin,
                phone: None,
            })
            .await?;
        Ok((user, true))
    }

    // --- customers ---

    #[instrument(name = "repairs.service.create_customer", skip(self, actor, new_customer), fields(actor = %actor.id))]
    pub async fn create_customer(
        &self,
        actor: &User,
        new_customer: NewCustomer,
    ) -> Result<Customer, DomainError> {
        if !actor.role.capabilities().can_create_customer {
            return Err(DomainError::forbidden("create customers"));
        }
        self.validate_name("full_name", &new_customer.full_name)?;
        if new_customer.phone.trim().is_empty() {
            return Err(DomainError::validation("phone", "cannot be empty"));
        }
        let email = non_blank(new_customer.email).map(|e| normalize_email(&e));
        if let Some(ref e) = email {
            self.validate_email(e)?;
        }

        let customer = Customer {
            id: Uuid::new_v4(),
            full_name: new_customer.full_name.trim().to_string(),
            phone: new_customer.phone.trim().to_string(),
            email,
            address: non_blank(new_customer.address),
            created_by_technician: (actor.role == Role::Technician).then_some(actor.id),
            created_at: Utc::now(),
        };
        self.customers
            .insert(customer.clone())
            .await
            .map_err(db_err)?;

        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    #[instrument(name = "repairs.service.list_customers", skip(self, actor), fields(actor = %actor.id))]
    pub async fn list_customers(&self, actor: &User) -> Result<Vec<Customer>, DomainError> {
        let caps = actor.role.capabilities();
        if !caps.can_list_customers {
            return Err(DomainError::forbidden("list customers"));
        }
        let owner = match caps.visible_scope {
            VisibleScope::All => None,
            _ => Some(actor.id),
        };
        self.customers.list(owner).await.map_err(db_err)
    }

    // --- repair tickets ---

    #[instrument(
        name = "repairs.service.create_repair",
        skip(self, actor, new_ticket),
        fields(actor = %actor.id, priority = %new_ticket.priority)
    )]
    pub async fn create_repair(
        &self,
        actor: &User,
        new_ticket: NewRepairTicket,
    ) -> Result<RepairTicket, DomainError> {
        if !actor.role.capabilities().can_create_ticket {
            return Err(DomainError::forbidden("create repair tickets"));
        }
        for (field, value) in [
            ("device_type", &new_ticket.device_type),
            ("brand", &new_ticket.brand),
            ("model", &new_ticket.model),
            ("description", &new_ticket.description),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(field, "cannot be empty"));
            }
        }
        validate_amount("cost_estimate", new_ticket.cost_estimate)?;
        if new_ticket.images.len() > self.config.upload_policy.max_files {
            return Err(DomainError::validation("images", "too many attachments"));
        }

        let customer = self.resolve_customer(actor, new_ticket.customer_id).await?;

        let now = Utc::now();
        // A technician's own ticket lands in their queue.
        let (assigned_technician_id, assigned_technician_name) = match actor.role {
            Role::Technician => (Some(actor.id), Some(actor.full_name.clone())),
            _ => (None, None),
        };
        let ticket = RepairTicket {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            customer_name: customer.full_name,
            device_type: new_ticket.device_type.trim().to_string(),
            brand: new_ticket.brand.trim().to_string(),
            model: new_ticket.model.trim().to_string(),
            description: new_ticket.description.trim().to_string(),
            priority: new_ticket.priority,
            status: TicketStatus::Pending,
            assigned_technician_id,
            assigned_technician_name,
            images: new_ticket.images,
            cost_estimate: new_ticket.cost_estimate,
            final_cost: None,
            payment_status: PaymentStatus::Pending,
            created_by: actor.id,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.repairs.insert(ticket.clone()).await.map_err(db_err)?;

        info!(repair_id = %ticket.id, "Repair ticket created");
        Ok(ticket)
    }

    async fn resolve_customer(
        &self,
        actor: &User,
        customer_id: Option<Uuid>,
    ) -> Result<Customer, DomainError> {
        match customer_id {
            Some(id) => self
                .customers
                .find_by_id(id)
                .await
                .map_err(db_err)?
                .ok_or_else(|| DomainError::customer_not_found(id)),
            None if actor.role == Role::Customer => self
                .customers
                .find_by_email(&actor.email)
                .await
                .map_err(db_err)?
                .ok_or_else(|| DomainError::NoCustomerForEmail {
                    email: actor.email.clone(),
                }),
            None => Err(DomainError::validation("customer_id", "is required")),
        }
    }

    #[instrument(name = "repairs.service.list_repairs", skip(self, actor), fields(actor = %actor.id))]
    pub async fn list_repairs(&self, actor: &User) -> Result<Vec<RepairTicket>, DomainError> {
        let repairs = self
            .repairs
            .list(scope_for(actor))
            .await
            .map_err(db_err)?;
        debug!(count = repairs.len(), "Listed repairs");
        Ok(repairs)
    }

    #[instrument(name = "repairs.service.get_repair", skip(self, actor), fields(actor = %actor.id, repair_id = %id))]
    pub async fn get_repair(&self, actor: &User, id: Uuid) -> Result<RepairTicket, DomainError> {
        let ticket = self.load_repair(id).await?;
        if !is_visible(actor, &ticket) {
            return Err(DomainError::forbidden("view this repair ticket"));
        }
        Ok(ticket)
    }

    #[instrument(name = "repairs.service.update_repair", skip(self, actor, patch), fields(actor = %actor.id, repair_id = %id))]
    pub async fn update_repair(
        &self,
        actor: &User,
        id: Uuid,
        patch: RepairPatch,
    ) -> Result<RepairTicket, DomainError> {
        if !actor.role.capabilities().can_update_ticket() {
            return Err(DomainError::forbidden("update repair tickets"));
        }
        validate_amount("cost_estimate", patch.cost_estimate)?;
        validate_amount("final_cost", patch.final_cost)?;

        let ticket = self.load_repair(id).await?;
        let now = Utc::now();
        let mut changes = RepairChanges::at(now);

        // Set only when the status actually moves; the write is then
        // conditional on the status this decision was made from.
        let mut expected_status = None;
        if let Some(next) = patch.status {
            if let Some(moved) = ticket.status.transition(next)? {
                info!(from = %ticket.status, to = %moved, "Ticket status changed");
                expected_status = Some(ticket.status);
                changes.status = Some(moved);
                if moved == TicketStatus::Completed {
                    changes.completed_at = Some(now);
                }
            }
        }

        if let Some(tech_id) = patch.assigned_technician_id {
            let tech = self
                .users
                .find_by_id(tech_id)
                .await
                .map_err(db_err)?
                .ok_or_else(|| DomainError::user_not_found(tech_id))?;
            if tech.role != Role::Technician {
                return Err(DomainError::NotATechnician { id: tech_id });
            }
            changes.assigned_technician = Some((tech.id, tech.full_name));
        }

        changes.cost_estimate = patch.cost_estimate;
        changes.final_cost = patch.final_cost;
        changes.payment_status = patch.payment_status;

        let written = self
            .repairs
            .update_fields(id, expected_status, changes)
            .await
            .map_err(db_err)?;
        if !written {
            return Err(match expected_status {
                Some(_) => {
                    warn!("Ticket status changed underneath this update");
                    DomainError::ConcurrentUpdate { id }
                }
                None => DomainError::repair_not_found(id),
            });
        }

        self.load_repair(id).await
    }

    async fn load_repair(&self, id: Uuid) -> Result<RepairTicket, DomainError> {
        self.repairs
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::repair_not_found(id))
    }

    // --- stats ---

    #[instrument(name = "repairs.service.stats", skip(self, actor), fields(actor = %actor.id))]
    pub async fn stats(&self, actor: &User) -> Result<Stats, DomainError> {
        let scope = scope_for(actor);
        let pending = self
            .repairs
            .count(scope, Some(TicketStatus::Pending))
            .await
            .map_err(db_err)?;
        let completed = self
            .repairs
            .count(scope, Some(TicketStatus::Completed))
            .await
            .map_err(db_err)?;
        let total = self.repairs.count(scope, None).await.map_err(db_err)?;

        match scope {
            RepairScope::All => Ok(Stats::Global {
                total_repairs: total,
                pending_repairs: pending,
                completed_repairs: completed,
                total_customers: self.customers.count().await.map_err(db_err)?,
                total_technicians: self
                    .users
                    .count_by_role(Role::Technician)
                    .await
                    .map_err(db_err)?,
            }),
            _ => Ok(Stats::Personal {
                my_repairs: total,
                my_pending: pending,
                my_completed: completed,
            }),
        }
    }

    // --- uploads ---

    #[instrument(name = "repairs.service.store_upload", skip(self, actor, bytes), fields(actor = %actor.id, size = bytes.len()))]
    pub async fn store_upload(
        &self,
        actor: &User,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, DomainError> {
        if filename.trim().is_empty() {
            return Err(DomainError::validation("file", "missing file name"));
        }
        self.config
            .upload_policy
            .check_file(filename, content_type, bytes.len() as u64)?;

        let ext = UploadPolicy::extension_for(content_type);
        let stored = self
            .files
            .save(ext, bytes)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;

        info!(stored = %stored, "Upload stored");
        Ok(StoredFile {
            file_url: format!(
                "{}/{}",
                self.config.upload_url_prefix.trim_end_matches('/'),
                stored
            ),
            filename: filename.to_string(),
        })
    }

    // --- validation helpers ---

    fn validate_email(&self, email: &str) -> Result<(), DomainError> {
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(DomainError::invalid_email(email.to_string()));
        }
        Ok(())
    }

    fn validate_name(&self, field: &str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(field, "cannot be empty"));
        }
        if value.len() > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!("longer than {} characters", self.config.max_name_length),
            ));
        }
        Ok(())
    }
}

fn scope_for(actor: &User) -> RepairScope {
    match actor.role.capabilities().visible_scope {
        VisibleScope::All => RepairScope::All,
        VisibleScope::AssignedToMe => RepairScope::AssignedTo(actor.id),
        VisibleScope::CreatedByMe => RepairScope::CreatedBy(actor.id),
    }
}

fn is_visible(actor: &User, ticket: &RepairTicket) -> bool {
    match scope_for(actor) {
        RepairScope::All => true,
        RepairScope::AssignedTo(id) => ticket.assigned_technician_id == Some(id),
        RepairScope::CreatedBy(id) => ticket.created_by == id,
    }
}

fn validate_amount(field: &str, value: Option<f64>) -> Result<(), DomainError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(DomainError::validation(
            field,
            "must be a non-negative amount",
        )),
        _ => Ok(()),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
