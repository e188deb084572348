use serde::{Deserialize, Serialize};

use crate::model::Role;

/// Which tickets a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibleScope {
    All,
    AssignedToMe,
    CreatedByMe,
}

/// What a role may do from its dashboard. Read by both the backend gates
/// and the client view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_assign: bool,
    pub can_set_cost: bool,
    pub can_update_status: bool,
    pub can_create_ticket: bool,
    pub can_create_customer: bool,
    pub can_list_customers: bool,
    pub can_list_users: bool,
    pub visible_scope: VisibleScope,
}

impl Capabilities {
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                can_assign: true,
                can_set_cost: true,
                can_update_status: true,
                can_create_ticket: true,
                can_create_customer: true,
                can_list_customers: true,
                can_list_users: true,
                visible_scope: VisibleScope::All,
            },
            Role::Technician => Self {
                can_assign: false,
                can_set_cost: true,
                can_update_status: true,
                can_create_ticket: true,
                can_create_customer: true,
                can_list_customers: true,
                can_list_users: false,
                visible_scope: VisibleScope::AssignedToMe,
            },
            Role::Customer => Self {
                can_assign: false,
                can_set_cost: false,
                can_update_status: false,
                can_create_ticket: true,
                can_create_customer: false,
                can_list_customers: false,
                can_list_users: false,
                visible_scope: VisibleScope::CreatedByMe,
            },
        }
    }

    /// Whether the role may send ticket updates at all.
    pub fn can_update_ticket(&self) -> bool {
        self.can_update_status || self.can_set_cost || self.can_assign
    }
}

impl Role {
    pub const fn capabilities(self) -> Capabilities {
        Capabilities::for_role(self)
    }

    /// Landing page for a freshly authenticated user.
    pub fn landing_route(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Technician => "/teknisyen",
            Role::Customer => "/musteri",
        }
    }
}
