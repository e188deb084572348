use api_ingress::problem::Problem;
use repairdesk_contract::{PaymentStatus, Priority, Role, TicketStatus};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "RepairDesk API", description = "Repair ticket management"),
    paths(
        handlers::login,
        handlers::register,
        handlers::me,
        handlers::stats,
        handlers::list_repairs,
        handlers::create_repair,
        handlers::get_repair,
        handlers::update_repair,
        handlers::list_customers,
        handlers::create_customer,
        handlers::list_users,
        handlers::upload_file,
    ),
    components(schemas(
        dto::LoginReq,
        dto::RegisterReq,
        dto::UserDto,
        dto::TokenDto,
        dto::CustomerDto,
        dto::CreateCustomerReq,
        dto::RepairDto,
        dto::CreateRepairReq,
        dto::UpdateRepairReq,
        dto::StatsDto,
        dto::UploadDto,
        Role,
        TicketStatus,
        Priority,
        PaymentStatus,
        Problem,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Login and registration"),
        (name = "repairs", description = "Repair tickets"),
        (name = "customers", description = "Customer records"),
        (name = "users", description = "Accounts"),
        (name = "uploads", description = "Attachments"),
    )
)]
pub struct RepairsApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
