mod common;

use std::time::Duration;

use httpmock::prelude::*;
use repairdesk_client::model::{NewCustomer, NewRepairTicket, RepairUpdate, StatsView};
use repairdesk_client::{ApiClient, ClientError, Dashboard};
use repairdesk_contract::{Priority, Role, TicketStatus, VisibleScope};
use serde_json::json;
use uuid::Uuid;

use common::{problem, ticket, user};

const TICKET_ID: &str = "6f1c2a4e-0000-4000-8000-000000000101";
const TECH_ID: &str = "6f1c2a4e-0000-4000-8000-0000000000bb";

fn api(server: &MockServer) -> ApiClient {
    let mut api = ApiClient::new(&server.base_url()).unwrap();
    api.set_token(Some("tok".into()));
    api
}

fn global_stats() -> serde_json::Value {
    json!({
        "total_repairs": 1,
        "pending_repairs": 1,
        "completed_repairs": 0,
        "total_customers": 1,
        "total_technicians": 1,
    })
}

fn new_ticket(customer_id: Option<Uuid>) -> NewRepairTicket {
    NewRepairTicket {
        customer_id,
        device_type: "Phone".into(),
        brand: "Apple".into(),
        model: "iPhone 12".into(),
        description: "Battery drains".into(),
        priority: Priority::High,
        cost_estimate: None,
        images: vec![],
    }
}

#[tokio::test]
async fn admin_refresh_loads_everything() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/repairs")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(global_stats());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/customers");
            then.status(200).json_body(json!([{
                "id": "6f1c2a4e-0000-4000-8000-000000000001",
                "full_name": "Ali Veli",
                "phone": "555",
                "email": null,
                "address": null,
                "created_by_technician": null,
                "created_at": common::TS,
            }]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).json_body(json!([
                user("6f1c2a4e-0000-4000-8000-0000000000aa", "admin"),
                user(TECH_ID, "teknisyen"),
            ]));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Admin);
    assert_eq!(dash.visible_scope(), VisibleScope::All);
    dash.refresh().await.unwrap();

    assert_eq!(dash.repairs().len(), 1);
    assert_eq!(dash.customers().len(), 1);
    assert_eq!(dash.users().len(), 2);
    assert_eq!(dash.technicians().len(), 1);
    assert_eq!(dash.technicians()[0].id.to_string(), TECH_ID);
    assert!(matches!(
        dash.stats(),
        Some(StatsView::Global { total_repairs: 1, .. })
    ));
    assert!(!dash.is_busy());
}

#[tokio::test]
async fn customer_refresh_skips_staff_collections() {
    // No mocks for /customers or /users: hitting them would fail the refresh
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 0,
                "my_pending": 0,
                "my_completed": 0,
            }));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Customer);
    dash.refresh().await.unwrap();

    assert!(dash.customers().is_empty());
    assert!(dash.users().is_empty());
    assert!(matches!(
        dash.stats(),
        Some(StatsView::Personal { my_repairs: 0, .. })
    ));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 1,
                "my_pending": 1,
                "my_completed": 0,
            }));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Customer);
    dash.refresh().await.unwrap();

    stats.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(500).json_body(json!({ "unexpected": true }));
        })
        .await;

    let err = dash.refresh().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "The server failed to process the request");

    assert_eq!(dash.repairs().len(), 1);
    assert!(matches!(
        dash.stats(),
        Some(StatsView::Personal { my_repairs: 1, .. })
    ));
    assert!(!dash.is_busy());
}

#[tokio::test]
async fn update_refetches_after_success() {
    let server = MockServer::start_async().await;
    let pending_list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 1,
                "my_pending": 1,
                "my_completed": 0,
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/customers");
            then.status(200).json_body(json!([]));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Technician);
    dash.refresh().await.unwrap();
    assert_eq!(dash.repairs()[0].status, TicketStatus::Pending);

    let put = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(format!("/api/repairs/{TICKET_ID}"))
                .json_body(json!({ "status": "isleniyor" }));
            then.status(200).json_body(ticket(TICKET_ID, "isleniyor"));
        })
        .await;
    pending_list.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "isleniyor")]));
        })
        .await;

    let id: Uuid = TICKET_ID.parse().unwrap();
    let updated = dash
        .update_ticket(
            id,
            RepairUpdate {
                status: Some(TicketStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    put.assert_async().await;
    assert_eq!(updated.status, TicketStatus::InProgress);
    assert_eq!(dash.repairs()[0].status, TicketStatus::InProgress);
}

#[tokio::test]
async fn server_rejection_leaves_tickets_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(global_stats());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/customers");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path(format!("/api/repairs/{TICKET_ID}"));
            then.status(400)
                .json_body(problem(400, "Assigned user is not a technician"));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Admin);
    dash.refresh().await.unwrap();

    let err = dash
        .update_ticket(
            TICKET_ID.parse().unwrap(),
            RepairUpdate {
                assigned_technician_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Assigned user is not a technician");
    assert_eq!(dash.repairs()[0].assigned_technician_id, None);
    assert!(!dash.is_busy());
}

#[tokio::test]
async fn second_action_is_refused_while_one_runs() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200)
                .delay(Duration::from_millis(400))
                .json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 0,
                "my_pending": 0,
                "my_completed": 0,
            }));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Customer);
    let (first, second) = tokio::join!(dash.refresh(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        dash.refresh().await
    });

    first.unwrap();
    assert!(matches!(second, Err(ClientError::Busy)));
    assert!(!dash.is_busy());
}

#[tokio::test]
async fn role_gates_reject_before_sending() {
    // Unroutable server: any request would surface as a transport error
    let api = ApiClient::new("http://127.0.0.1:9").unwrap();
    let id = Uuid::new_v4();

    let customer = Dashboard::new(api.clone(), Role::Customer);
    let err = customer
        .update_ticket(
            id,
            RepairUpdate {
                status: Some(TicketStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let err = customer
        .create_customer(NewCustomer {
            full_name: "X".into(),
            phone: "1".into(),
            email: None,
            address: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let tech = Dashboard::new(api.clone(), Role::Technician);
    let err = tech
        .update_ticket(
            id,
            RepairUpdate {
                final_cost: Some(100.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let err = tech
        .update_ticket(
            id,
            RepairUpdate {
                assigned_technician_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let admin = Dashboard::new(api, Role::Admin);
    let err = admin
        .update_ticket(id, RepairUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "nothing to update");

    let err = admin.create_ticket(new_ticket(None)).await.unwrap_err();
    assert_eq!(err.to_string(), "select a customer");

    let mut blank = new_ticket(Some(Uuid::new_v4()));
    blank.brand = " ".into();
    let err = admin.create_ticket(blank).await.unwrap_err();
    assert_eq!(err.to_string(), "brand is required");
}

#[tokio::test]
async fn known_ticket_checks_the_workflow_locally() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "tamamlandi")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 1,
                "my_pending": 0,
                "my_completed": 1,
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/customers");
            then.status(200).json_body(json!([]));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Technician);
    dash.refresh().await.unwrap();

    let err = dash
        .update_ticket(
            TICKET_ID.parse().unwrap(),
            RepairUpdate {
                status: Some(TicketStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(err.to_string().contains("cannot move ticket"));
}

#[tokio::test]
async fn customer_ticket_needs_no_customer_id() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/repairs").json_body(json!({
                "device_type": "Phone",
                "brand": "Apple",
                "model": "iPhone 12",
                "description": "Battery drains",
                "priority": "yuksek",
            }));
            then.status(201).json_body(ticket(TICKET_ID, "beklemede"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 1,
                "my_pending": 1,
                "my_completed": 0,
            }));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Customer);
    let created = dash.create_ticket(new_ticket(None)).await.unwrap();
    create.assert_async().await;
    assert_eq!(created.status, TicketStatus::Pending);
    assert_eq!(dash.repairs().len(), 1);
}

#[tokio::test]
async fn confirmed_create_survives_a_failed_refetch() {
    let server = MockServer::start_async().await;
    let repairs = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200).json_body(json!({
                "my_repairs": 1,
                "my_pending": 1,
                "my_completed": 0,
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/customers");
            then.status(200).json_body(json!([]));
        })
        .await;

    let dash = Dashboard::new(api(&server), Role::Technician);
    dash.refresh().await.unwrap();
    assert!(!dash.is_stale());

    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/customers")
                .json_body(json!({ "full_name": "Ayse Kaya", "phone": "0532" }));
            then.status(201).json_body(json!({
                "id": "6f1c2a4e-0000-4000-8000-000000000002",
                "full_name": "Ayse Kaya",
                "phone": "0532",
                "email": null,
                "address": null,
                "created_by_technician": TECH_ID,
                "created_at": common::TS,
            }));
        })
        .await;
    repairs.delete_async().await;
    let broken = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(503).json_body(json!({}));
        })
        .await;

    let created = dash
        .create_customer(NewCustomer {
            full_name: "Ayse Kaya".into(),
            phone: "0532".into(),
            email: None,
            address: None,
        })
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(created.full_name, "Ayse Kaya");

    // Old collections stay visible until a refresh succeeds
    assert!(dash.is_stale());
    assert_eq!(dash.repairs().len(), 1);
    assert!(dash.customers().is_empty());
    assert!(!dash.is_busy());

    broken.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/repairs");
            then.status(200).json_body(json!([ticket(TICKET_ID, "beklemede")]));
        })
        .await;
    dash.refresh().await.unwrap();
    assert!(!dash.is_stale());
}
