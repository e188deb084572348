#![allow(dead_code)]

use serde_json::{json, Value};

pub const TS: &str = "2026-01-05T09:30:00Z";

pub fn user(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{role}@example.com"),
        "full_name": format!("{role} user"),
        "phone": null,
        "role": role,
        "is_active": true,
        "created_at": TS,
    })
}

pub fn ticket(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "customer_id": "6f1c2a4e-0000-4000-8000-000000000001",
        "customer_name": "Ali Veli",
        "device_type": "Laptop",
        "brand": "Dell",
        "model": "XPS 13",
        "description": "Screen flickers",
        "priority": "acil",
        "status": status,
        "assigned_technician_id": null,
        "assigned_technician_name": null,
        "images": [],
        "cost_estimate": null,
        "final_cost": null,
        "payment_status": "beklemede",
        "created_by": "6f1c2a4e-0000-4000-8000-0000000000aa",
        "created_at": TS,
        "updated_at": TS,
        "completed_at": if status == "tamamlandi" { json!(TS) } else { Value::Null },
    })
}

pub fn problem(status: u16, detail: &str) -> Value {
    json!({
        "type": "about:blank",
        "title": "Error",
        "status": status,
        "detail": detail,
        "instance": "/api",
        "code": "TEST",
    })
}
