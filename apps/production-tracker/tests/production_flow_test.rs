//! E2E Integration Tests for the Production Pipeline
//!
//! Drives the full flow through the HTTP API: catalog setup, customer
//! intake, order placement, stage progression and invoicing.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use production_tracker::{BusinessRules, Container, create_router};

// =============================================================================
// Helpers
// =============================================================================

struct Client {
    app: Router,
}

impl Client {
    fn new() -> Self {
        Self {
            app: create_router(Container::in_memory(BusinessRules::default()).app_state()),
        }
    }

    async fn call(&self, method: &str, uri: &str, admin: bool, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-actor", if admin { "owner" } else { "asha" })
            .header("x-actor-role", if admin { "admin" } else { "staff" })
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn created(&self, uri: &str, admin: bool, body: Value) -> Value {
        let (status, body) = self.call("POST", uri, admin, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
        body["data"].clone()
    }
}

/// Catalog with Cutting (10, Cutter) and Stitching (20, Tailor), one vendor
/// per role. Returns (cutting, stitching, cutter, tailor) ids.
async fn seed_catalog(client: &Client) -> (u64, u64, u64, u64) {
    let cutter_role = client
        .created("/api/v1/vendor-roles", true, json!({"name": "Cutter"}))
        .await;
    let tailor_role = client
        .created("/api/v1/vendor-roles", true, json!({"name": "Tailor"}))
        .await;
    let cutting = client
        .created(
            "/api/v1/pipeline-stages",
            true,
            json!({"name": "Cutting", "ordinal": 10, "required_role": cutter_role["id"]}),
        )
        .await;
    let stitching = client
        .created(
            "/api/v1/pipeline-stages",
            true,
            json!({"name": "Stitching", "ordinal": 20, "required_role": tailor_role["id"]}),
        )
        .await;
    let cutter = client
        .created(
            "/api/v1/vendors",
            true,
            json!({"name": "Imran", "role": cutter_role["id"], "phone_numbers": ["9845011111"]}),
        )
        .await;
    let tailor = client
        .created(
            "/api/v1/vendors",
            true,
            json!({"name": "Lakshmi", "role": tailor_role["id"], "phone_numbers": ["9845022222"]}),
        )
        .await;
    (
        cutting["id"].as_u64().unwrap(),
        stitching["id"].as_u64().unwrap(),
        cutter["id"].as_u64().unwrap(),
        tailor["id"].as_u64().unwrap(),
    )
}

async fn place_order(client: &Client, customer_id: &Value, amount: &str) -> u64 {
    let order = client
        .created(
            "/api/v1/orders",
            false,
            json!({
                "customer_id": customer_id,
                "placed_on": "2026-03-02",
                "specifications": "Two-piece suit",
                "amount": amount
            }),
        )
        .await;
    order["id"].as_u64().unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn order_moves_through_the_pipeline() {
    let client = Client::new();
    let (cutting, stitching, cutter, tailor) = seed_catalog(&client).await;

    let customer = client
        .created(
            "/api/v1/customers",
            false,
            json!({"name": "Meera Nair", "email": "meera@example.com", "phone": "9840012345"}),
        )
        .await;
    let measurement = client
        .created(
            "/api/v1/measurements",
            false,
            json!({"customer_id": customer["id"], "garment_type": "Suite", "values": {"chest": "40"}}),
        )
        .await;

    let (status, body) = client
        .call(
            "POST",
            "/api/v1/orders",
            false,
            Some(json!({
                "customer_id": customer["id"],
                "placed_on": "2026-03-02",
                "amount": "1499.999",
                "measurement_id": measurement["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order #1 for Meera Nair created successfully.");
    assert_eq!(body["data"]["amount"], "1499.99");
    assert_eq!(body["data"]["status"]["status"], "New");

    // Stitching added first; ordinals decide the sequence, not insertion.
    let stitch_row = client
        .created(
            "/api/v1/orders/1/stages",
            false,
            json!({"stage_id": stitching, "assigned_vendor": tailor, "start_date": "2026-03-05"}),
        )
        .await;
    let cut_row = client
        .created(
            "/api/v1/orders/1/stages",
            false,
            json!({"stage_id": cutting, "assigned_vendor": cutter, "start_date": "2026-03-03"}),
        )
        .await;

    let (_, detail) = client.call("GET", "/api/v1/orders/1", false, None).await;
    assert_eq!(detail["order"]["status"]["status"], "Pending");
    assert_eq!(detail["stages"][0]["stage_name"], "Cutting");
    assert_eq!(detail["stages"][1]["stage_name"], "Stitching");

    let (status, body) = client
        .call(
            "PUT",
            &format!("/api/v1/orders/1/stages/{}", cut_row["id"]),
            false,
            Some(json!({"status": "Completed", "assigned_vendor": cutter})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stage completed. Stitching is now in progress.");
    assert_eq!(body["data"]["activated"], stitch_row["id"]);
    assert_eq!(body["data"]["order_status"]["status"], "In-Progress");

    let (_, detail) = client.call("GET", "/api/v1/orders/1", false, None).await;
    assert_eq!(detail["current_stage"]["stage_name"], "Stitching");
    assert!(detail["stages"][0]["end_date"].is_string());

    let (_, body) = client
        .call(
            "PUT",
            &format!("/api/v1/orders/1/stages/{}", stitch_row["id"]),
            false,
            Some(json!({"status": "Completed", "assigned_vendor": tailor})),
        )
        .await;
    assert_eq!(body["message"], "Stage updated successfully.");
    assert_eq!(body["data"]["order_status"]["status"], "Completed");

    let (_, dashboard) = client.call("GET", "/api/v1/dashboard", false, None).await;
    assert_eq!(dashboard["completed_orders"], 1);
    assert_eq!(dashboard["stages_in_progress"], 0);
}

#[tokio::test]
async fn vendor_must_hold_the_stage_role() {
    let client = Client::new();
    let (cutting, _, _, tailor) = seed_catalog(&client).await;
    let customer = client
        .created(
            "/api/v1/customers",
            false,
            json!({"name": "Ravi", "email": "ravi@example.com"}),
        )
        .await;
    let order = place_order(&client, &customer["id"], "800").await;

    let (status, body) = client
        .call(
            "POST",
            &format!("/api/v1/orders/{order}/stages"),
            false,
            Some(json!({"stage_id": cutting, "assigned_vendor": tailor, "start_date": "2026-03-03"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "assigned_vendor");

    let (_, vendors) = client
        .call("GET", &format!("/api/v1/pipeline-stages/{cutting}/vendors"), false, None)
        .await;
    assert_eq!(vendors.as_array().unwrap().len(), 1);
    assert_eq!(vendors[0]["name"], "Imran");
}

#[tokio::test]
async fn an_order_belongs_to_one_invoice() {
    let client = Client::new();
    let customer = client
        .created(
            "/api/v1/customers",
            false,
            json!({"name": "Anil", "email": "anil@example.com"}),
        )
        .await;
    let first = place_order(&client, &customer["id"], "1000").await;
    let second = place_order(&client, &customer["id"], "250.50").await;

    let (status, body) = client
        .call(
            "POST",
            "/api/v1/invoices",
            false,
            Some(json!({"order_ids": [first, second]})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total"], "1250.50");
    let invoice = body["data"]["id"].as_u64().unwrap();

    let (status, body) = client
        .call(
            "POST",
            "/api/v1/invoices",
            false,
            Some(json!({"order_ids": [second]})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflict"]["kind"], "ORDER_ALREADY_INVOICED");

    let (status, body) = client
        .call(
            "PUT",
            &format!("/api/v1/invoices/{invoice}"),
            false,
            Some(json!({"total": "1250.50", "paid": "1250.50", "paid_on": "2026-03-20"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["settled"], true);

    let (status, body) = client
        .call(
            "DELETE",
            &format!("/api/v1/invoices/{invoice}/orders/{second}"),
            false,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_ids"], json!([first]));

    let (status, _) = client
        .call(
            "POST",
            &format!("/api/v1/invoices/{invoice}/orders"),
            false,
            Some(json!({"order_ids": [second]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, dashboard) = client.call("GET", "/api/v1/dashboard", false, None).await;
    assert_eq!(dashboard["total_orders"], 2);
}

#[tokio::test]
async fn admin_only_listing_of_customers() {
    let client = Client::new();
    client
        .created(
            "/api/v1/customers",
            false,
            json!({"name": "Farah", "email": "farah@example.com", "phone": "+91 98450 33333"}),
        )
        .await;

    let (status, _) = client.call("GET", "/api/v1/customers", false, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = client.call("GET", "/api/v1/customers", true, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, hits) = client
        .call("GET", "/api/v1/customers/search?q=far", false, None)
        .await;
    assert_eq!(hits[0]["name"], "Farah");
}

#[tokio::test]
async fn manual_status_overrides_and_clears() {
    let client = Client::new();
    let customer = client
        .created(
            "/api/v1/customers",
            false,
            json!({"name": "Joseph", "email": "joseph@example.com"}),
        )
        .await;
    let order = place_order(&client, &customer["id"], "600").await;

    let (_, body) = client
        .call(
            "PUT",
            &format!("/api/v1/orders/{order}/status"),
            false,
            Some(json!({"status": "Cancelled"})),
        )
        .await;
    assert_eq!(body["data"]["status"]["source"], "MANUAL");
    assert_eq!(body["data"]["status"]["status"], "Cancelled");

    let (_, listed) = client
        .call("GET", "/api/v1/orders?status=Cancelled", false, None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, body) = client
        .call(
            "PUT",
            &format!("/api/v1/orders/{order}/status"),
            false,
            Some(json!({"status": null})),
        )
        .await;
    assert_eq!(body["data"]["status"]["source"], "DERIVED");
}
