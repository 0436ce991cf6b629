use axum_test::TestServer;
use serde_json::{json, Value};

use shiptrack_lib::{Shipment, ShipmentPage, ShipmentStatus};
use shiptrack_service::{router, AppState};

fn test_server() -> TestServer {
    let state = AppState::open_in_memory().expect("in-memory store");
    TestServer::new(router(state)).expect("test server")
}

fn create_payload(tracking: &str) -> Value {
    json!({
        "tracking_number": tracking,
        "shipper": "Northgate Depot",
        "consignee": "Acme Retail",
        "origin": "Rotterdam",
        "destination": "Hamburg"
    })
}

async fn create(server: &TestServer, tracking: &str) -> Shipment {
    let response = server.post("/shipments").json(&create_payload(tracking)).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Shipment>()
}

#[tokio::test]
async fn health_returns_fixed_payload() {
    let server = test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"status": "ok"}));
}

#[tokio::test]
async fn create_assigns_id_and_timestamps() {
    let server = test_server();

    let created = create(&server, "TMS-00001").await;

    assert!(created.id >= 1);
    assert_eq!(created.tracking_number, "TMS-00001");
    assert_eq!(created.status, ShipmentStatus::Created);
    assert_eq!(created.pieces, 1);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn create_and_get_scenario() {
    let server = test_server();

    let mut payload = create_payload("TMS-00001");
    payload["pieces"] = json!(3);
    payload["weight_kg"] = json!(10.5);
    let response = server.post("/shipments").json(&payload).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let created = response.json::<Shipment>();

    let fetched = server
        .get(&format!("/shipments/{}", created.id))
        .await
        .json::<Shipment>();

    assert_eq!(fetched.tracking_number, "TMS-00001");
    assert_eq!(fetched.pieces, 3);
    assert_eq!(fetched.weight_kg, 10.5);
    assert_eq!(fetched.status, ShipmentStatus::Created);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_duplicate_tracking_number_conflicts() {
    let server = test_server();
    create(&server, "TMS-00001").await;

    let response = server
        .post("/shipments")
        .json(&create_payload("TMS-00001"))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
    let problem = response.json::<Value>();
    assert_eq!(problem["type"], "/problems/duplicate-tracking-number");

    // The failed create left the store unchanged.
    let page = server.get("/shipments").await.json::<ShipmentPage>();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn create_with_invalid_field_is_rejected() {
    let server = test_server();

    let mut payload = create_payload("TMS-00001");
    payload["pieces"] = json!(0);
    let response = server.post("/shipments").json(&payload).await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let problem = response.json::<Value>();
    assert_eq!(problem["type"], "/problems/invalid-request");
    assert!(problem["detail"].as_str().unwrap().contains("pieces"));

    let page = server.get("/shipments").await.json::<ShipmentPage>();
    assert_eq!(page.total, 0, "no partial writes on validation failure");
}

#[tokio::test]
async fn create_with_unknown_status_is_rejected() {
    let server = test_server();

    let mut payload = create_payload("TMS-00001");
    payload["status"] = json!("misplaced");
    let response = server.post("/shipments").json(&payload).await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_missing_shipment_is_not_found() {
    let server = test_server();

    let response = server.get("/shipments/12345").await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let problem = response.json::<Value>();
    assert_eq!(problem["type"], "/problems/shipment-not-found");
    assert_eq!(problem["status"], 404);
}

#[tokio::test]
async fn put_applies_only_present_fields() {
    let server = test_server();
    let created = create(&server, "TMS-00001").await;

    let response = server
        .put(&format!("/shipments/{}", created.id))
        .json(&json!({"status": "in_transit", "carrier": "DHL"}))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Shipment>();
    assert_eq!(updated.status, ShipmentStatus::InTransit);
    assert_eq!(updated.carrier.as_deref(), Some("DHL"));
    assert_eq!(updated.tracking_number, created.tracking_number);
    assert_eq!(updated.pieces, created.pieces);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn put_with_empty_body_changes_only_updated_at() {
    let server = test_server();
    let created = create(&server, "TMS-00001").await;

    let response = server
        .put(&format!("/shipments/{}", created.id))
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Shipment>();

    let mut expected = created.clone();
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn put_missing_shipment_is_not_found_and_creates_nothing() {
    let server = test_server();

    let response = server
        .put("/shipments/999999")
        .json(&json!({"status": "delivered"}))
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let page = server.get("/shipments").await.json::<ShipmentPage>();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn put_that_would_violate_a_constraint_is_rejected() {
    let server = test_server();
    let created = create(&server, "TMS-00001").await;

    let response = server
        .put(&format!("/shipments/{}", created.id))
        .json(&json!({"weight_kg": -2.0}))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let fetched = server
        .get(&format!("/shipments/{}", created.id))
        .await
        .json::<Shipment>();
    assert_eq!(fetched, created, "rejected update must not write");
}

#[tokio::test]
async fn put_to_taken_tracking_number_conflicts() {
    let server = test_server();
    create(&server, "TMS-00001").await;
    let second = create(&server, "TMS-00002").await;

    let response = server
        .put(&format!("/shipments/{}", second.id))
        .json(&json!({"tracking_number": "TMS-00001"}))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let server = test_server();
    let created = create(&server, "TMS-00001").await;

    let response = server.delete(&format!("/shipments/{}", created.id)).await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);
    assert_eq!(response.text(), "", "delete returns an empty body");

    let response = server.get(&format!("/shipments/{}", created.id)).await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let response = server.delete(&format!("/shipments/{}", created.id)).await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_defaults_to_ten_newest_first() {
    let server = test_server();
    for i in 0..12 {
        create(&server, &format!("TMS-{i:05}")).await;
    }

    let page = server.get("/shipments").await.json::<ShipmentPage>();

    assert_eq!(page.total, 12);
    assert_eq!(page.items.len(), 10);

    let ids: Vec<i64> = page.items.iter().map(|s| s.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted, "newest (highest id) first");
}

#[tokio::test]
async fn list_clamps_out_of_range_parameters() {
    let server = test_server();
    for i in 0..3 {
        create(&server, &format!("TMS-{i:05}")).await;
    }

    // limit=0 clamps to 1, never rejected.
    let response = server.get("/shipments").add_query_param("limit", 0).await;
    response.assert_status_ok();
    let page = response.json::<ShipmentPage>();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 3);

    // limit=1000 clamps to 100.
    let response = server.get("/shipments").add_query_param("limit", 1000).await;
    response.assert_status_ok();
    assert_eq!(response.json::<ShipmentPage>().items.len(), 3);

    // offset=-5 clamps to 0.
    let response = server
        .get("/shipments")
        .add_query_param("offset", -5)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<ShipmentPage>().items.len(), 3);
}

#[tokio::test]
async fn paging_covers_every_record_exactly_once() {
    let server = test_server();
    for i in 0..7 {
        create(&server, &format!("TMS-{i:05}")).await;
    }

    let mut seen = Vec::new();
    let mut offset = 0;
    loop {
        let page = server
            .get("/shipments")
            .add_query_param("limit", 3)
            .add_query_param("offset", offset)
            .await
            .json::<ShipmentPage>();
        assert_eq!(page.total, 7);
        if page.items.is_empty() {
            break;
        }
        seen.extend(page.items.iter().map(|s| s.id));
        offset += 3;
    }

    let mut unique = seen.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(seen.len(), 7, "every record appears");
    assert_eq!(unique.len(), 7, "no record appears twice");
}
