//! Labour invoice integration tests.

mod common;

use common::{decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn labour_body(customer: &str) -> Value {
    json!({
        "customerDetails": { "name": customer, "regNo": "KA01AB1234", "invoiceDate": "2025-03-03" },
        "labourItems": [
            { "description": "Denting rear door", "tinkering": 800, "painting": "1200", "cgst": 9, "sgst": 9 },
            { "description": "Wiring check", "electrician": 300, "mechanical": 200, "subtotal": 99999 }
        ]
    })
}

#[tokio::test]
async fn totals_are_computed_server_side() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/save-labour-invoice", &labour_body("Ravi Kumar")).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(decimal(&body["totals"]["subtotal"]), dec!(2500));
    assert_eq!(decimal(&body["totals"]["cgst"]), dec!(180));
    assert_eq!(decimal(&body["totals"]["sgst"]), dec!(180));
    assert_eq!(decimal(&body["totals"]["totalDue"]), dec!(2860));

    let found: Vec<Value> = app
        .get("/search-labour-invoices?name=ravi")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(decimal(&found[0]["grand_total"]), dec!(2860));

    let items = found[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["sno"], 1);
    assert_eq!(items[1]["sno"], 2);
    assert_eq!(decimal(&items[1]["subtotal"]), dec!(500));

    app.cleanup().await;
}

#[tokio::test]
async fn labour_invoice_needs_items() {
    let app = TestApp::spawn().await;

    let body = json!({ "customerDetails": { "name": "Ravi" }, "labourItems": [] });
    assert_eq!(app.post_json("/save-labour-invoice", &body).await.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn labour_charges_are_bounded() {
    let app = TestApp::spawn().await;

    for item in [
        json!({ "description": "Dent", "tinkering": -100 }),
        json!({ "description": "Dent", "mechanical": "99999999999" }),
        json!({ "description": "Dent", "tinkering": 100, "cgst": 1000 }),
        json!({ "description": "   ", "tinkering": 100 }),
    ] {
        let body = json!({ "customerDetails": { "name": "Ravi" }, "labourItems": [item] });
        let response = app.post_json("/save-labour-invoice", &body).await;
        assert_eq!(response.status().as_u16(), 400, "accepted {}", body);
    }

    let blank_name = json!({
        "customerDetails": { "name": " " },
        "labourItems": [{ "description": "Dent", "tinkering": 100 }]
    });
    assert_eq!(
        app.post_json("/save-labour-invoice", &blank_name).await.status().as_u16(),
        400
    );

    app.cleanup().await;
}

#[tokio::test]
async fn summary_captures_stored_items_by_default() {
    let app = TestApp::spawn().await;
    let saved: Value = app
        .post_json("/save-labour-invoice", &labour_body("Ravi Kumar"))
        .await
        .json()
        .await
        .unwrap();

    let summary = json!({
        "invoiceId": saved["invoiceId"],
        "customerName": "Ravi Kumar",
        "invoiceDate": "2025-03-03",
        "subtotal": 2500,
        "cgst": 180,
        "sgst": 180,
        "totalDue": 2860
    });

    let response = app.post_json("/labour-invoice-summary", &summary).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let items = body["summary"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["description"], "Denting rear door");

    let mut with_items = summary.clone();
    with_items["items"] = json!([{ "description": "custom" }]);
    let body: Value = app
        .post_json("/labour-invoice-summary", &with_items)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["summary"]["items"][0]["description"], "custom");

    app.cleanup().await;
}

#[tokio::test]
async fn summary_for_missing_invoice_is_404() {
    let app = TestApp::spawn().await;

    let summary = json!({
        "invoiceId": 777777,
        "customerName": "Nobody",
        "invoiceDate": "2025-03-03",
        "subtotal": 0, "cgst": 0, "sgst": 0, "totalDue": 0
    });
    assert_eq!(
        app.post_json("/labour-invoice-summary", &summary).await.status().as_u16(),
        404
    );

    app.cleanup().await;
}

#[tokio::test]
async fn latest_labour_invoice_id() {
    let app = TestApp::spawn().await;

    let empty: Value = app.get("/latest-labour-invoice-id").await.json().await.unwrap();
    assert_eq!(empty["invoiceId"], 0);

    let saved: Value = app
        .post_json("/save-labour-invoice", &labour_body("Ravi Kumar"))
        .await
        .json()
        .await
        .unwrap();
    let latest: Value = app.get("/latest-labour-invoice-id").await.json().await.unwrap();
    assert_eq!(latest["invoiceId"], saved["invoiceId"]);

    app.cleanup().await;
}
