//! Estimate (quotation) integration tests.

mod common;

use common::{decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn estimate_body(customer: &str) -> Value {
    json!({
        "customerDetails": { "name": customer, "model": "Swift", "invoiceDate": "2025-03-02" },
        "selectedParts": [
            { "part_no": "BRK-100", "quantity": 2, "rate": "400", "cgst": 9, "sgst": 9 },
            { "part_no": "OIL-1", "quantity": 1, "rate": "500" }
        ]
    })
}

#[tokio::test]
async fn estimate_does_not_touch_stock() {
    let app = TestApp::spawn().await;
    let part_id = app.seed_part("BRK-100", 1, "400").await;

    let response = app.post_json("/service-estimate", &estimate_body("Ravi Kumar")).await;
    assert_eq!(response.status().as_u16(), 200);

    let saved: Value = response.json().await.unwrap();
    let estimate_id = saved["estimateId"].as_i64().unwrap();
    assert_eq!(app.part_qty(part_id).await, 1);

    let estimate: Value = app
        .get(&format!("/estimate/{}", estimate_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(estimate["customer_name"], "Ravi Kumar");
    assert_eq!(estimate["document_type"], "estimate");
    assert_eq!(estimate["parts"].as_array().unwrap().len(), 2);
    assert_eq!(decimal(&estimate["total_amount"]), dec!(1444));

    app.cleanup().await;
}

#[tokio::test]
async fn explicit_total_is_kept() {
    let app = TestApp::spawn().await;

    let mut body = estimate_body("Meera");
    body["totalDue"] = json!("1500.50");
    let saved: Value = app.post_json("/service-estimate", &body).await.json().await.unwrap();

    let estimate: Value = app
        .get(&format!("/estimate/{}", saved["estimateId"]))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(decimal(&estimate["total_amount"]), dec!(1500.50));

    app.cleanup().await;
}

#[tokio::test]
async fn oversized_or_negative_total_is_rejected() {
    let app = TestApp::spawn().await;

    for total in [json!("99999999999"), json!(-5)] {
        let mut body = estimate_body("Meera");
        body["totalDue"] = total;
        let response = app.post_json("/service-estimate", &body).await;
        assert_eq!(response.status().as_u16(), 400);
    }

    let latest: Value = app.get("/latest-estimate-id").await.json().await.unwrap();
    assert_eq!(latest["estimateId"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn search_filters_by_name_and_type() {
    let app = TestApp::spawn().await;
    let first: Value = app
        .post_json("/service-estimate", &estimate_body("Ravi Kumar"))
        .await
        .json()
        .await
        .unwrap();
    app.post_json("/service-estimate", &estimate_body("Ravi Shankar")).await;
    app.post_json("/service-estimate", &estimate_body("Meera")).await;

    app.post_json(&format!("/estimate/{}/convert", first["estimateId"]), &json!({}))
        .await;

    let ravis: Vec<Value> = app.get("/search-estimates?name=ravi").await.json().await.unwrap();
    assert_eq!(ravis.len(), 2);

    let invoices: Vec<Value> = app
        .get("/search-estimates?name=ravi&document_type=invoice")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["customer_name"], "Ravi Kumar");

    assert_eq!(
        app.get("/search-estimates?document_type=bogus").await.status().as_u16(),
        400
    );

    app.cleanup().await;
}

#[tokio::test]
async fn convert_only_once() {
    let app = TestApp::spawn().await;
    let saved: Value = app
        .post_json("/service-estimate", &estimate_body("Ravi Kumar"))
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/estimate/{}/convert", saved["estimateId"]);

    let response = app.post_json(&path, &json!({})).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["estimate"]["document_type"], "invoice");

    assert_eq!(app.post_json(&path, &json!({})).await.status().as_u16(), 400);
    assert_eq!(
        app.post_json("/estimate/999999/convert", &json!({}))
            .await
            .status()
            .as_u16(),
        404
    );

    app.cleanup().await;
}

#[tokio::test]
async fn latest_estimate_id() {
    let app = TestApp::spawn().await;

    let empty: Value = app.get("/latest-estimate-id").await.json().await.unwrap();
    assert_eq!(empty["estimateId"], 0);

    let saved: Value = app
        .post_json("/service-estimate", &estimate_body("Ravi Kumar"))
        .await
        .json()
        .await
        .unwrap();
    let latest: Value = app.get("/latest-estimate-id").await.json().await.unwrap();
    assert_eq!(latest["estimateId"], saved["estimateId"]);

    assert_eq!(app.get("/estimate/999999").await.status().as_u16(), 404);

    app.cleanup().await;
}
