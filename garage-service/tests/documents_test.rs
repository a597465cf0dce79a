//! Customer list, status and deletion integration tests.

mod common;

use common::{invoice_body, TestApp};
use serde_json::{json, Value};

async fn save_tax_invoice(app: &TestApp, customer: &str) -> i64 {
    let part_id = app.seed_part(&format!("P-{}", customer), 5, "100").await;
    let saved: Value = app
        .post_json(
            "/save-invoice",
            &invoice_body(customer, part_id, &format!("P-{}", customer), 1, "100"),
        )
        .await
        .json()
        .await
        .unwrap();
    saved["invoiceId"].as_i64().unwrap()
}

async fn save_labour_invoice(app: &TestApp, customer: &str) -> i64 {
    let saved: Value = app
        .post_json(
            "/save-labour-invoice",
            &json!({
                "customerDetails": { "name": customer },
                "labourItems": [{ "description": "Service", "mechanical": 1000 }]
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    saved["invoiceId"].as_i64().unwrap()
}

#[tokio::test]
async fn customers_lists_by_family() {
    let app = TestApp::spawn().await;
    save_tax_invoice(&app, "Ravi").await;
    save_labour_invoice(&app, "Meera").await;

    let tax: Vec<Value> = app.get("/customers").await.json().await.unwrap();
    assert_eq!(tax.len(), 1);
    assert_eq!(tax[0]["customer_name"], "Ravi");
    assert_eq!(tax[0]["invoice_type"], "tax");

    let labour: Vec<Value> = app.get("/customers?type=LABOUR").await.json().await.unwrap();
    assert_eq!(labour.len(), 1);
    assert_eq!(labour[0]["customer_name"], "Meera");
    assert_eq!(labour[0]["status"], "Pending");

    assert_eq!(app.get("/customers?type=misc").await.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn update_status_changes_document() {
    let app = TestApp::spawn().await;
    let tax_id = save_tax_invoice(&app, "Ravi").await;
    let labour_id = save_labour_invoice(&app, "Meera").await;

    let response = app
        .put_json(&format!("/update-status/{}", tax_id), &json!({ "status": "Paid" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .put_json(
            &format!("/update-status/{}", labour_id),
            &json!({ "status": "Completed", "invoice_type": "labour" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let invoice: Value = app
        .get(&format!("/invoice/{}", tax_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(invoice["status"], "Paid");

    let labour: Vec<Value> = app.get("/customers?type=labour").await.json().await.unwrap();
    assert_eq!(labour[0]["status"], "Completed");

    app.cleanup().await;
}

#[tokio::test]
async fn update_status_rejects_bad_input() {
    let app = TestApp::spawn().await;
    let tax_id = save_tax_invoice(&app, "Ravi").await;

    let response = app
        .put_json(&format!("/update-status/{}", tax_id), &json!({ "status": "Refunded" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid status: must be Pending, Paid or Completed");

    let response = app
        .put_json("/update-status/999999", &json!({ "status": "Paid" }))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_removes_document_and_lines() {
    let app = TestApp::spawn().await;
    let tax_id = save_tax_invoice(&app, "Ravi").await;
    let labour_id = save_labour_invoice(&app, "Meera").await;

    let response = app.delete(&format!("/delete-invoice/{}", tax_id)).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        app.get(&format!("/invoice/{}", tax_id)).await.status().as_u16(),
        404
    );

    let response = app
        .client
        .delete(app.url(&format!("/delete-invoice/{}", labour_id)))
        .json(&json!({ "invoice_type": "labour" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let tax: Vec<Value> = app.get("/customers").await.json().await.unwrap();
    let labour: Vec<Value> = app.get("/customers?type=labour").await.json().await.unwrap();
    assert!(tax.is_empty());
    assert!(labour.is_empty());

    assert_eq!(
        app.delete(&format!("/delete-invoice/{}", tax_id))
            .await
            .status()
            .as_u16(),
        404
    );

    app.cleanup().await;
}

#[tokio::test]
async fn delete_accepts_type_in_query() {
    let app = TestApp::spawn().await;
    let labour_id = save_labour_invoice(&app, "Meera").await;

    let response = app
        .delete(&format!("/delete-invoice/{}?invoice_type=labour", labour_id))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    app.cleanup().await;
}
