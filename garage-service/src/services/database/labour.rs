use service_core::error::AppError;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use super::{escape_like, is_foreign_key_violation, Database};
use crate::models::{
    CreateLabourInvoice, LabourInvoice, LabourInvoiceItem, LabourInvoiceSummary,
    LabourInvoiceWithItems, SavedLabourInvoice, UpsertLabourSummary,
};
use crate::services::metrics::{DB_QUERY_DURATION, DOCUMENTS_TOTAL};

const LABOUR_COLUMNS: &str = "id, customer_name, address, contact, email, model, reg_no, \
                              invoice_date, subtotal, cgst, sgst, grand_total, status, created_utc";
const ITEM_COLUMNS: &str = "id, labour_invoice_id, sno, description, tinkering, painting, \
                            electrician, mechanical, cgst, sgst, subtotal, total";

impl Database {
    /// Save a labour invoice with its items in one transaction.
    #[instrument(skip(self, input), fields(customer = %input.customer.name, items = input.items.len()))]
    pub async fn save_labour_invoice(
        &self,
        input: &CreateLabourInvoice,
    ) -> Result<SavedLabourInvoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_labour_invoice"])
            .start_timer();

        let totals = input.totals();
        let customer = &input.customer;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO labour_invoices (customer_name, address, contact, email, model, reg_no, invoice_date, subtotal, cgst, sgst, grand_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.contact)
        .bind(&customer.email)
        .bind(&customer.model)
        .bind(&customer.reg_no)
        .bind(customer.date)
        .bind(totals.subtotal)
        .bind(totals.cgst)
        .bind(totals.sgst)
        .bind(totals.total_due)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert labour invoice: {}", e))
        })?;

        for item in &input.items {
            let amounts = item.amounts();
            sqlx::query(
                r#"
                INSERT INTO labour_invoice_items (
                    labour_invoice_id, sno, description, tinkering, painting, electrician, mechanical,
                    cgst, sgst, subtotal, total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(invoice_id)
            .bind(item.sno)
            .bind(&item.description)
            .bind(item.tinkering)
            .bind(item.painting)
            .bind(item.electrician)
            .bind(item.mechanical)
            .bind(item.cgst)
            .bind(item.sgst)
            .bind(amounts.subtotal)
            .bind(amounts.total)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert labour item: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        DOCUMENTS_TOTAL.with_label_values(&["labour"]).inc();
        info!(invoice_id, grand_total = %totals.total_due, "Labour invoice saved");

        Ok(SavedLabourInvoice { invoice_id, totals })
    }

    /// Insert or replace a labour invoice summary. Without an explicit item
    /// snapshot the stored item rows are captured.
    #[instrument(skip(self, input), fields(labour_invoice_id = input.labour_invoice_id))]
    pub async fn upsert_labour_summary(
        &self,
        input: &UpsertLabourSummary,
    ) -> Result<LabourInvoiceSummary, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_labour_summary"])
            .start_timer();

        let summary = sqlx::query_as::<_, LabourInvoiceSummary>(
            r#"
            INSERT INTO labour_invoice_summaries (
                labour_invoice_id, customer_name, invoice_date, subtotal, cgst, sgst, total_due, items
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                COALESCE(
                    $8,
                    (SELECT jsonb_agg(to_jsonb(li) ORDER BY li.sno, li.id)
                     FROM labour_invoice_items li
                     WHERE li.labour_invoice_id = $1),
                    '[]'::jsonb
                )
            )
            ON CONFLICT (labour_invoice_id) DO UPDATE
            SET customer_name = EXCLUDED.customer_name,
                invoice_date = EXCLUDED.invoice_date,
                subtotal = EXCLUDED.subtotal,
                cgst = EXCLUDED.cgst,
                sgst = EXCLUDED.sgst,
                total_due = EXCLUDED.total_due,
                items = EXCLUDED.items
            RETURNING id, labour_invoice_id, customer_name, invoice_date, subtotal, cgst, sgst, total_due, items
            "#,
        )
        .bind(input.labour_invoice_id)
        .bind(&input.customer_name)
        .bind(input.invoice_date)
        .bind(input.subtotal)
        .bind(input.cgst)
        .bind(input.sgst)
        .bind(input.total_due)
        .bind(&input.items)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                warn!(labour_invoice_id = input.labour_invoice_id, "Summary for unknown labour invoice");
                AppError::NotFound(anyhow::anyhow!(
                    "Labour invoice {} not found",
                    input.labour_invoice_id
                ))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to save labour summary: {}", e))
            }
        })?;

        timer.observe_duration();

        info!(labour_invoice_id = summary.labour_invoice_id, "Labour invoice summary saved");

        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn search_labour_invoices(
        &self,
        name: &str,
    ) -> Result<Vec<LabourInvoiceWithItems>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["search_labour_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, LabourInvoice>(&format!(
            r#"
            SELECT {LABOUR_COLUMNS}
            FROM labour_invoices
            WHERE customer_name ILIKE '%' || $1 || '%'
            ORDER BY invoice_date DESC, id DESC
            "#
        ))
        .bind(escape_like(name))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to search labour invoices: {}", e))
        })?;

        if invoices.is_empty() {
            timer.observe_duration();
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = invoices.iter().map(|i| i.id).collect();
        let items = sqlx::query_as::<_, LabourInvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM labour_invoice_items WHERE labour_invoice_id = ANY($1) ORDER BY sno, id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to fetch labour items: {}", e))
        })?;

        timer.observe_duration();

        let mut by_invoice: HashMap<i64, Vec<LabourInvoiceItem>> = HashMap::new();
        for item in items {
            by_invoice.entry(item.labour_invoice_id).or_default().push(item);
        }

        Ok(invoices
            .into_iter()
            .map(|invoice| LabourInvoiceWithItems {
                items: by_invoice.remove(&invoice.id).unwrap_or_default(),
                invoice,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn latest_labour_invoice_id(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(id), 0) FROM labour_invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to get latest labour invoice id: {}",
                    e
                ))
            })
    }
}
