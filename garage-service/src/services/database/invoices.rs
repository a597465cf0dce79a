use chrono::Utc;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use super::{escape_like, is_foreign_key_violation, is_unique_violation, Database};
use crate::models::{
    CreateServiceInvoice, CreateTaxInvoice, Invoice, InvoicePart, InvoiceSummary,
    InvoiceWithParts, SavedTaxInvoice, ServiceInvoice, UpsertInvoiceSummary,
};
use crate::services::metrics::{DB_QUERY_DURATION, DOCUMENTS_TOTAL, STOCK_REJECTIONS_TOTAL};

const INVOICE_COLUMNS: &str =
    "invoice_id, name, address, contact, email, model, reg_no, invoice_date, status, created_utc";
const INVOICE_PART_COLUMNS: &str =
    "id, invoice_id, part_id, part_no, part_description, hsn_sac, qty, rate, cgst, sgst, amount";
const SUMMARY_COLUMNS: &str =
    "id, invoice_id, customer_name, invoice_date, subtotal, cgst, sgst, total_due";

impl Database {
    /// Save a tax invoice and take its parts out of stock.
    ///
    /// Header, lines, stock decrements and summary commit together. A line
    /// whose part is missing or short of stock rolls the whole invoice back.
    #[instrument(skip(self, input), fields(customer = %input.customer.name, lines = input.lines.len()))]
    pub async fn save_tax_invoice(&self, input: &CreateTaxInvoice) -> Result<SavedTaxInvoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_tax_invoice"])
            .start_timer();

        let totals = input.totals();
        let customer = &input.customer;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO invoices (name, address, contact, email, model, reg_no, invoice_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'Pending')
            RETURNING invoice_id
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.contact)
        .bind(&customer.email)
        .bind(&customer.model)
        .bind(&customer.reg_no)
        .bind(customer.date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert invoice: {}", e)))?;

        for line in &input.lines {
            // Guarded decrement: only succeeds when enough stock remains.
            let decremented = match line.part_id {
                Some(part_id) => {
                    sqlx::query_scalar::<_, i64>(
                        "UPDATE parts SET qty = qty - $1 WHERE id = $2 AND qty >= $1 RETURNING id",
                    )
                    .bind(line.quantity)
                    .bind(part_id)
                    .fetch_optional(&mut *tx)
                    .await
                }
                None => {
                    sqlx::query_scalar::<_, i64>(
                        r#"
                        UPDATE parts SET qty = qty - $1
                        WHERE id = (
                            SELECT id FROM parts
                            WHERE part_no = $2 AND qty >= $1
                            ORDER BY id
                            LIMIT 1
                            FOR UPDATE
                        )
                        AND qty >= $1
                        RETURNING id
                        "#,
                    )
                    .bind(line.quantity)
                    .bind(&line.part_no)
                    .fetch_optional(&mut *tx)
                    .await
                }
            }
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update stock: {}", e)))?;

            let Some(part_id) = decremented else {
                tx.rollback().await.ok();
                STOCK_REJECTIONS_TOTAL.inc();
                warn!(
                    part_no = %line.part_no,
                    quantity = line.quantity,
                    "Insufficient stock, invoice rolled back"
                );
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Insufficient stock or part not found for part {}",
                    line.part_no
                )));
            };

            let amounts = line.amounts();
            sqlx::query(
                r#"
                INSERT INTO invoice_parts (invoice_id, part_id, part_no, part_description, hsn_sac, qty, rate, cgst, sgst, amount)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(invoice_id)
            .bind(part_id)
            .bind(&line.part_no)
            .bind(&line.part_description)
            .bind(&line.hsn_sac)
            .bind(line.quantity)
            .bind(line.rate)
            .bind(line.cgst)
            .bind(line.sgst)
            .bind(amounts.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert invoice line: {}", e))
            })?;
        }

        sqlx::query(
            r#"
            INSERT INTO invoice_summary (invoice_id, customer_name, invoice_date, subtotal, cgst, sgst, total_due)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(invoice_id)
        .bind(&customer.name)
        .bind(customer.date)
        .bind(totals.subtotal)
        .bind(totals.cgst)
        .bind(totals.sgst)
        .bind(totals.total_due)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert invoice summary: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        DOCUMENTS_TOTAL.with_label_values(&["tax"]).inc();
        info!(invoice_id, total_due = %totals.total_due, "Tax invoice saved");

        Ok(SavedTaxInvoice { invoice_id, totals })
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: i64) -> Result<Option<InvoiceWithParts>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = $1"
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        let Some(invoice) = invoice else {
            timer.observe_duration();
            return Ok(None);
        };

        let mut found = self.attach_invoice_details(vec![invoice]).await?;
        timer.observe_duration();

        Ok(found.pop())
    }

    /// Tax invoices whose customer name contains `name`, newest first.
    #[instrument(skip(self))]
    pub async fn search_invoices(&self, name: &str) -> Result<Vec<InvoiceWithParts>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["search_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY invoice_date DESC, invoice_id DESC
            "#
        ))
        .bind(escape_like(name))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to search invoices: {}", e)))?;

        let result = self.attach_invoice_details(invoices).await?;
        timer.observe_duration();

        Ok(result)
    }

    /// Load lines and summaries for a batch of headers in two queries.
    async fn attach_invoice_details(
        &self,
        invoices: Vec<Invoice>,
    ) -> Result<Vec<InvoiceWithParts>, AppError> {
        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = invoices.iter().map(|i| i.invoice_id).collect();

        let parts = sqlx::query_as::<_, InvoicePart>(&format!(
            "SELECT {INVOICE_PART_COLUMNS} FROM invoice_parts WHERE invoice_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to fetch invoice lines: {}", e))
        })?;

        let summaries = sqlx::query_as::<_, InvoiceSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM invoice_summary WHERE invoice_id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to fetch invoice summaries: {}", e))
        })?;

        let mut parts_by_invoice: HashMap<i64, Vec<InvoicePart>> = HashMap::new();
        for part in parts {
            parts_by_invoice.entry(part.invoice_id).or_default().push(part);
        }
        let mut summary_by_invoice: HashMap<i64, InvoiceSummary> =
            summaries.into_iter().map(|s| (s.invoice_id, s)).collect();

        Ok(invoices
            .into_iter()
            .map(|invoice| InvoiceWithParts {
                parts: parts_by_invoice.remove(&invoice.invoice_id).unwrap_or_default(),
                summary: summary_by_invoice.remove(&invoice.invoice_id),
                invoice,
            })
            .collect())
    }

    /// Header rows only, for reporting.
    #[instrument(skip(self))]
    pub async fn list_invoice_headers(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoice_headers"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY invoice_date DESC, invoice_id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Insert or replace the summary of an existing invoice.
    #[instrument(skip(self, input), fields(invoice_id = input.invoice_id))]
    pub async fn upsert_invoice_summary(
        &self,
        input: &UpsertInvoiceSummary,
    ) -> Result<InvoiceSummary, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_invoice_summary"])
            .start_timer();

        let summary = sqlx::query_as::<_, InvoiceSummary>(&format!(
            r#"
            INSERT INTO invoice_summary (invoice_id, customer_name, invoice_date, subtotal, cgst, sgst, total_due)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (invoice_id) DO UPDATE
            SET customer_name = EXCLUDED.customer_name,
                invoice_date = EXCLUDED.invoice_date,
                subtotal = EXCLUDED.subtotal,
                cgst = EXCLUDED.cgst,
                sgst = EXCLUDED.sgst,
                total_due = EXCLUDED.total_due
            RETURNING {SUMMARY_COLUMNS}
            "#
        ))
        .bind(input.invoice_id)
        .bind(&input.customer_name)
        .bind(input.invoice_date)
        .bind(input.subtotal)
        .bind(input.cgst)
        .bind(input.sgst)
        .bind(input.total_due)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                warn!(invoice_id = input.invoice_id, "Summary for unknown invoice");
                AppError::NotFound(anyhow::anyhow!("Invoice {} not found", input.invoice_id))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to save invoice summary: {}", e))
            }
        })?;

        timer.observe_duration();

        info!(invoice_id = summary.invoice_id, total_due = %summary.total_due, "Invoice summary saved");

        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn list_invoice_summaries(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoice_summaries"])
            .start_timer();

        let summaries = sqlx::query_as::<_, InvoiceSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM invoice_summary ORDER BY invoice_date DESC, invoice_id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list invoice summaries: {}", e))
        })?;

        timer.observe_duration();

        Ok(summaries)
    }

    /// Highest tax invoice id, or 0 when none exist.
    #[instrument(skip(self))]
    pub async fn latest_invoice_id(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(invoice_id), 0) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get latest invoice id: {}", e))
            })
    }

    /// Sum of `total_due` over a customer's invoices; `None` when they have none.
    #[instrument(skip(self))]
    pub async fn customer_total(&self, customer_name: &str) -> Result<Option<Decimal>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["customer_total"])
            .start_timer();

        let total = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(s.total_due)
            FROM invoice_summary s
            JOIN invoices i ON i.invoice_id = s.invoice_id
            WHERE i.name = $1
            "#,
        )
        .bind(customer_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to total customer invoices: {}", e))
        })?;

        timer.observe_duration();

        Ok(total)
    }

    /// Store a printable service invoice snapshot. Stock is untouched.
    #[instrument(skip(self, input), fields(customer = %input.customer.name, lines = input.lines.len()))]
    pub async fn save_service_invoice(
        &self,
        input: &CreateServiceInvoice,
    ) -> Result<ServiceInvoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_service_invoice"])
            .start_timer();

        let customer = &input.customer;
        let invoice_number = format!("INV-{}", Utc::now().timestamp_millis());

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice = sqlx::query_as::<_, ServiceInvoice>(
            r#"
            INSERT INTO service_invoices (
                invoice_number, customer_name, customer_address, customer_contact, customer_email,
                vehicle_model, registration_number, invoice_date, subtotal, tax, total_due
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, invoice_number
            "#,
        )
        .bind(&invoice_number)
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.contact)
        .bind(&customer.email)
        .bind(&customer.model)
        .bind(&customer.reg_no)
        .bind(customer.date)
        .bind(input.subtotal)
        .bind(input.tax)
        .bind(input.total_due)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(anyhow::anyhow!(
                    "Invoice number {} already issued, retry",
                    invoice_number
                ))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert service invoice: {}", e))
            }
        })?;

        for line in &input.lines {
            let amounts = line.amounts();
            sqlx::query(
                r#"
                INSERT INTO service_invoice_parts (invoice_id, part_no, hsn_sac, vehicle, part_description, qty, mrp, rate, value, cgst, sgst)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(invoice.id)
            .bind(&line.part_no)
            .bind(&line.hsn_sac)
            .bind(&line.vehicle)
            .bind(&line.part_description)
            .bind(line.quantity)
            .bind(line.mrp)
            .bind(line.rate)
            .bind(amounts.amount)
            .bind(line.cgst)
            .bind(line.sgst)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to insert service invoice line: {}",
                    e
                ))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        DOCUMENTS_TOTAL.with_label_values(&["service"]).inc();
        info!(id = invoice.id, invoice_number = %invoice.invoice_number, "Service invoice saved");

        Ok(invoice)
    }
}
