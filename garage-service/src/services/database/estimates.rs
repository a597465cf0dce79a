use service_core::error::AppError;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use super::{escape_like, Database};
use crate::models::{
    CreateEstimate, DocumentType, Estimate, EstimatePart, EstimateWithParts, InvoiceLine, LineAmounts,
};
use crate::services::metrics::{DB_QUERY_DURATION, DOCUMENTS_TOTAL};

const ESTIMATE_COLUMNS: &str = "estimate_id, document_type, customer_name, address, contact, email, \
                                model, reg_no, estimate_date, total_amount, status, created_utc";
const ESTIMATE_PART_COLUMNS: &str =
    "id, estimate_id, part_no, part_description, hsn_sac, quantity, rate, cgst, sgst, amount";

impl Database {
    /// Save an estimate with its lines. Stock is untouched.
    #[instrument(skip(self, input), fields(customer = %input.customer.name, document_type = input.document_type.as_str()))]
    pub async fn save_estimate(&self, input: &CreateEstimate) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_estimate"])
            .start_timer();

        let total_amount = input.resolved_total();
        let amounts: Vec<LineAmounts> = input.lines.iter().map(InvoiceLine::amounts).collect();
        let customer = &input.customer;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let estimate_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO estimates (document_type, customer_name, address, contact, email, model, reg_no, estimate_date, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING estimate_id
            "#,
        )
        .bind(input.document_type.as_str())
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.contact)
        .bind(&customer.email)
        .bind(&customer.model)
        .bind(&customer.reg_no)
        .bind(customer.date)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert estimate: {}", e)))?;

        for (line, line_amounts) in input.lines.iter().zip(&amounts) {
            sqlx::query(
                r#"
                INSERT INTO estimate_parts (estimate_id, part_no, part_description, hsn_sac, quantity, rate, cgst, sgst, amount)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(estimate_id)
            .bind(&line.part_no)
            .bind(&line.part_description)
            .bind(&line.hsn_sac)
            .bind(line.quantity)
            .bind(line.rate)
            .bind(line.cgst)
            .bind(line.sgst)
            .bind(line_amounts.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert estimate line: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        DOCUMENTS_TOTAL.with_label_values(&["estimate"]).inc();
        info!(estimate_id, total_amount = %total_amount, "Estimate saved");

        Ok(estimate_id)
    }

    #[instrument(skip(self))]
    pub async fn get_estimate(&self, estimate_id: i64) -> Result<Option<EstimateWithParts>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_estimate"])
            .start_timer();

        let estimate = sqlx::query_as::<_, Estimate>(&format!(
            "SELECT {ESTIMATE_COLUMNS} FROM estimates WHERE estimate_id = $1"
        ))
        .bind(estimate_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get estimate: {}", e)))?;

        let Some(estimate) = estimate else {
            timer.observe_duration();
            return Ok(None);
        };

        let mut found = self.attach_estimate_parts(vec![estimate]).await?;
        timer.observe_duration();

        Ok(found.pop())
    }

    /// Estimates by customer-name substring, optionally narrowed to one type.
    #[instrument(skip(self))]
    pub async fn search_estimates(
        &self,
        name: &str,
        document_type: Option<DocumentType>,
    ) -> Result<Vec<EstimateWithParts>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["search_estimates"])
            .start_timer();

        let estimates = sqlx::query_as::<_, Estimate>(&format!(
            r#"
            SELECT {ESTIMATE_COLUMNS}
            FROM estimates
            WHERE customer_name ILIKE '%' || $1 || '%'
              AND ($2::TEXT IS NULL OR document_type = $2)
            ORDER BY estimate_date DESC, estimate_id DESC
            "#
        ))
        .bind(escape_like(name))
        .bind(document_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to search estimates: {}", e)))?;

        let result = self.attach_estimate_parts(estimates).await?;
        timer.observe_duration();

        Ok(result)
    }

    async fn attach_estimate_parts(
        &self,
        estimates: Vec<Estimate>,
    ) -> Result<Vec<EstimateWithParts>, AppError> {
        if estimates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = estimates.iter().map(|e| e.estimate_id).collect();
        let parts = sqlx::query_as::<_, EstimatePart>(&format!(
            "SELECT {ESTIMATE_PART_COLUMNS} FROM estimate_parts WHERE estimate_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to fetch estimate lines: {}", e))
        })?;

        let mut by_estimate: HashMap<i64, Vec<EstimatePart>> = HashMap::new();
        for part in parts {
            by_estimate.entry(part.estimate_id).or_default().push(part);
        }

        Ok(estimates
            .into_iter()
            .map(|estimate| EstimateWithParts {
                parts: by_estimate.remove(&estimate.estimate_id).unwrap_or_default(),
                estimate,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn latest_estimate_id(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(estimate_id), 0) FROM estimates")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get latest estimate id: {}", e))
            })
    }

    /// Turn an estimate into an issued invoice.
    #[instrument(skip(self))]
    pub async fn convert_estimate(&self, estimate_id: i64) -> Result<Estimate, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["convert_estimate"])
            .start_timer();

        let converted = sqlx::query_as::<_, Estimate>(&format!(
            r#"
            UPDATE estimates SET document_type = 'invoice'
            WHERE estimate_id = $1 AND document_type = 'estimate'
            RETURNING {ESTIMATE_COLUMNS}
            "#
        ))
        .bind(estimate_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to convert estimate: {}", e)))?;

        timer.observe_duration();

        if let Some(estimate) = converted {
            info!(estimate_id, "Estimate converted to invoice");
            return Ok(estimate);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM estimates WHERE estimate_id = $1)",
        )
        .bind(estimate_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get estimate: {}", e)))?;

        if exists {
            warn!(estimate_id, "Estimate already converted");
            Err(AppError::BadRequest(anyhow::anyhow!(
                "Estimate {} is already an invoice",
                estimate_id
            )))
        } else {
            Err(AppError::NotFound(anyhow::anyhow!("Estimate not found")))
        }
    }
}
