use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::FromRow;
use tracing::{info, instrument, warn};

use super::Database;
use crate::models::{
    CustomerRow, DashboardStats, DocumentKind, DocumentStat, DocumentStatus, InvoiceStats,
};
use crate::services::metrics::DB_QUERY_DURATION;

#[derive(FromRow)]
struct InvoiceStatsRow {
    tax_count: i64,
    tax_revenue: Decimal,
    estimate_count: i64,
    estimate_revenue: Decimal,
    labour_count: i64,
    labour_revenue: Decimal,
}

impl Database {
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["dashboard_stats"])
            .start_timer();

        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM invoices) AS total_invoices,
                (SELECT COUNT(*) FROM parts) AS total_parts,
                (SELECT COUNT(*) FROM invoices WHERE status = 'Pending') AS pending_orders,
                (SELECT COALESCE(SUM(total_due), 0) FROM invoice_summary) AS total_revenue
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load dashboard stats: {}", e))
        })?;

        timer.observe_duration();

        Ok(stats)
    }

    /// Count and revenue per document family.
    #[instrument(skip(self))]
    pub async fn invoice_stats(&self) -> Result<InvoiceStats, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["invoice_stats"])
            .start_timer();

        let row = sqlx::query_as::<_, InvoiceStatsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM invoices) AS tax_count,
                (SELECT COALESCE(SUM(total_due), 0) FROM invoice_summary) AS tax_revenue,
                (SELECT COUNT(*) FROM estimates) AS estimate_count,
                (SELECT COALESCE(SUM(total_amount), 0) FROM estimates) AS estimate_revenue,
                (SELECT COUNT(*) FROM labour_invoices) AS labour_count,
                (SELECT COALESCE(SUM(grand_total), 0) FROM labour_invoices) AS labour_revenue
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load invoice stats: {}", e))
        })?;

        timer.observe_duration();

        Ok(InvoiceStats {
            tax_invoices: DocumentStat {
                count: row.tax_count,
                revenue: row.tax_revenue,
            },
            estimate_invoices: DocumentStat {
                count: row.estimate_count,
                revenue: row.estimate_revenue,
            },
            labour_invoices: DocumentStat {
                count: row.labour_count,
                revenue: row.labour_revenue,
            },
        })
    }

    /// One row per invoice header of the given family, newest first.
    #[instrument(skip(self), fields(kind = kind.as_str()))]
    pub async fn list_customers(&self, kind: DocumentKind) -> Result<Vec<CustomerRow>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_customers"])
            .start_timer();

        let sql = match kind {
            DocumentKind::Tax => {
                r#"
                SELECT i.invoice_id AS id, 'tax' AS invoice_type, i.name AS customer_name,
                       i.address, i.contact, i.email, i.model, i.reg_no, i.invoice_date, i.status,
                       COALESCE(s.total_due, 0) AS total_due
                FROM invoices i
                LEFT JOIN invoice_summary s ON s.invoice_id = i.invoice_id
                ORDER BY i.invoice_date DESC, i.invoice_id DESC
                "#
            }
            DocumentKind::Labour => {
                r#"
                SELECT id, 'labour' AS invoice_type, customer_name,
                       address, contact, email, model, reg_no, invoice_date, status,
                       grand_total AS total_due
                FROM labour_invoices
                ORDER BY invoice_date DESC, id DESC
                "#
            }
            DocumentKind::Estimate => {
                r#"
                SELECT estimate_id AS id, 'estimate' AS invoice_type, customer_name,
                       address, contact, email, model, reg_no, estimate_date AS invoice_date, status,
                       total_amount AS total_due
                FROM estimates
                ORDER BY estimate_date DESC, estimate_id DESC
                "#
            }
        };

        let rows = sqlx::query_as::<_, CustomerRow>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list customers: {}", e))
            })?;

        timer.observe_duration();

        Ok(rows)
    }

    /// Returns whether a document was updated.
    #[instrument(skip(self), fields(kind = kind.as_str(), status = status.as_str()))]
    pub async fn update_document_status(
        &self,
        kind: DocumentKind,
        id: i64,
        status: DocumentStatus,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_document_status"])
            .start_timer();

        let (table, key) = kind.header_table();
        let result = sqlx::query(&format!("UPDATE {table} SET status = $1 WHERE {key} = $2"))
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update status: {}", e)))?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            info!(id, "Document status updated");
        } else {
            warn!(id, "Document not found for status update");
        }

        Ok(updated)
    }

    /// Delete a document header; lines and summaries cascade.
    #[instrument(skip(self), fields(kind = kind.as_str()))]
    pub async fn delete_document(&self, kind: DocumentKind, id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_document"])
            .start_timer();

        let (table, key) = kind.header_table();
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE {key} = $1"))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete document: {}", e))
            })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id, "Document deleted");
        } else {
            warn!(id, "Document not found for delete");
        }

        Ok(deleted)
    }
}
