use service_core::error::AppError;
use tracing::{info, instrument, warn};

use super::{escape_like, Database};
use crate::models::{Part, PartInput};
use crate::services::metrics::DB_QUERY_DURATION;

const PART_COLUMNS: &str = "id, serial_number, part_no, hsn_sac, vehicle, part_description, \
                            qty, mrp, rate, value, cgst, sgst, created_utc";

impl Database {
    /// All parts, or those whose part number contains `part_no` (case-insensitive).
    #[instrument(skip(self))]
    pub async fn list_parts(&self, part_no: Option<&str>) -> Result<Vec<Part>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_parts"])
            .start_timer();

        let parts = match part_no.filter(|p| !p.is_empty()) {
            Some(term) => {
                sqlx::query_as::<_, Part>(&format!(
                    "SELECT {PART_COLUMNS} FROM parts WHERE part_no ILIKE '%' || $1 || '%' ORDER BY id"
                ))
                .bind(escape_like(term))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Part>(&format!("SELECT {PART_COLUMNS} FROM parts ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list parts: {}", e)))?;

        timer.observe_duration();

        Ok(parts)
    }

    #[instrument(skip(self))]
    pub async fn get_part(&self, part_id: i64) -> Result<Option<Part>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_part"])
            .start_timer();

        let part = sqlx::query_as::<_, Part>(&format!("SELECT {PART_COLUMNS} FROM parts WHERE id = $1"))
            .bind(part_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get part: {}", e)))?;

        timer.observe_duration();

        Ok(part)
    }

    #[instrument(skip(self, input), fields(part_no = %input.part_no))]
    pub async fn create_part(&self, input: &PartInput) -> Result<Part, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_part"])
            .start_timer();

        let part = sqlx::query_as::<_, Part>(&format!(
            r#"
            INSERT INTO parts (serial_number, part_no, hsn_sac, vehicle, part_description, qty, mrp, rate, value, cgst, sgst)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(&input.serial_number)
        .bind(&input.part_no)
        .bind(&input.hsn_sac)
        .bind(&input.vehicle)
        .bind(&input.part_description)
        .bind(input.qty)
        .bind(input.mrp)
        .bind(input.rate)
        .bind(input.value)
        .bind(input.cgst)
        .bind(input.sgst)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create part: {}", e)))?;

        timer.observe_duration();

        info!(part_id = part.id, part_no = %part.part_no, qty = part.qty, "Part created");

        Ok(part)
    }

    /// Replace every editable field. `None` when the part does not exist.
    #[instrument(skip(self, input), fields(part_no = %input.part_no))]
    pub async fn update_part(&self, part_id: i64, input: &PartInput) -> Result<Option<Part>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_part"])
            .start_timer();

        let part = sqlx::query_as::<_, Part>(&format!(
            r#"
            UPDATE parts
            SET serial_number = $2, part_no = $3, hsn_sac = $4, vehicle = $5, part_description = $6,
                qty = $7, mrp = $8, rate = $9, value = $10, cgst = $11, sgst = $12
            WHERE id = $1
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(part_id)
        .bind(&input.serial_number)
        .bind(&input.part_no)
        .bind(&input.hsn_sac)
        .bind(&input.vehicle)
        .bind(&input.part_description)
        .bind(input.qty)
        .bind(input.mrp)
        .bind(input.rate)
        .bind(input.value)
        .bind(input.cgst)
        .bind(input.sgst)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update part: {}", e)))?;

        timer.observe_duration();

        match &part {
            Some(p) => info!(part_id = p.id, "Part updated"),
            None => warn!(part_id, "Part not found for update"),
        }

        Ok(part)
    }

    /// Returns whether a row was deleted.
    #[instrument(skip(self))]
    pub async fn delete_part(&self, part_id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_part"])
            .start_timer();

        let result = sqlx::query("DELETE FROM parts WHERE id = $1")
            .bind(part_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete part: {}", e)))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(part_id, "Part deleted");
        }

        Ok(deleted)
    }

    /// Distinct vehicle models that have parts.
    #[instrument(skip(self))]
    pub async fn list_vehicle_models(&self) -> Result<Vec<String>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_vehicle_models"])
            .start_timer();

        let models = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT vehicle
            FROM parts
            WHERE vehicle IS NOT NULL AND vehicle <> ''
            ORDER BY vehicle
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list models: {}", e)))?;

        timer.observe_duration();

        Ok(models)
    }

    #[instrument(skip(self))]
    pub async fn list_parts_by_model(&self, model: &str) -> Result<Vec<Part>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_parts_by_model"])
            .start_timer();

        let parts = sqlx::query_as::<_, Part>(&format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE vehicle = $1 ORDER BY id"
        ))
        .bind(model)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list parts for model: {}", e))
        })?;

        timer.observe_duration();

        Ok(parts)
    }
}
