use crate::error::CoreError;
use crate::models::{NewOccurrenceData, Occurrence, UpdateOccurrenceData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn create_occurrence(&self, data: NewOccurrenceData) -> Result<Occurrence, CoreError> {
        let mut created = self.bulk_create_occurrences(vec![data]).await?;
        created
            .pop()
            .ok_or_else(|| CoreError::InvalidInput("no occurrence was created".to_string()))
    }

    /// Inserts every row or none of them.
    async fn bulk_create_occurrences(
        &self,
        data: Vec<NewOccurrenceData>,
    ) -> Result<Vec<Occurrence>, CoreError> {
        for item in &data {
            item.schedule.validate()?;
        }

        let mut tx = self.pool().begin().await?;

        let action_ids: HashSet<Uuid> = data.iter().map(|d| d.action_id).collect();
        for action_id in action_ids {
            let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM actions WHERE id = $1")
                .bind(action_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(CoreError::ActionNotFound(action_id));
            }
        }

        let expected = data.len();
        let mut created = Vec::with_capacity(expected);
        for item in data {
            let occurrence = Occurrence::new(item.action_id, item.date, item.schedule);
            if let Err(e) = Self::insert_occurrence(&mut tx, &occurrence).await {
                tracing::error!(
                    created = created.len(),
                    expected,
                    error = %e,
                    "bulk occurrence insert failed, rolling back"
                );
                return Err(CoreError::PartialMaterialization {
                    created: created.len(),
                    expected,
                    source: e,
                });
            }
            created.push(occurrence);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_occurrence_by_id(&self, id: Uuid) -> Result<Option<Occurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(occurrence)
    }

    async fn find_occurrences_for_action(&self, action_id: Uuid) -> Result<Vec<Occurrence>, CoreError> {
        let occurrences =
            sqlx::query_as("SELECT * FROM occurrences WHERE action_id = $1 ORDER BY date, created_at, id")
                .bind(action_id)
                .fetch_all(self.pool())
                .await?;
        Ok(occurrences)
    }

    async fn find_occurrences_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let occurrences = sqlx::query_as(
            "SELECT * FROM occurrences WHERE date >= $1 AND date <= $2 ORDER BY date, created_at, id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        Ok(occurrences)
    }

    /// Overrides the schedule of one occurrence. The next materialization of
    /// its action replaces the row and the override with it.
    async fn update_occurrence(&self, id: Uuid, data: UpdateOccurrenceData) -> Result<Occurrence, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut occurrence: Occurrence = sqlx::query_as("SELECT * FROM occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::OccurrenceNotFound(id))?;

        data.apply_to(&mut occurrence);
        occurrence.schedule().validate()?;

        sqlx::query(
            r#"UPDATE occurrences SET hour = $1, location = $2, duration_amount = $3,
                duration_unit = $4, updated_at = $5
            WHERE id = $6"#,
        )
        .bind(occurrence.hour)
        .bind(&occurrence.location)
        .bind(occurrence.duration_amount)
        .bind(occurrence.duration_unit)
        .bind(occurrence.updated_at)
        .bind(occurrence.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(occurrence)
    }

    async fn delete_occurrences_for_action(&self, action_id: Uuid) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM occurrences WHERE action_id = $1")
            .bind(action_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
