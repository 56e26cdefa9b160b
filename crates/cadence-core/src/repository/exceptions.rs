use crate::error::CoreError;
use crate::models::{Action, NewExceptionData, OccurrenceException};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::ExceptionRepository for SqliteRepository {
    /// Records an exception and rematerializes the action without that date.
    /// Recording the same date twice replaces the reason and notes.
    async fn add_exception(
        &self,
        action_id: Uuid,
        data: NewExceptionData,
    ) -> Result<OccurrenceException, CoreError> {
        let mut tx = self.pool().begin().await?;
        let action = Self::load_action_in_transaction(&mut tx, action_id).await?;

        // On a repeated date the original created_at survives
        let exception: OccurrenceException = sqlx::query_as(
            r#"INSERT INTO occurrence_exceptions (action_id, date, reason, notes, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (action_id, date) DO UPDATE SET reason = excluded.reason, notes = excluded.notes
            RETURNING *"#,
        )
        .bind(action_id)
        .bind(data.date)
        .bind(data.reason)
        .bind(&data.notes)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        self.rematerialize_in_transaction(&mut tx, &action).await?;
        tx.commit().await?;

        tracing::info!(action_id = %action_id, date = %exception.date, reason = %exception.reason, "exception recorded");
        Ok(exception)
    }

    async fn find_exceptions(&self, action_id: Uuid) -> Result<Vec<OccurrenceException>, CoreError> {
        let exceptions =
            sqlx::query_as("SELECT * FROM occurrence_exceptions WHERE action_id = $1 ORDER BY date")
                .bind(action_id)
                .fetch_all(self.pool())
                .await?;
        Ok(exceptions)
    }

    /// Removes an exception and brings the date back if the schedule still
    /// covers it.
    async fn remove_exception(&self, action_id: Uuid, date: NaiveDate) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;
        let action = Self::load_action_in_transaction(&mut tx, action_id).await?;

        let result = sqlx::query("DELETE FROM occurrence_exceptions WHERE action_id = $1 AND date = $2")
            .bind(action_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "No exception for action {} on {}",
                action_id, date
            )));
        }

        self.rematerialize_in_transaction(&mut tx, &action).await?;
        tx.commit().await?;
        Ok(())
    }
}

impl SqliteRepository {
    async fn load_action_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        action_id: Uuid,
    ) -> Result<Action, CoreError> {
        sqlx::query_as("SELECT * FROM actions WHERE id = $1")
            .bind(action_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::ActionNotFound(action_id))
    }

    async fn rematerialize_in_transaction(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        action: &Action,
    ) -> Result<(), CoreError> {
        let planned = self.materialization_manager().plan(action)?;
        let preserve_notes = self.materialization_manager().config().preserve_notes;
        Self::materialize_in_transaction(tx, action, planned, preserve_notes).await?;
        Ok(())
    }
}
