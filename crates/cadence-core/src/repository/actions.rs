use crate::error::CoreError;
use crate::models::{Action, NewActionData, UpdateActionData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::ActionRepository for SqliteRepository {
    async fn add_action(&self, data: NewActionData) -> Result<Action, CoreError> {
        let action = data.into_action();
        validate_text(&action.text)?;
        action.schedule().validate()?;

        // Plan before touching the store so a bad schedule writes nothing
        let planned = self.materialization_manager().plan(&action)?;

        let mut tx = self.pool().begin().await?;
        Self::ensure_category_in_transaction(&mut tx, action.category_id).await?;
        Self::insert_action_in_transaction(&mut tx, &action).await?;

        let preserve_notes = self.materialization_manager().config().preserve_notes;
        let summary = Self::materialize_in_transaction(&mut tx, &action, planned, preserve_notes).await?;
        tx.commit().await?;

        tracing::info!(action_id = %action.id, occurrences = summary.created, "action created");
        Ok(action)
    }

    async fn find_action_by_id(&self, id: Uuid) -> Result<Option<Action>, CoreError> {
        let action = sqlx::query_as("SELECT * FROM actions WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(action)
    }

    async fn find_actions(&self) -> Result<Vec<Action>, CoreError> {
        let actions = sqlx::query_as("SELECT * FROM actions ORDER BY created_at, id")
            .fetch_all(self.pool())
            .await?;
        Ok(actions)
    }

    async fn update_action(&self, id: Uuid, data: UpdateActionData) -> Result<Action, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut action: Action = sqlx::query_as("SELECT * FROM actions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ActionNotFound(id))?;

        data.apply_to(&mut action);
        validate_text(&action.text)?;
        action.schedule().validate()?;
        let planned = self.materialization_manager().plan(&action)?;

        Self::ensure_category_in_transaction(&mut tx, action.category_id).await?;
        sqlx::query(
            r#"UPDATE actions SET
                text = $1, color = $2, text_color = $3, status = $4, start_date = $5, end_date = $6,
                is_date_range = $7, hour = $8, leverage = $9, location = $10, duration_amount = $11,
                duration_unit = $12, recurrence_pattern = $13, recurrence_end_date = $14,
                category_id = $15, updated_at = $16
            WHERE id = $17"#,
        )
        .bind(&action.text)
        .bind(&action.color)
        .bind(&action.text_color)
        .bind(action.status)
        .bind(action.start_date)
        .bind(action.end_date)
        .bind(action.is_date_range)
        .bind(action.hour)
        .bind(&action.leverage)
        .bind(&action.location)
        .bind(action.duration_amount)
        .bind(action.duration_unit)
        .bind(action.recurrence_pattern)
        .bind(action.recurrence_end_date)
        .bind(action.category_id)
        .bind(action.updated_at)
        .bind(action.id)
        .execute(&mut *tx)
        .await?;

        let preserve_notes = self.materialization_manager().config().preserve_notes;
        let summary = Self::materialize_in_transaction(&mut tx, &action, planned, preserve_notes).await?;
        tx.commit().await?;

        tracing::info!(
            action_id = %action.id,
            deleted = summary.deleted,
            created = summary.created,
            "action updated"
        );
        Ok(action)
    }

    /// Deletes an action together with its occurrences, their notes and its
    /// exceptions.
    async fn delete_action(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM actions WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ActionNotFound(id));
        }

        tracing::info!(action_id = %id, "action deleted");
        Ok(())
    }
}

impl SqliteRepository {
    async fn insert_action_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        action: &Action,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO actions (
                id, text, color, text_color, status, start_date, end_date, is_date_range, hour,
                leverage, location, duration_amount, duration_unit, recurrence_pattern,
                recurrence_end_date, category_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)"#,
        )
        .bind(action.id)
        .bind(&action.text)
        .bind(&action.color)
        .bind(&action.text_color)
        .bind(action.status)
        .bind(action.start_date)
        .bind(action.end_date)
        .bind(action.is_date_range)
        .bind(action.hour)
        .bind(&action.leverage)
        .bind(&action.location)
        .bind(action.duration_amount)
        .bind(action.duration_unit)
        .bind(action.recurrence_pattern)
        .bind(action.recurrence_end_date)
        .bind(action.category_id)
        .bind(action.created_at)
        .bind(action.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn ensure_category_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        category_id: Option<Uuid>,
    ) -> Result<(), CoreError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&mut **tx)
            .await?;

        match exists {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound(format!("Category not found: {}", category_id))),
        }
    }
}

fn validate_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::InvalidInput("action text must not be empty".to_string()));
    }
    Ok(())
}
