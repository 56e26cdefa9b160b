use crate::error::CoreError;
use crate::models::{Action, MaterializationSummary, Occurrence, RepairSummary, Schedule};
use crate::repository::{ActionRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use uuid::Uuid;

const DELETE_BATCH_SIZE: usize = 500;

#[async_trait]
impl super::MaterializationRepository for SqliteRepository {
    async fn materialize_action(&self, action_id: Uuid) -> Result<MaterializationSummary, CoreError> {
        let mut tx = self.pool().begin().await?;

        let action: Action = sqlx::query_as("SELECT * FROM actions WHERE id = $1")
            .bind(action_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ActionNotFound(action_id))?;

        let planned = self.materialization_manager().plan(&action)?;
        let preserve_notes = self.materialization_manager().config().preserve_notes;
        let summary = Self::materialize_in_transaction(&mut tx, &action, planned, preserve_notes).await?;

        tx.commit().await?;
        Ok(summary)
    }

    async fn materialize_all(&self) -> Result<RepairSummary, CoreError> {
        let started = Instant::now();
        let actions = self.find_actions().await?;
        let mut summary = RepairSummary::default();

        for action in actions {
            summary.actions_processed += 1;
            match self.materialize_action(action.id).await {
                Ok(result) => summary.occurrences_created += result.created,
                Err(e) => {
                    tracing::warn!(action_id = %action.id, error = %e, "repair failed for action");
                    summary.actions_with_errors += 1;
                    summary.errors.push(format!("{}: {}", action.id, e));
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        Ok(summary)
    }
}

impl SqliteRepository {
    /// Replaces every occurrence of `action` with one per `planned` date.
    ///
    /// Runs inside the caller's transaction, so a failure anywhere leaves the
    /// previous occurrence set untouched once the transaction is dropped.
    /// Dates carrying an exception are left out. With `preserve_notes`, notes
    /// of a replaced occurrence move to the new occurrence on the same date;
    /// notes on dates that no longer exist are deleted with their occurrence.
    pub(crate) async fn materialize_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        action: &Action,
        planned: Vec<NaiveDate>,
        preserve_notes: bool,
    ) -> Result<MaterializationSummary, CoreError> {
        let excluded: HashSet<NaiveDate> =
            sqlx::query_scalar("SELECT date FROM occurrence_exceptions WHERE action_id = $1")
                .bind(action.id)
                .fetch_all(&mut **tx)
                .await?
                .into_iter()
                .collect();

        let (dates, skipped): (Vec<NaiveDate>, Vec<NaiveDate>) =
            planned.into_iter().partition(|date| !excluded.contains(date));

        let previous: Vec<Occurrence> =
            sqlx::query_as("SELECT * FROM occurrences WHERE action_id = $1 ORDER BY date, created_at")
                .bind(action.id)
                .fetch_all(&mut **tx)
                .await?;

        let created = Self::insert_occurrences_in_transaction(tx, action.id, &dates, &action.schedule()).await?;

        let mut notes_reattached = 0;
        if preserve_notes && !previous.is_empty() {
            // Only the replaced rows can carry notes at this point
            let annotated: Vec<(Uuid, NaiveDate)> = sqlx::query_as(
                r#"SELECT DISTINCT o.id, o.date FROM occurrences o
                JOIN notes n ON n.occurrence_id = o.id
                WHERE o.action_id = $1"#,
            )
            .bind(action.id)
            .fetch_all(&mut **tx)
            .await?;

            let replacement: HashMap<NaiveDate, Uuid> = created.iter().map(|o| (o.date, o.id)).collect();
            for (old_id, old_date) in annotated {
                if let Some(new_id) = replacement.get(&old_date) {
                    let result = sqlx::query("UPDATE notes SET occurrence_id = $1 WHERE occurrence_id = $2")
                        .bind(new_id)
                        .bind(old_id)
                        .execute(&mut **tx)
                        .await?;
                    notes_reattached += result.rows_affected() as usize;
                }
            }
        }

        // SQLite caps bound parameters per statement
        for chunk in previous.chunks(DELETE_BATCH_SIZE) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM occurrences WHERE id IN (");
            let mut separated = qb.separated(", ");
            for old in chunk {
                separated.push_bind(old.id);
            }
            separated.push_unseparated(")");
            qb.build().execute(&mut **tx).await?;
        }

        let summary = MaterializationSummary {
            action_id: action.id,
            deleted: previous.len(),
            created: created.len(),
            notes_reattached,
            skipped_by_exception: skipped.len(),
        };

        tracing::debug!(
            action_id = %action.id,
            deleted = summary.deleted,
            created = summary.created,
            notes_reattached = summary.notes_reattached,
            skipped = summary.skipped_by_exception,
            "materialized action"
        );

        Ok(summary)
    }

    /// Inserts one occurrence per date, each seeded with the same schedule.
    ///
    /// A failed insert is reported as `PartialMaterialization` carrying how
    /// far the loop got; the caller's transaction must then be dropped.
    pub(crate) async fn insert_occurrences_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        action_id: Uuid,
        dates: &[NaiveDate],
        schedule: &Schedule,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let mut created = Vec::with_capacity(dates.len());

        for date in dates {
            let occurrence = Occurrence::new(action_id, *date, schedule.clone());
            if let Err(e) = Self::insert_occurrence(tx, &occurrence).await {
                tracing::error!(
                    action_id = %action_id,
                    created = created.len(),
                    expected = dates.len(),
                    error = %e,
                    "occurrence insert failed, rolling back"
                );
                return Err(CoreError::PartialMaterialization {
                    created: created.len(),
                    expected: dates.len(),
                    source: e,
                });
            }
            created.push(occurrence);
        }

        Ok(created)
    }

    pub(crate) async fn insert_occurrence(
        tx: &mut Transaction<'_, Sqlite>,
        occurrence: &Occurrence,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO occurrences (id, action_id, date, hour, location, duration_amount, duration_unit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(occurrence.id)
        .bind(occurrence.action_id)
        .bind(occurrence.date)
        .bind(occurrence.hour)
        .bind(&occurrence.location)
        .bind(occurrence.duration_amount)
        .bind(occurrence.duration_unit)
        .bind(occurrence.created_at)
        .bind(occurrence.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
