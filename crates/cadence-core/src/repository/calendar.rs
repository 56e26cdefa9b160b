use crate::calendar::{build_event, group_by_day, index_notes, CalendarEntry, ScheduleSource};
use crate::error::CoreError;
use crate::models::{
    Action, ActionStatus, Category, DayGroup, DurationUnit, EventLookup, NewCalendarEventData, Note,
    Occurrence,
};
use crate::recurrence::RecurrencePattern;
use crate::repository::{
    ActionRepository, CategoryRepository, NoteRepository, OccurrenceRepository, SqliteRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An occurrence LEFT JOINed with its action and the action's category.
/// Every joined column is nullable so orphaned rows still load.
#[derive(Debug, FromRow)]
struct CalendarRow {
    #[sqlx(flatten)]
    occurrence: Occurrence,
    a_id: Option<Uuid>,
    a_text: Option<String>,
    a_color: Option<String>,
    a_text_color: Option<String>,
    a_status: Option<ActionStatus>,
    a_start_date: Option<NaiveDate>,
    a_end_date: Option<NaiveDate>,
    a_is_date_range: Option<bool>,
    a_hour: Option<f64>,
    a_leverage: Option<String>,
    a_location: Option<String>,
    a_duration_amount: Option<f64>,
    a_duration_unit: Option<DurationUnit>,
    a_recurrence_pattern: Option<RecurrencePattern>,
    a_recurrence_end_date: Option<NaiveDate>,
    a_category_id: Option<Uuid>,
    a_created_at: Option<DateTime<Utc>>,
    a_updated_at: Option<DateTime<Utc>>,
    c_id: Option<Uuid>,
    c_name: Option<String>,
    c_color: Option<String>,
    c_created_at: Option<DateTime<Utc>>,
}

impl From<CalendarRow> for CalendarEntry {
    fn from(row: CalendarRow) -> Self {
        let action = row.a_id.map(|id| Action {
            id,
            text: row.a_text.unwrap_or_default(),
            color: row.a_color,
            text_color: row.a_text_color,
            status: row.a_status.unwrap_or_default(),
            start_date: row.a_start_date,
            end_date: row.a_end_date,
            is_date_range: row.a_is_date_range.unwrap_or(false),
            hour: row.a_hour,
            leverage: row.a_leverage,
            location: row.a_location,
            duration_amount: row.a_duration_amount,
            duration_unit: row.a_duration_unit,
            recurrence_pattern: row.a_recurrence_pattern,
            recurrence_end_date: row.a_recurrence_end_date,
            category_id: row.a_category_id,
            created_at: row.a_created_at.unwrap_or(row.occurrence.created_at),
            updated_at: row.a_updated_at.unwrap_or(row.occurrence.updated_at),
        });

        let category = match (row.c_id, row.c_name, row.c_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Category {
                id,
                name,
                color: row.c_color,
                created_at,
            }),
            _ => None,
        };

        CalendarEntry {
            occurrence: row.occurrence,
            action,
            category,
        }
    }
}

const RANGE_QUERY: &str = r#"
    SELECT
        o.id, o.action_id, o.date, o.hour, o.location, o.duration_amount, o.duration_unit,
        o.created_at, o.updated_at,
        a.id AS a_id, a.text AS a_text, a.color AS a_color, a.text_color AS a_text_color,
        a.status AS a_status, a.start_date AS a_start_date, a.end_date AS a_end_date,
        a.is_date_range AS a_is_date_range, a.hour AS a_hour, a.leverage AS a_leverage,
        a.location AS a_location, a.duration_amount AS a_duration_amount,
        a.duration_unit AS a_duration_unit, a.recurrence_pattern AS a_recurrence_pattern,
        a.recurrence_end_date AS a_recurrence_end_date, a.category_id AS a_category_id,
        a.created_at AS a_created_at, a.updated_at AS a_updated_at,
        c.id AS c_id, c.name AS c_name, c.color AS c_color, c.created_at AS c_created_at
    FROM occurrences o
    LEFT JOIN actions a ON o.action_id = a.id
    LEFT JOIN categories c ON a.category_id = c.id
    WHERE o.date >= $1 AND o.date <= $2
    ORDER BY o.date, o.created_at, o.id
"#;

#[async_trait]
impl super::CalendarRepository for SqliteRepository {
    async fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayGroup>, CoreError> {
        if start > end {
            return Err(CoreError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let rows: Vec<CalendarRow> = sqlx::query_as(RANGE_QUERY)
            .bind(start)
            .bind(end)
            .fetch_all(self.pool())
            .await?;

        let notes: Vec<Note> = sqlx::query_as(
            r#"SELECT n.id, n.occurrence_id, n.text, n.note_type, n.created_at
            FROM notes n
            JOIN occurrences o ON n.occurrence_id = o.id
            WHERE o.date >= $1 AND o.date <= $2
            ORDER BY n.created_at, n.id"#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        let entries = rows.into_iter().map(CalendarEntry::from).collect();
        Ok(group_by_day(entries, index_notes(notes)))
    }

    async fn find_event(&self, id: Uuid) -> Result<EventLookup, CoreError> {
        if let Some(action) = self.find_action_by_id(id).await? {
            return Ok(EventLookup::Action(action));
        }

        let Some(occurrence) = self.find_occurrence_by_id(id).await? else {
            return Ok(EventLookup::NotFound);
        };

        match self.find_action_by_id(occurrence.action_id).await? {
            Some(action) => Ok(EventLookup::Occurrence { occurrence, action }),
            None => {
                tracing::warn!(
                    occurrence_id = %occurrence.id,
                    action_id = %occurrence.action_id,
                    "occurrence references a missing action"
                );
                Ok(EventLookup::NotFound)
            }
        }
    }

    async fn resolve_event(&self, id: Uuid) -> Result<Option<DayGroup>, CoreError> {
        let event = match self.find_event(id).await? {
            EventLookup::NotFound => return Ok(None),
            EventLookup::Action(action) => {
                let occurrences = self.find_occurrences_for_action(action.id).await?;
                let date = action
                    .start_date
                    .or_else(|| occurrences.first().map(|o| o.date))
                    .unwrap_or_else(|| action.created_at.date_naive());

                let on_date = occurrences.iter().find(|o| o.date == date);
                let notes = match on_date {
                    Some(occurrence) => self.find_notes_for_occurrence(occurrence.id).await?,
                    None => Vec::new(),
                };
                let category = self.category_for(&action).await?;

                let mut event = build_event(
                    &action,
                    date,
                    on_date.map(|o| o.id),
                    ScheduleSource::Action,
                    category,
                    notes,
                );
                // Echo the id the caller asked for
                event.id = action.id;
                event
            }
            EventLookup::Occurrence { occurrence, action } => {
                let notes = self.find_notes_for_occurrence(occurrence.id).await?;
                let category = self.category_for(&action).await?;
                build_event(
                    &action,
                    occurrence.date,
                    Some(occurrence.id),
                    ScheduleSource::Occurrence(&occurrence),
                    category,
                    notes,
                )
            }
        };

        Ok(Some(DayGroup {
            date: event.date,
            events: vec![event],
        }))
    }

    /// Seeds occurrences for an existing action: the given date, then, for a
    /// recurring event, every later pattern date. The action is not modified.
    async fn create_calendar_event(&self, data: NewCalendarEventData) -> Result<Vec<Occurrence>, CoreError> {
        data.schedule.validate()?;

        let mut dates = vec![data.date];
        if data.is_recurring {
            let pattern = data.recurrence_pattern.ok_or_else(|| {
                CoreError::InvalidInput("a recurring event requires a recurrence pattern".to_string())
            })?;
            if let Some(until) = data.recurrence_end_date {
                if until < data.date {
                    return Err(CoreError::InvalidInput(format!(
                        "recurrence end date {} is before {}",
                        until, data.date
                    )));
                }
            }
            dates.extend(
                self.materialization_manager()
                    .plan_follow_ups(data.date, data.recurrence_end_date, &pattern)?,
            );
        }

        let mut tx = self.pool().begin().await?;
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM actions WHERE id = $1")
            .bind(data.action_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(CoreError::ActionNotFound(data.action_id));
        }

        let created = Self::insert_occurrences_in_transaction(&mut tx, data.action_id, &dates, &data.schedule).await?;
        tx.commit().await?;

        tracing::info!(action_id = %data.action_id, occurrences = created.len(), "calendar event created");
        Ok(created)
    }
}

impl SqliteRepository {
    async fn category_for(&self, action: &Action) -> Result<Option<Category>, CoreError> {
        match action.category_id {
            Some(id) => self.find_category_by_id(id).await,
            None => Ok(None),
        }
    }
}
