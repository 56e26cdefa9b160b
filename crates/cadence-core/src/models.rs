use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::recurrence::RecurrencePattern;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    New,
    Planned,
    InProgress,
    Leveraged,
    Completed,
    Cancelled,
    NotNeeded,
    Moved,
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionStatus::New => "new",
            ActionStatus::Planned => "planned",
            ActionStatus::InProgress => "in_progress",
            ActionStatus::Leveraged => "leveraged",
            ActionStatus::Completed => "completed",
            ActionStatus::Cancelled => "cancelled",
            ActionStatus::NotNeeded => "not_needed",
            ActionStatus::Moved => "moved",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid action status: {0}")]
pub struct ParseActionStatusError(String);

impl FromStr for ActionStatus {
    type Err = ParseActionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "new" => Ok(ActionStatus::New),
            "planned" => Ok(ActionStatus::Planned),
            "in_progress" => Ok(ActionStatus::InProgress),
            "leveraged" => Ok(ActionStatus::Leveraged),
            "completed" => Ok(ActionStatus::Completed),
            "cancelled" => Ok(ActionStatus::Cancelled),
            "not_needed" => Ok(ActionStatus::NotNeeded),
            "moved" => Ok(ActionStatus::Moved),
            _ => Err(ParseActionStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid duration unit: {0}")]
pub struct ParseDurationUnitError(String);

impl FromStr for DurationUnit {
    type Err = ParseDurationUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "min" | "minute" | "minutes" => Ok(DurationUnit::Minutes),
            "h" | "hour" | "hours" => Ok(DurationUnit::Hours),
            "d" | "day" | "days" => Ok(DurationUnit::Days),
            "w" | "week" | "weeks" => Ok(DurationUnit::Weeks),
            _ => Err(ParseDurationUnitError(s.to_string())),
        }
    }
}

impl std::fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationUnit::Minutes => write!(f, "minutes"),
            DurationUnit::Hours => write!(f, "hours"),
            DurationUnit::Days => write!(f, "days"),
            DurationUnit::Weeks => write!(f, "weeks"),
        }
    }
}

/// A user-authored "massive action": the schedulable unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: Uuid,
    pub text: String,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub status: ActionStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_date_range: bool,
    /// Decimal hour of day; the fractional part encodes minutes (9.5 = 09:30)
    pub hour: Option<f64>,
    pub leverage: Option<String>,
    pub location: Option<String>,
    pub duration_amount: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Action {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            text: String::new(),
            color: None,
            text_color: None,
            status: ActionStatus::New,
            start_date: None,
            end_date: None,
            is_date_range: false,
            hour: None,
            leverage: None,
            location: None,
            duration_amount: None,
            duration_unit: None,
            recurrence_pattern: None,
            recurrence_end_date: None,
            category_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Action {
    /// The schedule fields every materialized occurrence is seeded with.
    pub fn schedule(&self) -> Schedule {
        Schedule {
            hour: self.hour,
            location: self.location.clone(),
            duration_amount: self.duration_amount,
            duration_unit: self.duration_unit,
        }
    }
}

/// Per-date schedule fields shared by actions and their occurrences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub hour: Option<f64>,
    pub location: Option<String>,
    pub duration_amount: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
}

impl Schedule {
    /// Rejects an hour outside `[0, 24)` and a duration that is not positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(hour) = self.hour {
            if !(0.0..24.0).contains(&hour) {
                return Err(CoreError::InvalidInput(format!(
                    "hour must be between 0 and 24, got {}",
                    hour
                )));
            }
        }
        if let Some(amount) = self.duration_amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(CoreError::InvalidInput(format!(
                    "duration must be positive, got {}",
                    amount
                )));
            }
        }
        Ok(())
    }
}

/// One concrete calendar-date materialization of an action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: Uuid,
    pub action_id: Uuid,
    pub date: NaiveDate,
    pub hour: Option<f64>,
    pub location: Option<String>,
    pub duration_amount: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Occurrence {
    pub fn new(action_id: Uuid, date: NaiveDate, schedule: Schedule) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            action_id,
            date,
            hour: schedule.hour,
            location: schedule.location,
            duration_amount: schedule.duration_amount,
            duration_unit: schedule.duration_unit,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            hour: self.hour,
            location: self.location.clone(),
            duration_amount: self.duration_amount,
            duration_unit: self.duration_unit,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Progress,
    Remark,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid note type: {0}")]
pub struct ParseNoteTypeError(String);

impl FromStr for NoteType {
    type Err = ParseNoteTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "progress" => Ok(NoteType::Progress),
            "remark" => Ok(NoteType::Remark),
            _ => Err(ParseNoteTypeError(s.to_string())),
        }
    }
}

/// Free text attached to one specific occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub occurrence_id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub note_type: Option<NoteType>,
    pub created_at: DateTime<Utc>,
}

/// Why a date was taken out of an action's materialized set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExceptionReason {
    Skipped,
    Moved,
    Cancelled,
}

impl std::fmt::Display for ExceptionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExceptionReason::Skipped => write!(f, "skipped"),
            ExceptionReason::Moved => write!(f, "moved"),
            ExceptionReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid exception reason: {0}")]
pub struct ParseExceptionReasonError(String);

impl FromStr for ExceptionReason {
    type Err = ParseExceptionReasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" | "skipped" => Ok(ExceptionReason::Skipped),
            "move" | "moved" => Ok(ExceptionReason::Moved),
            "cancel" | "cancelled" => Ok(ExceptionReason::Cancelled),
            _ => Err(ParseExceptionReasonError(s.to_string())),
        }
    }
}

/// Suppresses materialization of a single date for one action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceException {
    pub action_id: Uuid,
    pub date: NaiveDate,
    pub reason: ExceptionReason,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Data Transfer Objects
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewActionData {
    pub text: String,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub status: Option<ActionStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_date_range: bool,
    pub hour: Option<f64>,
    pub leverage: Option<String>,
    pub location: Option<String>,
    pub duration_amount: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_end_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

impl NewActionData {
    pub fn into_action(self) -> Action {
        let now = Utc::now();
        Action {
            id: Uuid::now_v7(),
            text: self.text,
            color: self.color,
            text_color: self.text_color,
            status: self.status.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_date_range: self.is_date_range,
            hour: self.hour,
            leverage: self.leverage,
            location: self.location,
            duration_amount: self.duration_amount,
            duration_unit: self.duration_unit,
            recurrence_pattern: self.recurrence_pattern,
            recurrence_end_date: self.recurrence_end_date,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of an action. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateActionData {
    pub text: Option<String>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub color: Option<Option<String>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub text_color: Option<Option<String>>,
    pub status: Option<ActionStatus>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    pub is_date_range: Option<bool>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub hour: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub leverage: Option<Option<String>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub duration_amount: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub duration_unit: Option<Option<DurationUnit>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub recurrence_pattern: Option<Option<RecurrencePattern>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub recurrence_end_date: Option<Option<NaiveDate>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub category_id: Option<Option<Uuid>>,
}

impl UpdateActionData {
    pub fn apply_to(self, action: &mut Action) {
        if let Some(text) = self.text {
            action.text = text;
        }
        if let Some(color) = self.color {
            action.color = color;
        }
        if let Some(text_color) = self.text_color {
            action.text_color = text_color;
        }
        if let Some(status) = self.status {
            action.status = status;
        }
        if let Some(start_date) = self.start_date {
            action.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            action.end_date = end_date;
        }
        if let Some(is_date_range) = self.is_date_range {
            action.is_date_range = is_date_range;
        }
        if let Some(hour) = self.hour {
            action.hour = hour;
        }
        if let Some(leverage) = self.leverage {
            action.leverage = leverage;
        }
        if let Some(location) = self.location {
            action.location = location;
        }
        if let Some(duration_amount) = self.duration_amount {
            action.duration_amount = duration_amount;
        }
        if let Some(duration_unit) = self.duration_unit {
            action.duration_unit = duration_unit;
        }
        if let Some(recurrence_pattern) = self.recurrence_pattern {
            action.recurrence_pattern = recurrence_pattern;
        }
        if let Some(recurrence_end_date) = self.recurrence_end_date {
            action.recurrence_end_date = recurrence_end_date;
        }
        if let Some(category_id) = self.category_id {
            action.category_id = category_id;
        }
        action.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOccurrenceData {
    pub action_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub schedule: Schedule,
}

/// Per-occurrence schedule edit; only these fields may diverge from the action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOccurrenceData {
    #[serde(with = "::serde_with::rust::double_option")]
    pub hour: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub duration_amount: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option")]
    pub duration_unit: Option<Option<DurationUnit>>,
}

impl UpdateOccurrenceData {
    pub fn apply_to(self, occurrence: &mut Occurrence) {
        if let Some(hour) = self.hour {
            occurrence.hour = hour;
        }
        if let Some(location) = self.location {
            occurrence.location = location;
        }
        if let Some(duration_amount) = self.duration_amount {
            occurrence.duration_amount = duration_amount;
        }
        if let Some(duration_unit) = self.duration_unit {
            occurrence.duration_unit = duration_unit;
        }
        occurrence.updated_at = Utc::now();
    }
}

/// Body of `POST /calendar-events`: seeds occurrences for an existing action
/// without touching the action itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendarEventData {
    pub action_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNoteData {
    pub text: String,
    #[serde(default, rename = "type")]
    pub note_type: Option<NoteType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExceptionData {
    pub date: NaiveDate,
    pub reason: ExceptionReason,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryData {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

// ============================================================================
// Calendar read models
// ============================================================================

/// Denormalized event as rendered by a calendar cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Occurrence id when the event is backed by one, otherwise the action id
    pub id: Uuid,
    pub action_id: Uuid,
    pub occurrence_id: Option<Uuid>,
    pub date: NaiveDate,
    pub text: String,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub status: ActionStatus,
    pub hour: Option<f64>,
    pub location: Option<String>,
    pub duration_amount: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
    pub leverage: Option<String>,
    pub is_date_range: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_end_date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub notes: Vec<Note>,
}

/// All events of one calendar date. `date` serializes as `yyyy-MM-dd`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

/// Result of looking up an id that may belong to either an action or an
/// occurrence. Action ids are tried first.
#[derive(Debug, Clone, PartialEq)]
pub enum EventLookup {
    Action(Action),
    Occurrence { occurrence: Occurrence, action: Action },
    NotFound,
}

/// Outcome of one materialization pass over a single action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationSummary {
    pub action_id: Uuid,
    pub deleted: usize,
    pub created: usize,
    pub notes_reattached: usize,
    pub skipped_by_exception: usize,
}

/// Statistics collected during a repair pass over every action.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSummary {
    pub actions_processed: usize,
    pub occurrences_created: usize,
    pub actions_with_errors: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}
