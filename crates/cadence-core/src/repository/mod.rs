use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    Action, Category, DayGroup, EventLookup, MaterializationSummary, NewActionData,
    NewCalendarEventData, NewCategoryData, NewExceptionData, NewNoteData, NewOccurrenceData,
    Note, Occurrence, OccurrenceException, RepairSummary, UpdateActionData, UpdateOccurrenceData,
};
use crate::recurrence::MaterializationManager;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

// Re-export domain modules
pub mod actions;
pub mod calendar;
pub mod categories;
pub mod exceptions;
pub mod materialization;
pub mod notes;
pub mod occurrences;

// Traits are defined in this module and implemented in respective domain modules

/// Domain-specific trait for action operations.
///
/// Every write re-materializes the action's occurrences in the same
/// transaction.
#[async_trait]
pub trait ActionRepository {
    async fn add_action(&self, data: NewActionData) -> Result<Action, CoreError>;
    async fn find_action_by_id(&self, id: Uuid) -> Result<Option<Action>, CoreError>;
    async fn find_actions(&self) -> Result<Vec<Action>, CoreError>;
    async fn update_action(&self, id: Uuid, data: UpdateActionData) -> Result<Action, CoreError>;
    async fn delete_action(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for occurrence rows
#[async_trait]
pub trait OccurrenceRepository {
    async fn create_occurrence(&self, data: NewOccurrenceData) -> Result<Occurrence, CoreError>;
    async fn bulk_create_occurrences(&self, data: Vec<NewOccurrenceData>) -> Result<Vec<Occurrence>, CoreError>;
    async fn find_occurrence_by_id(&self, id: Uuid) -> Result<Option<Occurrence>, CoreError>;
    async fn find_occurrences_for_action(&self, action_id: Uuid) -> Result<Vec<Occurrence>, CoreError>;
    async fn find_occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Occurrence>, CoreError>;
    async fn update_occurrence(&self, id: Uuid, data: UpdateOccurrenceData) -> Result<Occurrence, CoreError>;
    async fn delete_occurrences_for_action(&self, action_id: Uuid) -> Result<u64, CoreError>;
}

/// Domain-specific trait for notes, scoped to one occurrence
#[async_trait]
pub trait NoteRepository {
    async fn add_note(&self, occurrence_id: Uuid, data: NewNoteData) -> Result<Note, CoreError>;
    async fn find_notes_for_occurrence(&self, occurrence_id: Uuid) -> Result<Vec<Note>, CoreError>;
    async fn delete_note(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for category operations
#[async_trait]
pub trait CategoryRepository {
    async fn add_category(&self, data: NewCategoryData) -> Result<Category, CoreError>;
    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>, CoreError>;
    async fn find_categories(&self) -> Result<Vec<Category>, CoreError>;
    async fn delete_category(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for reason-tagged date exceptions
#[async_trait]
pub trait ExceptionRepository {
    async fn add_exception(&self, action_id: Uuid, data: NewExceptionData) -> Result<OccurrenceException, CoreError>;
    async fn find_exceptions(&self, action_id: Uuid) -> Result<Vec<OccurrenceException>, CoreError>;
    async fn remove_exception(&self, action_id: Uuid, date: NaiveDate) -> Result<(), CoreError>;
}

/// Domain-specific trait for materialization operations
#[async_trait]
pub trait MaterializationRepository {
    async fn materialize_action(&self, action_id: Uuid) -> Result<MaterializationSummary, CoreError>;
    async fn materialize_all(&self) -> Result<RepairSummary, CoreError>;
}

/// Domain-specific trait for calendar reads and event seeding
#[async_trait]
pub trait CalendarRepository {
    async fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayGroup>, CoreError>;
    async fn find_event(&self, id: Uuid) -> Result<EventLookup, CoreError>;
    async fn resolve_event(&self, id: Uuid) -> Result<Option<DayGroup>, CoreError>;
    async fn create_calendar_event(&self, data: NewCalendarEventData) -> Result<Vec<Occurrence>, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    ActionRepository +
    OccurrenceRepository +
    NoteRepository +
    CategoryRepository +
    ExceptionRepository +
    MaterializationRepository +
    CalendarRepository
{
    // This trait automatically composes all domain-specific repositories
    // Individual domain operations are defined in their respective traits
}

/// SQLite implementation of the repository pattern
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
    materialization_manager: MaterializationManager,
}

impl SqliteRepository {
    pub fn new(pool: DbPool, materialization_manager: MaterializationManager) -> Self {
        Self { pool, materialization_manager }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Get a reference to the materialization manager for internal use
    pub(crate) fn materialization_manager(&self) -> &MaterializationManager {
        &self.materialization_manager
    }
}

impl Repository for SqliteRepository {}
