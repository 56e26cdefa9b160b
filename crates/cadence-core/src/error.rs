use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Invalid recurrence pattern: {0}")]
    InvalidRecurrencePattern(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Action not found: {0}")]
    ActionNotFound(Uuid),

    #[error("Occurrence not found: {0}")]
    OccurrenceNotFound(Uuid),

    #[error("{0}")]
    NotFound(String),

    /// An occurrence insert failed mid-loop. The surrounding transaction is
    /// rolled back, so `created` rows were written but never committed.
    #[error("Materialization failed after creating {created} of {expected} occurrences")]
    PartialMaterialization {
        created: usize,
        expected: usize,
        #[source]
        source: sqlx::Error,
    },
}

impl CoreError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidRecurrencePattern(_) | CoreError::InvalidInput(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ActionNotFound(_) | CoreError::OccurrenceNotFound(_) | CoreError::NotFound(_)
        )
    }
}
