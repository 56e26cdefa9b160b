use crate::error::CoreError;
use crate::models::{NewNoteData, Note};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::NoteRepository for SqliteRepository {
    async fn add_note(&self, occurrence_id: Uuid, data: NewNoteData) -> Result<Note, CoreError> {
        if data.text.trim().is_empty() {
            return Err(CoreError::InvalidInput("note text must not be empty".to_string()));
        }

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM occurrences WHERE id = $1")
            .bind(occurrence_id)
            .fetch_optional(self.pool())
            .await?;
        if exists.is_none() {
            return Err(CoreError::OccurrenceNotFound(occurrence_id));
        }

        let note = sqlx::query_as(
            r#"INSERT INTO notes (id, occurrence_id, text, note_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, occurrence_id, text, note_type, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(occurrence_id)
        .bind(data.text)
        .bind(data.note_type)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(note)
    }

    async fn find_notes_for_occurrence(&self, occurrence_id: Uuid) -> Result<Vec<Note>, CoreError> {
        let notes = sqlx::query_as("SELECT * FROM notes WHERE occurrence_id = $1 ORDER BY created_at, id")
            .bind(occurrence_id)
            .fetch_all(self.pool())
            .await?;
        Ok(notes)
    }

    async fn delete_note(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Note not found: {}", id)));
        }
        Ok(())
    }
}
