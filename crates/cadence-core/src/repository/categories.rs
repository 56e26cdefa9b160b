use crate::error::CoreError;
use crate::models::{Category, NewCategoryData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::CategoryRepository for SqliteRepository {
    async fn add_category(&self, data: NewCategoryData) -> Result<Category, CoreError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("category name must not be empty".to_string()));
        }

        let category = sqlx::query_as(
            r#"INSERT INTO categories (id, name, color, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, color, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&name)
        .bind(data.color)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                CoreError::InvalidInput(format!("category '{}' already exists", name))
            }
            _ => CoreError::Database(e),
        })?;

        Ok(category)
    }

    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>, CoreError> {
        let category = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(category)
    }

    async fn find_categories(&self) -> Result<Vec<Category>, CoreError> {
        let categories = sqlx::query_as("SELECT id, name, color, created_at FROM categories ORDER BY name")
            .fetch_all(self.pool())
            .await?;
        Ok(categories)
    }

    /// Deletes a category. Actions referencing it keep existing with no
    /// category.
    async fn delete_category(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Category not found: {}", id)));
        }

        Ok(())
    }
}
