//! Editor image repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EditorImageEntity;
use crate::metrics::QueryTimer;

const IMAGE_COLUMNS: &str = "id, uploader_id, storage_key, quiz_id, created_at";

/// Repository for editor image bookkeeping.
#[derive(Clone)]
pub struct EditorImageRepository {
    pool: PgPool,
}

impl EditorImageRepository {
    /// Creates a new EditorImageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a freshly uploaded editor image.
    pub async fn insert(
        &self,
        uploader_id: Uuid,
        storage_key: &str,
    ) -> Result<EditorImageEntity, sqlx::Error> {
        let _timer = QueryTimer::new("insert_editor_image");
        sqlx::query_as::<_, EditorImageEntity>(&format!(
            r#"
            INSERT INTO editor_images (uploader_id, storage_key)
            VALUES ($1, $2)
            RETURNING {IMAGE_COLUMNS}
            "#
        ))
        .bind(uploader_id)
        .bind(storage_key)
        .fetch_one(&self.pool)
        .await
    }

    /// Attach an uploaded image to a saved quiz, exempting it from cleanup.
    pub async fn attach_to_quiz(&self, id: Uuid, quiz_id: Uuid) -> Result<bool, sqlx::Error> {
        let _timer = QueryTimer::new("attach_editor_image");
        let result = sqlx::query(
            r#"
            UPDATE editor_images
            SET quiz_id = $2
            WHERE id = $1 AND quiz_id IS NULL
            "#,
        )
        .bind(id)
        .bind(quiz_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete rows never attached to a quiz and older than `grace_hours`.
    /// Returns the storage keys of the removed rows so the caller can delete
    /// the underlying files.
    pub async fn delete_orphans(&self, grace_hours: i64) -> Result<Vec<String>, sqlx::Error> {
        let _timer = QueryTimer::new("delete_orphan_editor_images");
        sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM editor_images
            WHERE quiz_id IS NULL
              AND created_at < NOW() - ($1 || ' hours')::INTERVAL
            RETURNING storage_key
            "#,
        )
        .bind(grace_hours.to_string())
        .fetch_all(&self.pool)
        .await
    }
}
