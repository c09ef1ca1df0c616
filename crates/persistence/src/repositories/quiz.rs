//! Quiz repository for database operations.

use domain::models::{QuizQuestion, QuizVisibility};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::QuizEntity;
use crate::metrics::QueryTimer;

const QUIZ_COLUMNS: &str = "id, owner_id, title, description, visibility, cover_image, \
                            questions, play_count, created_at, updated_at";

/// Repository for quiz-related database operations.
#[derive(Clone)]
pub struct QuizRepository {
    pool: PgPool,
}

impl QuizRepository {
    /// Creates a new QuizRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a quiz by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<QuizEntity>, sqlx::Error> {
        let _timer = QueryTimer::new("find_quiz_by_id");
        sqlx::query_as::<_, QuizEntity>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create a new quiz owned by `owner_id`.
    pub async fn create_quiz(
        &self,
        owner_id: Uuid,
        title: &str,
        description: &str,
        visibility: QuizVisibility,
        cover_image: Option<&str>,
        questions: &[QuizQuestion],
    ) -> Result<QuizEntity, sqlx::Error> {
        let _timer = QueryTimer::new("create_quiz");
        let questions_json =
            serde_json::to_string(questions).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        sqlx::query_as::<_, QuizEntity>(&format!(
            r#"
            INSERT INTO quizzes (owner_id, title, description, visibility, cover_image, questions)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(visibility.as_str())
        .bind(cover_image)
        .bind(questions_json)
        .fetch_one(&self.pool)
        .await
    }

    /// Replace the mutable fields of an existing quiz.
    pub async fn update_quiz(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
        visibility: QuizVisibility,
        cover_image: Option<&str>,
        questions: &[QuizQuestion],
    ) -> Result<Option<QuizEntity>, sqlx::Error> {
        let _timer = QueryTimer::new("update_quiz");
        let questions_json =
            serde_json::to_string(questions).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        sqlx::query_as::<_, QuizEntity>(&format!(
            r#"
            UPDATE quizzes
            SET title = $2, description = $3, visibility = $4, cover_image = $5,
                questions = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(visibility.as_str())
        .bind(cover_image)
        .bind(questions_json)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a quiz. Returns true when a row was removed.
    pub async fn delete_quiz(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let _timer = QueryTimer::new("delete_quiz");
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List public quizzes, newest first.
    pub async fn list_public(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuizEntity>, sqlx::Error> {
        let _timer = QueryTimer::new("list_public_quizzes");
        sqlx::query_as::<_, QuizEntity>(&format!(
            r#"
            SELECT {QUIZ_COLUMNS} FROM quizzes
            WHERE visibility = 'public'
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Count public quizzes.
    pub async fn count_public(&self) -> Result<i64, sqlx::Error> {
        let _timer = QueryTimer::new("count_public_quizzes");
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quizzes WHERE visibility = 'public'")
            .fetch_one(&self.pool)
            .await
    }

    /// List quizzes owned by a user, newest first.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<QuizEntity>, sqlx::Error> {
        let _timer = QueryTimer::new("list_quizzes_by_owner");
        sqlx::query_as::<_, QuizEntity>(&format!(
            r#"
            SELECT {QUIZ_COLUMNS} FROM quizzes
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    /// IDs and update timestamps of all public quizzes, for the sitemap.
    pub async fn public_sitemap_entries(
        &self,
    ) -> Result<Vec<(Uuid, chrono::DateTime<chrono::Utc>)>, sqlx::Error> {
        let _timer = QueryTimer::new("public_sitemap_entries");
        sqlx::query_as::<_, (Uuid, chrono::DateTime<chrono::Utc>)>(
            r#"
            SELECT id, updated_at FROM quizzes
            WHERE visibility = 'public'
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
