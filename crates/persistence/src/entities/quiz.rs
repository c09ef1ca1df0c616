//! Quiz entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Quiz, QuizQuestion, QuizVisibility};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the quizzes table.
///
/// Questions are stored as a JSON text column; the quiz editor is the only
/// writer and always produces the full document.
#[derive(Debug, Clone, FromRow)]
pub struct QuizEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub visibility: String,
    pub cover_image: Option<String>,
    pub questions: String,
    pub play_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuizEntity> for Quiz {
    fn from(entity: QuizEntity) -> Self {
        let questions: Vec<QuizQuestion> =
            serde_json::from_str(&entity.questions).unwrap_or_default();
        let visibility = match entity.visibility.as_str() {
            "public" => QuizVisibility::Public,
            _ => QuizVisibility::Private,
        };
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            title: entity.title,
            description: entity.description,
            visibility,
            cover_image: entity.cover_image,
            questions,
            play_count: entity.play_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
